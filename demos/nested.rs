use std::process::ExitCode;

use dropstack::{Destructible, Scope};
use tracing::{info, metadata::LevelFilter};

struct Foo {
    val: i32,
}

impl Foo {
    fn new() -> Self {
        let foo = Foo { val: 42 };
        info!(val = foo.val, "constructed Foo");
        foo
    }
}

impl Destructible for Foo {
    fn teardown(&mut self) {
        self.val = 43;
        info!(val = self.val, "tore down Foo");
    }
}

fn main() -> ExitCode {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let arg: Option<i32> = std::env::args().nth(1).and_then(|s| s.parse().ok());

    let mut outer = Scope::new();
    let _f = outer.adopt(Foo::new());

    if let Some(value) = arg {
        let mut inner = Scope::new();
        let _g = inner.adopt(Foo::new());
        let _h = inner.adopt(Foo::new());

        if value == 42 {
            // Early exit: `inner` unwinds first, then `outer`, before control leaves.
            return ExitCode::FAILURE;
        }

        inner.unwind();
    }

    let _g = outer.adopt(Foo::new());

    outer.unwind();
    ExitCode::SUCCESS
}
