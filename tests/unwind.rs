use std::cell::RefCell;
use std::rc::Rc;

use dropstack::{defer, guard, scope, Destructible, ErrorKind, Scope};

type Log = Rc<RefCell<Vec<&'static str>>>;

#[derive(Debug)]
struct Res {
    name: &'static str,
    log: Log,
    teardowns: u32,
}

impl Res {
    fn new(name: &'static str, log: &Log) -> Self {
        Res {
            name,
            log: Rc::clone(log),
            teardowns: 0,
        }
    }
}

impl Destructible for Res {
    fn teardown(&mut self) {
        self.teardowns += 1;
        self.log.borrow_mut().push(self.name);
    }
}

#[test]
fn unwind_runs_in_reverse_registration_order() {
    let log: Log = Rc::default();
    let mut scope = Scope::new();
    scope.adopt(Res::new("a", &log));
    scope.adopt(Res::new("b", &log));
    scope.adopt(Res::new("c", &log));
    scope.unwind();
    assert_eq!(*log.borrow(), ["c", "b", "a"]);
}

#[test]
fn register_reports_the_updated_count() {
    let mut scope = Scope::new();
    assert_eq!(scope.register(|| {}), 1);
    assert_eq!(scope.register(|| {}), 2);
    assert_eq!(scope.register(|| {}), 3);
    assert_eq!(scope.len(), 3);
}

#[test]
fn each_teardown_runs_exactly_once() {
    let log: Log = Rc::default();
    let mut scope = Scope::new();
    let a = scope.adopt(Res::new("a", &log));
    let b = scope.adopt(Res::new("b", &log));
    scope.unwind();
    assert_eq!(a.borrow().teardowns, 1);
    assert_eq!(b.borrow().teardowns, 1);
}

#[test]
fn dropping_a_scope_unwinds_it() {
    let log: Log = Rc::default();
    {
        let mut scope = Scope::new();
        scope.adopt(Res::new("a", &log));
        scope.adopt(Res::new("b", &log));
    }
    assert_eq!(*log.borrow(), ["b", "a"]);
}

#[test]
fn early_exit_unwinds_nested_scopes_innermost_first() {
    fn run(log: &Log, early: bool) {
        let mut outer = Scope::new();
        outer.adopt(Res::new("a", log));

        let mut inner = Scope::new();
        inner.adopt(Res::new("b", log));
        inner.adopt(Res::new("c", log));

        if early {
            return;
        }

        inner.unwind();
        outer.unwind();
    }

    let log: Log = Rc::default();
    run(&log, true);
    assert_eq!(*log.borrow(), ["c", "b", "a"]);

    log.borrow_mut().clear();
    run(&log, false);
    assert_eq!(*log.borrow(), ["c", "b", "a"]);
}

#[test]
fn panicking_out_of_a_scope_still_unwinds() {
    let log: Log = Rc::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut scope = Scope::new();
        scope.adopt(Res::new("a", &log));
        scope.adopt(Res::new("b", &log));
        panic!("boom");
    }));
    assert!(result.is_err());
    assert_eq!(*log.borrow(), ["b", "a"]);
}

#[test]
fn failed_construction_registers_nothing() {
    let log: Log = Rc::default();
    let mut scope = Scope::new();
    scope.adopt(Res::new("a", &log));
    let attempt = scope.construct(|| Err::<Res, &str>("out of widgets"));
    assert_eq!(attempt.unwrap_err(), "out of widgets");
    assert_eq!(scope.len(), 1);
    scope.unwind();
    assert_eq!(*log.borrow(), ["a"]);
}

#[test]
fn successful_construction_registers_and_returns_a_handle() {
    let log: Log = Rc::default();
    let mut scope = Scope::new();
    let res = scope.construct(|| Ok::<_, &str>(Res::new("a", &log))).unwrap();
    res.borrow_mut().name = "renamed";
    scope.unwind();
    assert_eq!(*log.borrow(), ["renamed"]);
}

#[test]
fn empty_unwind_is_a_no_op() {
    let log: Log = Rc::default();
    Scope::new().unwind();
    assert!(log.borrow().is_empty());
}

#[test]
#[should_panic(expected = "entry limit was exceeded")]
fn registering_past_the_limit_is_fatal() {
    let mut scope = Scope::with_limit(2);
    scope.register(|| {});
    scope.register(|| {});
    scope.register(|| {});
}

#[test]
fn try_register_surfaces_the_capacity_condition() {
    let mut scope = Scope::with_limit(2);
    assert_eq!(scope.try_register(|| {}).unwrap(), 1);
    assert_eq!(scope.try_register(|| {}).unwrap(), 2);
    let err = scope.try_register(|| {}).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert_eq!(scope.len(), 2);
}

#[test]
fn scope_helper_unwinds_on_every_path() {
    let log: Log = Rc::default();
    let sum = scope(|s| {
        let a = s.adopt(Res::new("a", &log));
        s.adopt(Res::new("b", &log));
        let sum = a.borrow().teardowns + 40;
        sum
    });
    assert_eq!(sum, 40);
    assert_eq!(*log.borrow(), ["b", "a"]);
}

#[test]
fn guard_runs_its_teardown_on_drop() {
    let log: Log = Rc::default();
    {
        let file = guard(Res::new("file", &log), |mut res| res.teardown());
        assert_eq!(file.name, "file");
    }
    assert_eq!(*log.borrow(), ["file"]);
}

#[test]
fn defused_guard_returns_the_value_intact() {
    let log: Log = Rc::default();
    let res = guard(Res::new("kept", &log), |mut res| res.teardown()).defuse();
    assert_eq!(res.teardowns, 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn deferred_actions_run_in_reverse_declaration_order() {
    let log: Log = Rc::default();
    {
        let first = Rc::clone(&log);
        let _a = defer(move || first.borrow_mut().push("first"));
        let second = Rc::clone(&log);
        let _b = defer(move || second.borrow_mut().push("second"));
    }
    assert_eq!(*log.borrow(), ["second", "first"]);
}
