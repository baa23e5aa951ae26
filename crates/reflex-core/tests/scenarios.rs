//! End-to-end behaviour of the reactive core through its public surface

use proptest::prelude::*;
use reflex_core::{Options, Slot, Subscriber, Value, ViewModel};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<(&'static str, Value)>>>;

fn root(data: Value) -> ViewModel {
    ViewModel::new(Options::new(data).with_el("#app")).unwrap()
}

fn counter() -> ViewModel {
    root([("count", 0i64)].into_iter().collect())
}

fn watch(vm: &ViewModel, path: &str, name: &'static str, log: &Log) -> Subscriber {
    let log = Rc::clone(log);
    Subscriber::new(vm, path, move |v: &Slot| {
        log.borrow_mut().push((name, v.to_value()));
        Ok(())
    })
    .unwrap()
}

fn dep_version(vm: &ViewModel, key: &str) -> u64 {
    vm.data()
        .as_node()
        .unwrap()
        .property(key)
        .unwrap()
        .dependency()
        .version()
}

#[test]
fn test_write_calls_callback_with_new_value() {
    let vm = counter();
    let log = Log::default();
    let _sub = watch(&vm, "count", "cb", &log);

    vm.set("count", 1i64).unwrap();
    assert_eq!(*log.borrow(), vec![("cb", Value::Int(1))]);
}

#[test]
fn test_same_value_write_is_silent() {
    let vm = counter();
    let log = Log::default();
    let _sub = watch(&vm, "count", "cb", &log);

    vm.set("count", 1i64).unwrap();
    let report = vm.set("count", 1i64).unwrap();
    assert!(!report.changed);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(dep_version(&vm, "count"), 1);
}

#[test]
fn test_subscribers_notified_in_registration_order() {
    let vm = counter();
    let log = Log::default();
    let _first = watch(&vm, "count", "cb1", &log);
    let _second = watch(&vm, "count", "cb2", &log);

    let report = vm.set("count", 5i64).unwrap();
    assert_eq!(report.delivered, 2);
    assert_eq!(
        *log.borrow(),
        vec![("cb1", Value::Int(5)), ("cb2", Value::Int(5))]
    );
}

#[test]
fn test_wholesale_replacement_is_not_reobserved() {
    let vm = root(
        [("user", [("name", "a")].into_iter().collect::<Value>())]
            .into_iter()
            .collect(),
    );
    let log = Log::default();
    let _sub = watch(&vm, "user", "cb", &log);

    let replacement: Value = [("name", "b")].into_iter().collect();
    vm.set("user", replacement.clone()).unwrap();
    assert_eq!(*log.borrow(), vec![("cb", replacement)]);

    let report = vm.set_path("user.name", "c").unwrap();
    assert!(report.changed);
    assert_eq!(report.delivered, 0);
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(
        vm.get_path("user.name").unwrap().to_value(),
        Value::from("c")
    );
}

#[test]
fn test_nested_and_parent_writes_are_separate() {
    let vm = root(
        [("a", [("b", 1i64)].into_iter().collect::<Value>())]
            .into_iter()
            .collect(),
    );
    let old_a = vm.get("a").unwrap().as_node().unwrap().clone();
    let log = Log::default();
    let _on_a = watch(&vm, "a", "a", &log);
    let _on_b = watch(&vm, "a.b", "b", &log);

    vm.set_path("a.b", 2i64).unwrap();
    assert_eq!(*log.borrow(), vec![("b", Value::Int(2))]);
    assert_eq!(old_a.property("b").unwrap().dependency().len(), 1);

    log.borrow_mut().clear();
    let replacement = Value::from_iter([("b", 3i64)]);
    vm.set("a", replacement.clone()).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![("a", replacement), ("b", Value::Int(3))]
    );

    // The discarded node no longer feeds any callback.
    log.borrow_mut().clear();
    old_a.set("b", 4i64).unwrap();
    assert!(log.borrow().is_empty());
}

#[test]
fn test_proxy_and_data_share_dependency() {
    let vm = counter();
    let log = Log::default();
    let _sub = watch(&vm, "count", "cb", &log);

    vm.set("count", 1i64).unwrap();
    vm.data().as_node().unwrap().set("count", 2i64).unwrap();
    assert_eq!(dep_version(&vm, "count"), 2);
    assert_eq!(
        *log.borrow(),
        vec![("cb", Value::Int(1)), ("cb", Value::Int(2))]
    );
    assert_eq!(
        vm.get("count").unwrap().to_value(),
        vm.data().as_node().unwrap().get("count").unwrap().to_value()
    );
}

#[test]
fn test_failing_callback_does_not_block_others() {
    let vm = counter();
    let log = Log::default();
    let _bad = Subscriber::new(&vm, "count", |_| {
        Err(reflex_core::Error::callback("cannot render"))
    })
    .unwrap();
    let _good = watch(&vm, "count", "good", &log);

    let report = vm.set("count", 3i64).unwrap();
    assert_eq!(report.delivered, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(*log.borrow(), vec![("good", Value::Int(3))]);
}

proptest! {
    #[test]
    fn prop_distinct_write_notifies_exactly_once(v1 in any::<i64>(), v2 in any::<i64>()) {
        prop_assume!(v1 != v2);
        let vm = root([("x", v1)].into_iter().collect());
        let log = Log::default();
        let _sub = watch(&vm, "x", "cb", &log);

        vm.set("x", v2).unwrap();
        prop_assert_eq!(dep_version(&vm, "x"), 1);
        prop_assert_eq!(log.borrow().clone(), vec![("cb", Value::Int(v2))]);

        vm.set("x", v2).unwrap();
        prop_assert_eq!(dep_version(&vm, "x"), 1);
    }

    #[test]
    fn prop_string_writes_follow_strict_equality(a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
        let vm = root([("s", a.clone())].into_iter().collect());
        let report = vm.set("s", b.clone()).unwrap();
        prop_assert_eq!(report.changed, a != b);
    }
}
