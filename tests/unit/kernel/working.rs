use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_guard_releases_on_drop() {
    let counter = WorkingCounter::default();
    assert!(!counter.is_busy());

    {
        let _outer = counter.start();
        let _inner = counter.start();
        assert_eq!(counter.count(), 2);
        assert!(counter.is_busy());
    }

    assert_eq!(counter.count(), 0);
    assert!(!counter.is_busy());
}

#[test]
fn test_guard_releases_on_error_path() {
    fn fallible(counter: &WorkingCounter) -> Result<(), &'static str> {
        let _working = counter.start();
        let read: Result<u32, &'static str> = Err("io failed");
        read?;
        Ok(())
    }

    let counter = WorkingCounter::default();
    assert!(fallible(&counter).is_err());
    assert!(!counter.is_busy());
}

#[test]
fn test_busy_changed_only_on_edges() {
    let events = Emitter::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        events.subscribe(move |busy: &bool| seen.borrow_mut().push(*busy));
    }
    let counter = WorkingCounter::new(events);

    {
        let _a = counter.start();
        let _b = counter.start();
    }

    assert_eq!(*seen.borrow(), vec![true, false]);
}
