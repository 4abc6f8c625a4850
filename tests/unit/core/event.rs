use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_emit_in_subscription_order() {
    let emitter = Emitter::<u32>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for tag in ["a", "b", "c"] {
        let seen = Rc::clone(&seen);
        emitter.subscribe(move |v| seen.borrow_mut().push(format!("{tag}{v}")));
    }

    emitter.emit(&1);
    emitter.emit(&2);

    assert_eq!(
        *seen.borrow(),
        vec!["a1", "b1", "c1", "a2", "b2", "c2"]
    );
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let emitter = Emitter::<()>::new();
    let count = Rc::new(Cell::new(0));

    let sub = {
        let count = Rc::clone(&count);
        emitter.subscribe(move |_| count.set(count.get() + 1))
    };

    emitter.emit(&());
    assert!(emitter.unsubscribe(sub));
    assert!(!emitter.unsubscribe(sub));
    emitter.emit(&());

    assert_eq!(count.get(), 1);
    assert_eq!(emitter.subscriber_count(), 0);
}

#[test]
fn test_clone_shares_subscribers() {
    let emitter = Emitter::<bool>::new();
    let other = emitter.clone();
    let last = Rc::new(Cell::new(false));

    {
        let last = Rc::clone(&last);
        other.subscribe(move |v| last.set(*v));
    }

    emitter.emit(&true);
    assert!(last.get());
    assert_eq!(emitter.subscriber_count(), 1);
}

#[test]
fn test_subscribe_during_emit_is_deferred() {
    let emitter = Emitter::<()>::new();
    let late_calls = Rc::new(Cell::new(0));

    {
        let handle = emitter.clone();
        let late_calls = Rc::clone(&late_calls);
        let mut added = false;
        emitter.subscribe(move |_| {
            if !added {
                added = true;
                let late_calls = Rc::clone(&late_calls);
                handle.subscribe(move |_| late_calls.set(late_calls.get() + 1));
            }
        });
    }

    emitter.emit(&());
    assert_eq!(late_calls.get(), 0);

    emitter.emit(&());
    assert_eq!(late_calls.get(), 1);
}

#[test]
fn test_unsubscribe_during_emit_skips_later_handler() {
    let emitter = Emitter::<()>::new();
    let second_calls = Rc::new(Cell::new(0));
    let victim = Rc::new(Cell::new(None));

    {
        let handle = emitter.clone();
        let victim = Rc::clone(&victim);
        emitter.subscribe(move |_| {
            if let Some(sub) = victim.get() {
                handle.unsubscribe(sub);
            }
        });
    }
    let sub = {
        let second_calls = Rc::clone(&second_calls);
        emitter.subscribe(move |_| second_calls.set(second_calls.get() + 1))
    };
    victim.set(Some(sub));

    emitter.emit(&());
    assert_eq!(second_calls.get(), 0);
}
