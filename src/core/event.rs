//! 类型化事件发射器
//!
//! 每个事件名对应一个 `Emitter<T>`：订阅/退订是显式的，
//! 投递是同步的，并严格按订阅顺序进行。

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Handler<T> = Rc<RefCell<dyn FnMut(&T)>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Slots<T> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(u64, Handler<T>)>>,
}

pub struct Emitter<T> {
    slots: Rc<Slots<T>>,
}

impl<T> Emitter<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(Slots {
                next_id: Cell::new(0),
                handlers: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let id = self.slots.next_id.get();
        self.slots.next_id.set(id + 1);
        let handler: Handler<T> = Rc::new(RefCell::new(handler));
        self.slots.handlers.borrow_mut().push((id, handler));
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut handlers = self.slots.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription.0);
        handlers.len() != before
    }

    /// 把 `value` 分发给调用前已注册的所有回调。
    ///
    /// 先对回调列表做快照，回调执行期间可以在本 emitter 上订阅或退订。
    /// 正在执行的回调（自身内部再次 emit）会被跳过。
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<(u64, Handler<T>)> = self
            .slots
            .handlers
            .borrow()
            .iter()
            .map(|(id, h)| (*id, Rc::clone(h)))
            .collect();

        for (id, handler) in snapshot {
            let still_subscribed = self
                .slots
                .handlers
                .borrow()
                .iter()
                .any(|(live, _)| *live == id);
            if !still_subscribed {
                continue;
            }
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (&mut *handler)(value);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots.handlers.borrow().len()
    }

    pub fn clear(&self) {
        self.slots.handlers.borrow_mut().clear();
    }
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/event.rs"]
mod tests;
