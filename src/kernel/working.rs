//! 忙碌计数器：可重入的准入控制
//!
//! 长时间运行的命令在开始时 `start()`，拿到的守卫在离开作用域时
//! 自动减一（包括出错提前返回的路径）。计数 > 0 即为忙碌。

use crate::core::Emitter;
use std::cell::Cell;

#[derive(Debug, Default)]
pub struct WorkingCounter {
    count: Cell<u32>,
    busy_changed: Emitter<bool>,
}

impl WorkingCounter {
    pub fn new(busy_changed: Emitter<bool>) -> Self {
        Self {
            count: Cell::new(0),
            busy_changed,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.count.get() > 0
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }

    pub fn start(&self) -> WorkingGuard<'_> {
        let prev = self.count.get();
        self.count.set(prev + 1);
        if prev == 0 {
            self.busy_changed.emit(&true);
        }
        WorkingGuard { counter: self }
    }

    fn end(&self) {
        let prev = self.count.get();
        debug_assert!(prev > 0, "working counter underflow");
        let next = prev.saturating_sub(1);
        self.count.set(next);
        if prev == 1 {
            self.busy_changed.emit(&false);
        }
    }
}

#[must_use = "the counter is released when the guard is dropped"]
pub struct WorkingGuard<'a> {
    counter: &'a WorkingCounter,
}

impl Drop for WorkingGuard<'_> {
    fn drop(&mut self) {
        self.counter.end();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/working.rs"]
mod tests;
