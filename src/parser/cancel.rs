use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Polled by the parser between top-level declarations.
pub trait CancelCheck {
    fn is_cancelled(&self) -> bool;
}

impl CancelCheck for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: CancelCheck + ?Sized> CancelCheck for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<T: CancelCheck + ?Sized> CancelCheck for Arc<T> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Cancels once a point in time has passed.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }
}

impl CancelCheck for Deadline {
    fn is_cancelled(&self) -> bool {
        Instant::now() >= self.0
    }
}

/// Adapts a closure.
pub struct CancelFn<F>(pub F);

impl<F: Fn() -> bool> CancelCheck for CancelFn<F> {
    fn is_cancelled(&self) -> bool {
        (self.0)()
    }
}
