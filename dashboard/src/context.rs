//! Context provides a cancellation, similar to Golang's Context,
//! plus the fixed-period schedule the refresh loop runs on.

use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

#[derive(Clone, Debug, Default)]
pub struct Context {
    inner: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    cancelled: Mutex<bool>,
    cv: Condvar,
}

impl Context {
    /// Create a new Context.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // A bool can't be left half-written; ignore poisoning.
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancel the context. Wakes anything waiting on it.
    pub fn cancel(&self) {
        *self.lock() = true;
        self.inner.cv.notify_all();
    }

    /// Returns true iff the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Wait until the duration expires, or the context is cancelled.
    /// Returns true if the context has been cancelled.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let g = self.lock();
        let (v, _) = self
            .inner
            .cv
            .wait_timeout_while(g, duration, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *v
    }

    /// Run `f` immediately, then once per `period`, until cancelled.
    /// Returns how many times `f` ran.
    pub fn every<F: FnMut()>(&self, period: Duration, mut f: F) -> usize {
        let mut runs = 0;
        while !self.is_cancelled() {
            f();
            runs += 1;
            if self.wait_timeout(period) {
                break;
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn cancel_wakes_waiter() {
        let ctx = Context::new();
        let waiter = {
            let ctx = ctx.clone();
            thread::spawn(move || ctx.wait_timeout(Duration::from_secs(60)))
        };
        let start = Instant::now();
        ctx.cancel();
        assert!(waiter.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(30));
    }

    #[test]
    fn timeout_without_cancel() {
        let ctx = Context::new();
        assert!(!ctx.wait_timeout(Duration::from_millis(5)));
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn every_stops_when_cancelled_from_inside() {
        let ctx = Context::new();
        let mut n = 0;
        let runs = ctx.every(Duration::from_millis(1), || {
            n += 1;
            if n == 3 {
                ctx.cancel();
            }
        });
        assert_eq!(runs, 3);
    }

    #[test]
    fn every_never_runs_once_cancelled() {
        let ctx = Context::new();
        ctx.cancel();
        assert_eq!(ctx.every(Duration::from_secs(60), || unreachable!()), 0);
    }
}
