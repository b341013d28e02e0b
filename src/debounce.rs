//! Debounced task scheduling
//!
//! Coalesces bursts of window events into a single capture once they settle.

use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

/// Single-slot delayed task
///
/// Scheduling replaces any pending task, so only the last call in a burst
/// runs once the delay has elapsed without a new call. Tasks are spawned with
/// `spawn_local` and must be driven by a `tokio::task::LocalSet`. Outside of
/// any tokio runtime the task runs immediately.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Whether a tokio runtime is available to run delayed tasks on
    pub fn can_defer() -> bool {
        tokio::runtime::Handle::try_current().is_ok()
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: FnOnce() + 'static,
    {
        self.cancel();
        if !Self::can_defer() {
            warn!("No tokio runtime, running debounced task without delay");
            task();
            return;
        }
        let delay = self.delay;
        self.pending = Some(tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            task();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    #[test]
    fn test_runs_immediately_without_runtime() {
        let fired = Rc::new(Cell::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        let counter = fired.clone();
        debouncer.schedule(move || counter.set(counter.get() + 1));
        assert_eq!(fired.get(), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_after_delay() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(Cell::new(0));
                let mut debouncer = Debouncer::new(Duration::from_millis(100));

                let counter = fired.clone();
                debouncer.schedule(move || counter.set(counter.get() + 1));
                assert!(debouncer.is_pending());

                sleep(Duration::from_millis(50)).await;
                assert_eq!(fired.get(), 0);

                sleep(Duration::from_millis(100)).await;
                assert_eq!(fired.get(), 1);
                assert!(!debouncer.is_pending());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_keeps_only_last() {
        LocalSet::new()
            .run_until(async {
                let last = Rc::new(Cell::new(0));
                let runs = Rc::new(Cell::new(0));
                let mut debouncer = Debouncer::new(Duration::from_millis(100));

                for i in 1..=5 {
                    let (last, runs) = (last.clone(), runs.clone());
                    debouncer.schedule(move || {
                        last.set(i);
                        runs.set(runs.get() + 1);
                    });
                    sleep(Duration::from_millis(30)).await;
                }

                sleep(Duration::from_millis(200)).await;
                assert_eq!(runs.get(), 1);
                assert_eq!(last.get(), 5);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        LocalSet::new()
            .run_until(async {
                let fired = Rc::new(Cell::new(false));
                let mut debouncer = Debouncer::new(Duration::from_millis(100));

                let flag = fired.clone();
                debouncer.schedule(move || flag.set(true));
                debouncer.cancel();
                assert!(!debouncer.is_pending());

                sleep(Duration::from_millis(500)).await;
                assert!(!fired.get());
            })
            .await;
    }
}
