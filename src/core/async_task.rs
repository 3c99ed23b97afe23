use crate::utils::error::{KeygenError, Result};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task;
use tokio_util::sync::CancellationToken;

/// Terminal outcome of a task. Written exactly once, either by the
/// supervisor when the computation finishes or by `cancel`.
enum Outcome<R> {
    Completed(R),
    Cancelled,
    Failed(String),
}

struct Shared<R> {
    cell: OnceLock<Outcome<R>>,
    notify: Notify,
    token: CancellationToken,
}

/// A cancellable background computation with a future-style surface.
///
/// Spawning starts the computation immediately on a blocking thread; the
/// handle can be observed without blocking (`is_done`, `is_cancelled`,
/// `result_now`), awaited (`get`, `get_timeout`), or cancelled. The state
/// machine is RUNNING -> {COMPLETED, CANCELLED, FAILED}; the `OnceLock`
/// result cell admits exactly one writer and gives readers a happens-before
/// edge on the stored value.
pub struct AsyncTask<R> {
    shared: Arc<Shared<R>>,
}

impl<R> AsyncTask<R>
where
    R: Clone + Send + Sync + 'static,
{
    /// Starts `f(input)` on a blocking thread immediately; never blocks the
    /// caller. The function receives a cancellation token that `cancel(true)`
    /// fires; a cooperative `f` polls it and exits early.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<T, F>(f: F, input: T) -> Self
    where
        T: Send + 'static,
        F: FnOnce(T, CancellationToken) -> R + Send + 'static,
    {
        let shared = Arc::new(Shared {
            cell: OnceLock::new(),
            notify: Notify::new(),
            token: CancellationToken::new(),
        });

        let worker = {
            let token = shared.token.clone();
            task::spawn_blocking(move || f(input, token))
        };

        let supervisor = Arc::clone(&shared);
        tokio::spawn(async move {
            let outcome = match worker.await {
                Ok(value) => Outcome::Completed(value),
                Err(join_err) => Outcome::Failed(join_err.to_string()),
            };
            // A lost race against cancel() leaves the cell untouched and the
            // computed value is discarded.
            let _ = supervisor.cell.set(outcome);
            supervisor.notify.notify_waiters();
        });

        Self { shared }
    }

    /// True once the task reached COMPLETED, CANCELLED or FAILED.
    pub fn is_done(&self) -> bool {
        self.shared.cell.get().is_some()
    }

    /// True only if cancellation was requested and won the race.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.shared.cell.get(), Some(Outcome::Cancelled))
    }

    /// Requests cancellation. Returns `true` if the task was not already
    /// terminal; cancelling a finished task is a no-op returning `false`.
    /// With `interrupt_if_running` the cooperative token is fired so the
    /// computation can exit early. Never blocks and never waits for the
    /// worker thread to actually stop.
    pub fn cancel(&self, interrupt_if_running: bool) -> bool {
        if self.shared.cell.set(Outcome::Cancelled).is_err() {
            return false;
        }
        if interrupt_if_running {
            self.shared.token.cancel();
        }
        self.shared.notify.notify_waiters();
        true
    }

    /// Awaits the terminal state and returns the result, re-raising a failed
    /// computation as `ComputationFailure` and a cancellation as
    /// `TaskCancelled`.
    pub async fn get(&self) -> Result<R> {
        loop {
            // Register for the wakeup before checking the cell, otherwise a
            // notify between check and await is lost.
            let notified = self.shared.notify.notified();
            if let Some(outcome) = self.shared.cell.get() {
                return Self::unpack(outcome);
            }
            notified.await;
        }
    }

    /// Like `get`, but gives up after `timeout` with `KeygenError::Timeout`.
    /// The task keeps running; the caller may poll again or cancel.
    pub async fn get_timeout(&self, timeout: Duration) -> Result<R> {
        match tokio::time::timeout(timeout, self.get()).await {
            Ok(result) => result,
            Err(_) => Err(KeygenError::Timeout),
        }
    }

    /// Returns the completed result without blocking; `ResultNotReady` if the
    /// task has not completed. Idempotent once COMPLETED.
    pub fn result_now(&self) -> Result<R> {
        match self.shared.cell.get() {
            Some(outcome) => Self::unpack(outcome),
            None => Err(KeygenError::ResultNotReady),
        }
    }

    fn unpack(outcome: &Outcome<R>) -> Result<R> {
        match outcome {
            Outcome::Completed(value) => Ok(value.clone()),
            Outcome::Cancelled => Err(KeygenError::TaskCancelled),
            Outcome::Failed(message) => Err(KeygenError::ComputationFailure {
                message: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_result_now_before_completion_errors() {
        let task = AsyncTask::spawn(
            |n: u32, _cancel| {
                std::thread::sleep(Duration::from_millis(100));
                n * 2
            },
            21,
        );

        assert!(matches!(task.result_now(), Err(KeygenError::ResultNotReady)));

        let value = task.get().await.unwrap();
        assert_eq!(value, 42);

        // Idempotent after completion.
        assert_eq!(task.result_now().unwrap(), 42);
        assert_eq!(task.result_now().unwrap(), 42);
    }

    #[tokio::test]
    async fn test_cancel_after_completion_is_noop() {
        let task = AsyncTask::spawn(|n: u32, _cancel| n + 1, 1);
        assert_eq!(task.get().await.unwrap(), 2);

        assert!(!task.cancel(true));
        assert!(!task.is_cancelled());
        assert_eq!(task.result_now().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cancel_running_task() {
        let task = AsyncTask::spawn(
            |_: (), cancel: CancellationToken| {
                while !cancel.is_cancelled() {
                    std::thread::sleep(Duration::from_millis(2));
                }
                0u32
            },
            (),
        );

        assert!(task.cancel(true));
        assert!(task.is_done());
        assert!(task.is_cancelled());
        assert!(matches!(task.get().await, Err(KeygenError::TaskCancelled)));
        assert!(matches!(task.result_now(), Err(KeygenError::TaskCancelled)));
    }

    #[tokio::test]
    async fn test_get_timeout_leaves_task_running() {
        let task = AsyncTask::spawn(
            |n: u32, _cancel| {
                std::thread::sleep(Duration::from_millis(100));
                n
            },
            7,
        );

        let waited = task.get_timeout(Duration::from_millis(10)).await;
        assert!(matches!(waited, Err(KeygenError::Timeout)));
        assert!(!task.is_done());

        // Still completes after the timeout was ignored.
        assert_eq!(task.get().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_panicking_computation_fails() {
        let task: AsyncTask<u32> = AsyncTask::spawn(
            |_: (), _cancel| -> u32 { panic!("computation exploded") },
            (),
        );

        match task.get().await {
            Err(KeygenError::ComputationFailure { .. }) => {}
            other => panic!("expected ComputationFailure, got {:?}", other.err()),
        }
    }
}
