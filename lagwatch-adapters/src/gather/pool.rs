//! Bounded worker pool.
//!
//! A fixed number of tokio tasks pull work items from a queue and signal one
//! completion per item. The caller waits on the completion channel until it
//! has seen exactly as many signals as it enqueued items, so every item is
//! handled once before `run` returns. Workers are spawned per call and exit
//! when the queue is closed and empty.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::{mpsc, Mutex};

/// A handler panicked while processing an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPanic {
    pub message: String,
}

impl WorkerPanic {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

/// Result of draining a pool.
#[derive(Debug)]
pub struct Drained<E> {
    /// Completion signals received. Equals the number of items.
    pub completed: usize,

    /// Errors reported by handlers, in completion order.
    pub errors: Vec<E>,
}

/// Run `handler` once per item on at most `workers` concurrent tasks.
///
/// The handler returns the errors its item produced (empty on success). A
/// panicking handler is reported as `E::from(WorkerPanic)` and still counts
/// as completed. Must be called from within a tokio runtime.
pub async fn run<T, E, H, Fut>(workers: usize, items: Vec<T>, handler: H) -> Drained<E>
where
    T: Send + 'static,
    E: From<WorkerPanic> + Send + 'static,
    H: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Vec<E>> + Send + 'static,
{
    let total = items.len();
    let mut drained = Drained {
        completed: 0,
        errors: Vec::new(),
    };
    if total == 0 {
        return drained;
    }

    let (work_tx, work_rx) = mpsc::channel::<T>(total);
    let (done_tx, mut done_rx) = mpsc::channel::<Vec<E>>(total);
    let work_rx = Arc::new(Mutex::new(work_rx));
    let handler = Arc::new(handler);

    for _ in 0..workers.clamp(1, total) {
        let work_rx = Arc::clone(&work_rx);
        let done_tx = done_tx.clone();
        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            loop {
                let next = work_rx.lock().await.recv().await;
                let Some(item) = next else {
                    break;
                };

                let handler = Arc::clone(&handler);
                let outcome = AssertUnwindSafe(async move { (*handler)(item).await })
                    .catch_unwind()
                    .await;
                let errors = outcome
                    .unwrap_or_else(|payload| vec![E::from(WorkerPanic::from_payload(payload))]);

                if done_tx.send(errors).await.is_err() {
                    break;
                }
            }
        });
    }
    drop(done_tx);

    // Capacity equals the item count, so sends never wait on workers
    for item in items {
        if work_tx.send(item).await.is_err() {
            break;
        }
    }
    drop(work_tx);

    while drained.completed < total {
        match done_rx.recv().await {
            Some(errors) => {
                drained.completed += 1;
                drained.errors.extend(errors);
            }
            None => break,
        }
    }

    if drained.completed < total {
        drained.errors.push(E::from(WorkerPanic {
            message: format!(
                "{} of {} work items never completed",
                total - drained.completed,
                total
            ),
        }));
    }

    drained
}
