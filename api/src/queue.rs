// ============================================================================
// LIKE QUEUE - Bounded channel drained by a fixed pool of workers
// ============================================================================
// Request handlers push `LikeEvent`s; worker tasks pull them and apply them.
// When the channel is full `enqueue` suspends the caller until a worker
// frees a slot. That is the only backpressure in the system.
//
// Shutdown closes the producer side. Workers keep receiving until the
// channel is both closed and empty, so everything accepted before `stop`
// is applied before `stop` returns.

use crate::models::LikeEvent;
use parking_lot::Mutex;
use std::{fmt::Display, sync::Arc};
use thiserror::Error;
use tokio::{
    sync::{Mutex as AsyncMutex, mpsc},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

pub const DEFAULT_CAPACITY: usize = 100;
pub const DEFAULT_WORKERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("like queue is closed")]
    Closed,
    #[error("like queue workers already started")]
    AlreadyStarted,
    #[error("like queue stopped before any worker ran; {0} events discarded")]
    Discarded(usize),
}

pub struct LikeQueue {
    /// `None` once `stop` has run
    sender: Mutex<Option<mpsc::Sender<LikeEvent>>>,
    /// Shared by all workers; whoever holds the lock waits for the next event
    receiver: Arc<AsyncMutex<mpsc::Receiver<LikeEvent>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    capacity: usize,
    workers: usize,
}

impl LikeQueue {
    /// Panics if `capacity` or `workers` is zero.
    pub fn new(capacity: usize, workers: usize) -> Self {
        assert!(capacity > 0, "like queue capacity must be positive");
        assert!(workers > 0, "like queue needs at least one worker");
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            sender: Mutex::new(Some(tx)),
            receiver: Arc::new(AsyncMutex::new(rx)),
            handles: Mutex::new(Vec::new()),
            capacity,
            workers,
        }
    }

    /// Push an event, waiting for space if the queue is full.
    pub async fn enqueue(&self, event: LikeEvent) -> Result<(), QueueError> {
        // Clone so the lock is not held across the await
        let tx = self.sender.lock().clone().ok_or(QueueError::Closed)?;
        tx.send(event).await.map_err(|_| QueueError::Closed)
    }

    /// Spawn the worker tasks. Must be called from inside a tokio runtime.
    ///
    /// Errors returned by `process` are logged and the event is dropped.
    pub fn start<F, E>(&self, process: F) -> Result<(), QueueError>
    where
        F: Fn(LikeEvent) -> Result<(), E> + Send + Sync + 'static,
        E: Display + Send + 'static,
    {
        if self.sender.lock().is_none() {
            return Err(QueueError::Closed);
        }
        let mut handles = self.handles.lock();
        if !handles.is_empty() {
            return Err(QueueError::AlreadyStarted);
        }

        let process = Arc::new(process);
        for worker_id in 0..self.workers {
            let receiver = Arc::clone(&self.receiver);
            let process = Arc::clone(&process);
            handles.push(tokio::spawn(async move {
                run_worker(worker_id, receiver, process).await;
            }));
        }

        info!(
            workers = self.workers,
            capacity = self.capacity,
            "Like queue workers started"
        );
        Ok(())
    }

    /// Close the queue, let workers drain it, and wait for them to exit.
    ///
    /// Calling `stop` a second time returns `QueueError::Closed`. Stopping a
    /// queue whose workers were never started returns
    /// `QueueError::Discarded` if events were still waiting.
    pub async fn stop(&self) -> Result<(), QueueError> {
        let tx = self.sender.lock().take().ok_or(QueueError::Closed)?;
        let pending = tx.max_capacity() - tx.capacity();
        drop(tx);

        let handles = std::mem::take(&mut *self.handles.lock());
        if handles.is_empty() && pending > 0 {
            warn!(pending, "Like queue stopped with no workers, discarding pending events");
            return Err(QueueError::Discarded(pending));
        }
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Like worker terminated abnormally: {}", e);
            }
        }

        info!("Like queue stopped");
        Ok(())
    }

    /// Events waiting to be picked up by a worker
    pub fn len(&self) -> usize {
        match self.sender.lock().as_ref() {
            Some(tx) => tx.max_capacity() - tx.capacity(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }
}

async fn run_worker<F, E>(
    worker_id: usize,
    receiver: Arc<AsyncMutex<mpsc::Receiver<LikeEvent>>>,
    process: Arc<F>,
) where
    F: Fn(LikeEvent) -> Result<(), E> + Send + Sync + 'static,
    E: Display + Send + 'static,
{
    debug!(worker_id, "Like worker running");
    loop {
        let next = receiver.lock().await.recv().await;
        let Some(event) = next else {
            break;
        };

        let post_id = event.post_id;
        if let Err(e) = process(event) {
            error!(worker_id, post_id, "Like event dropped: {}", e);
        }
    }
    debug!(worker_id, "Like worker terminated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };
    use tokio::time::timeout;

    fn event(post_id: u64) -> LikeEvent {
        LikeEvent::new(post_id, "bob")
    }

    #[tokio::test]
    async fn workers_process_every_event_before_stop_returns() {
        let queue = LikeQueue::new(8, 3);
        let processed = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&processed);
        queue
            .start(move |_event| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(())
            })
            .unwrap();

        for id in 1..=50 {
            queue.enqueue(event(id)).await.unwrap();
        }
        queue.stop().await.unwrap();

        assert_eq!(processed.load(Ordering::SeqCst), 50);
    }

    #[tokio::test]
    async fn enqueue_blocks_while_full_until_workers_drain() {
        let queue = Arc::new(LikeQueue::new(2, 1));
        queue.enqueue(event(1)).await.unwrap();
        queue.enqueue(event(2)).await.unwrap();
        assert_eq!(queue.len(), 2);

        // No workers yet: the third push must wait, not fail or drop
        let blocked = timeout(Duration::from_millis(50), queue.enqueue(event(3))).await;
        assert!(blocked.is_err());
        assert_eq!(queue.len(), 2);

        let processed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&processed);
        queue
            .start(move |_event| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(())
            })
            .unwrap();

        timeout(Duration::from_secs(5), queue.enqueue(event(3)))
            .await
            .expect("enqueue should resume once a worker frees space")
            .unwrap();
        queue.stop().await.unwrap();

        assert_eq!(processed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failed_events_are_dropped_and_worker_keeps_going() {
        let queue = LikeQueue::new(4, 1);
        let processed = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&processed);
        queue
            .start(move |event: LikeEvent| {
                counter.fetch_add(1, Ordering::SeqCst);
                if event.post_id % 2 == 0 {
                    Err(format!("post {} rejected", event.post_id))
                } else {
                    Ok(())
                }
            })
            .unwrap();

        for id in 1..=6 {
            queue.enqueue(event(id)).await.unwrap();
        }
        queue.stop().await.unwrap();

        assert_eq!(processed.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn stop_closes_the_queue() {
        let queue = LikeQueue::new(4, 2);
        queue.start(|_event| Ok::<_, String>(())).unwrap();
        queue.stop().await.unwrap();

        assert!(queue.is_closed());
        assert_eq!(queue.enqueue(event(1)).await, Err(QueueError::Closed));
        assert_eq!(queue.stop().await, Err(QueueError::Closed));
        assert_eq!(
            queue.start(|_event| Ok::<_, String>(())),
            Err(QueueError::Closed)
        );
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let queue = LikeQueue::new(4, 2);
        queue.start(|_event| Ok::<_, String>(())).unwrap();
        assert_eq!(
            queue.start(|_event| Ok::<_, String>(())),
            Err(QueueError::AlreadyStarted)
        );
        queue.stop().await.unwrap();
    }

    #[tokio::test]
    async fn single_worker_preserves_fifo_order() {
        let queue = LikeQueue::new(16, 1);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        queue
            .start(move |event: LikeEvent| {
                sink.lock().push(event.post_id);
                Ok::<_, String>(())
            })
            .unwrap();

        for id in 1..=10 {
            queue.enqueue(event(id)).await.unwrap();
        }
        queue.stop().await.unwrap();

        assert_eq!(*seen.lock(), (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stop_drains_an_enqueue_waiting_on_a_full_queue() {
        let queue = Arc::new(LikeQueue::new(1, 1));
        let processed = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&processed);
        queue
            .start(move |_event| {
                std::thread::sleep(Duration::from_millis(100));
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(())
            })
            .unwrap();

        // The worker is busy with the first event and the second fills the slot
        queue.enqueue(event(1)).await.unwrap();
        queue.enqueue(event(2)).await.unwrap();

        let waiting = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.enqueue(event(3)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        queue.stop().await.unwrap();

        assert_eq!(waiting.await.unwrap(), Ok(()));
        assert_eq!(processed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stop_without_workers_reports_discarded_events() {
        let queue = LikeQueue::new(4, 2);
        queue.enqueue(event(1)).await.unwrap();
        queue.enqueue(event(2)).await.unwrap();

        assert_eq!(queue.stop().await, Err(QueueError::Discarded(2)));
        assert!(queue.is_closed());

        let idle = LikeQueue::new(4, 2);
        assert_eq!(idle.stop().await, Ok(()));
    }
}
