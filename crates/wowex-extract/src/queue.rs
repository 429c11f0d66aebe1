//! Blocking work queue shared by extraction workers
//!
//! Unbounded FIFO guarded by one lock that covers both the items and the
//! shutdown flag. Consumers park on a condition variable and are woken on
//! every push and on cancel. After [`WorkQueue::cancel`] the queue is empty
//! for good: every blocked and future pop returns `None`.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use tracing::{debug, warn};

struct State<T> {
    items: VecDeque<T>,
    shutdown: bool,
}

/// Thread-safe producer/consumer queue
pub struct WorkQueue<T> {
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> WorkQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Append an item and wake waiting consumers
    ///
    /// Items pushed after [`Self::cancel`] are dropped.
    pub fn push(&self, item: T) {
        let mut state = self.state.lock();
        if state.shutdown {
            warn!("Push to cancelled work queue ignored");
            return;
        }
        state.items.push_back(item);
        drop(state);
        self.available.notify_one();
    }

    /// Take the front item without blocking
    pub fn try_pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        if state.shutdown {
            return None;
        }
        state.items.pop_front()
    }

    /// Take the front item, blocking until one arrives or the queue is
    /// cancelled
    pub fn wait_and_pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if state.shutdown {
                return None;
            }
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            self.available.wait(&mut state);
        }
    }

    /// Drop pending items and shut the queue down permanently
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        let dropped = state.items.len();
        state.items.clear();
        state.shutdown = true;
        drop(state);
        self.available.notify_all();
        debug!("Work queue cancelled, {} pending items dropped", dropped);
    }

    /// Number of pending items
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Check if no items are pending
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Whether [`Self::cancel`] has been called
    pub fn is_cancelled(&self) -> bool {
        self.state.lock().shutdown
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_order() {
        let queue = WorkQueue::new();
        queue.push("a");
        queue.push("b");
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.wait_and_pop(), Some("a"));
        assert_eq!(queue.try_pop(), Some("b"));
        assert_eq!(queue.try_pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn cancel_drains_and_rejects() {
        let queue = WorkQueue::new();
        queue.push(1);
        queue.push(2);
        queue.cancel();
        assert!(queue.is_cancelled());
        assert!(queue.is_empty());
        assert_eq!(queue.wait_and_pop(), None);
        assert_eq!(queue.try_pop(), None);

        queue.push(3);
        assert!(queue.is_empty());
    }

    #[test]
    fn cancel_wakes_blocked_consumers() {
        let queue = Arc::new(WorkQueue::<u32>::new());
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.wait_and_pop())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.cancel();
        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), None);
        }
    }

    #[test]
    fn push_wakes_blocked_consumer() {
        let queue = Arc::new(WorkQueue::new());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.wait_and_pop())
        };

        thread::sleep(Duration::from_millis(20));
        queue.push(42);
        assert_eq!(consumer.join().unwrap(), Some(42));
    }

    #[test]
    fn every_item_consumed_once() {
        let queue = Arc::new(WorkQueue::new());
        for i in 0..1000u32 {
            queue.push(i);
        }
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(i) = queue.try_pop() {
                        seen.push(i);
                    }
                    seen
                })
            })
            .collect();

        let mut all: Vec<u32> = workers
            .into_iter()
            .flat_map(|w| w.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..1000).collect::<Vec<_>>());
    }
}
