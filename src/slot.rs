use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::types::PredictionResult;

/// One published result together with its publication counter.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub generation: u64,
    pub result: Arc<PredictionResult>,
}

/// Holder of the latest published `PredictionResult`.
///
/// Publishing swaps in a whole new immutable snapshot, so readers see either
/// the previous result or the new one. Consumers poll with `latest` or block
/// on `wait_newer` for the next generation.
pub struct ResultSlot {
    current: Mutex<Arc<Snapshot>>,
    changed: Condvar,
}

impl ResultSlot {
    pub fn new() -> Self {
        ResultSlot {
            current: Mutex::new(Arc::new(Snapshot {
                generation: 0,
                result: Arc::new(PredictionResult::empty()),
            })),
            changed: Condvar::new(),
        }
    }

    /// Replace the visible result. Returns the new generation.
    pub fn publish(&self, result: PredictionResult) -> u64 {
        let result = Arc::new(result);
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let generation = guard.generation + 1;
        *guard = Arc::new(Snapshot { generation, result });
        drop(guard);
        self.changed.notify_all();
        generation
    }

    pub fn latest(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Block until a snapshot newer than `seen` is published or `timeout` passes.
    ///
    /// A timeout too large to represent as a deadline waits without limit.
    pub fn wait_newer(&self, seen: u64, timeout: Duration) -> Option<Arc<Snapshot>> {
        let deadline = Instant::now().checked_add(timeout);
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        while guard.generation <= seen {
            guard = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    self.changed
                        .wait_timeout(guard, deadline - now)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
                None => self.changed.wait(guard).unwrap_or_else(|e| e.into_inner()),
            };
        }
        Some(Arc::clone(&guard))
    }
}

impl Default for ResultSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassScore;
    use std::thread;

    fn result_with(first: i32) -> PredictionResult {
        let mut r = PredictionResult::empty();
        r.top[0] = ClassScore::new(first, 1.0);
        r
    }

    #[test]
    fn test_starts_empty() {
        let slot = ResultSlot::new();
        let snap = slot.latest();
        assert_eq!(snap.generation, 0);
        assert!(snap.result.is_empty());
    }

    #[test]
    fn test_publish_replaces_whole_value() {
        let slot = ResultSlot::new();
        let before = slot.latest();
        assert_eq!(slot.publish(result_with(4)), 1);
        // old snapshot handles are unaffected
        assert!(before.result.is_empty());
        assert_eq!(slot.latest().result.first().class_index, 4);
    }

    #[test]
    fn test_wait_newer_times_out() {
        let slot = ResultSlot::new();
        assert!(slot.wait_newer(0, Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_wait_newer_unbounded_timeout() {
        let slot = ResultSlot::new();
        slot.publish(result_with(3));
        let snap = slot.wait_newer(0, Duration::MAX).unwrap();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.result.first().class_index, 3);
    }

    #[test]
    fn test_wait_newer_unbounded_blocks_until_publish() {
        let slot = Arc::new(ResultSlot::new());
        let writer = Arc::clone(&slot);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.publish(result_with(5));
        });
        let snap = slot.wait_newer(0, Duration::MAX).unwrap();
        assert_eq!(snap.result.first().class_index, 5);
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_newer_sees_publish() {
        let slot = Arc::new(ResultSlot::new());
        let writer = Arc::clone(&slot);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.publish(result_with(7));
        });
        let snap = slot.wait_newer(0, Duration::from_secs(5)).unwrap();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.result.first().class_index, 7);
        handle.join().unwrap();
    }
}
