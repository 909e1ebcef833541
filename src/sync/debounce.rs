use std::time::{Duration, Instant};

struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Trailing-edge debounce: only the latest value survives, and it is
/// released once `window` has passed without a newer push.
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
    superseded: u64,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            superseded: 0,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        if self.pending.is_some() {
            self.superseded += 1;
        }
        self.pending = Some(Pending {
            value,
            deadline: now + self.window,
        });
    }

    /// Releases the pending value once its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Releases the pending value without waiting.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Values replaced by a newer push before they settled.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(50);

    #[test]
    fn emits_latest_value_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.push("h", start);
        debouncer.push("ht", start + Duration::from_millis(20));

        assert_eq!(debouncer.poll(start + Duration::from_millis(60)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(70)), Some("ht"));
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
        assert_eq!(debouncer.superseded(), 1);
    }

    #[test]
    fn burst_settles_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        let mut emitted = Vec::new();
        for step in 0..10u64 {
            let now = start + Duration::from_millis(step * 10);
            debouncer.push(step, now);
            if let Some(value) = debouncer.poll(now) {
                emitted.push(value);
            }
        }
        let last = start + Duration::from_millis(90);
        assert_eq!(debouncer.deadline(), Some(last + WINDOW));
        if let Some(value) = debouncer.poll(last + WINDOW) {
            emitted.push(value);
        }
        assert_eq!(emitted, vec![9]);
    }

    #[test]
    fn flush_releases_immediately() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.push(1, Instant::now());
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.flush(), Some(1));
        assert!(!debouncer.is_pending());
    }
}
