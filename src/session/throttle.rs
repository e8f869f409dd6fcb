use std::time::{Duration, Instant};

/// Default minimum spacing between published detection lists.
pub const DEFAULT_PUBLISH_INTERVAL: Duration = Duration::from_millis(100);

/// Rate gate for the externally visible detection list.
///
/// The loop runs at the frame source's natural rate; this bounds how often
/// its results become visible, so consumers see at most ~10 updates per
/// second instead of frame-to-frame jitter. `now` is passed in explicitly
/// so tests can drive simulated time.
#[derive(Debug)]
pub struct PublishThrottle {
    min_interval: Duration,
    last_publish: Option<Instant>,
}

impl PublishThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_publish: None,
        }
    }

    /// True when a result produced at `now` should be published. The first
    /// call always publishes; afterwards only strictly more than
    /// `min_interval` after the previous publish.
    pub fn should_publish(&mut self, now: Instant) -> bool {
        let due = match self.last_publish {
            None => true,
            Some(last) => now.duration_since(last) > self.min_interval,
        };
        if due {
            self.last_publish = Some(now);
        }
        due
    }
}

impl Default for PublishThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLISH_INTERVAL)
    }
}
