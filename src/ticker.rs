//! Pace of the polling loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub trait Ticker {
    /// Wait until the next build should start.
    /// Returns false when polling should stop.
    fn tick(&mut self) -> bool;
}

/// Sleep a fixed interval between two builds,
/// until the running flag is cleared.
pub struct IntervalTicker {
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl IntervalTicker {
    pub fn new(interval: Duration, running: Arc<AtomicBool>) -> IntervalTicker {
        IntervalTicker { interval, running }
    }
}

impl Ticker for IntervalTicker {
    fn tick(&mut self) -> bool {
        if !self.running.load(Ordering::SeqCst) {
            return false;
        }
        std::thread::sleep(self.interval);
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::{IntervalTicker, Ticker};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn interval_ticker_sleeps() {
        let running = Arc::new(AtomicBool::new(true));
        let mut ticker = IntervalTicker::new(Duration::from_millis(5), running);
        let start = Instant::now();
        assert!(ticker.tick());
        assert!(ticker.tick());
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn interval_ticker_stops_when_not_running() {
        let running = Arc::new(AtomicBool::new(true));
        let mut ticker = IntervalTicker::new(Duration::from_secs(60), running.clone());
        running.store(false, Ordering::SeqCst);
        let start = Instant::now();
        assert!(!ticker.tick());
        assert!(start.elapsed() < Duration::from_secs(60));
    }
}
