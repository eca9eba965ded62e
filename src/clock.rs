use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::state::Delta;

const POLL_SLICE: Duration = Duration::from_millis(25);

pub fn tick_period() -> Duration {
    let ms = env::var("CLOCK_TICK_MS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(1000)
        .max(100);
    Duration::from_millis(ms)
}

/// The running-clock resource. Exactly one handle is alive while the match
/// is running; pausing or ending the match cancels it, and `cancel` joins
/// the thread so no tick is delivered after it returns.
#[derive(Debug)]
pub struct ClockHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

pub fn spawn_clock(tx: Sender<Delta>, period: Duration) -> ClockHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let thread = thread::spawn(move || {
        let mut next = Instant::now() + period;
        loop {
            if flag.load(Ordering::Relaxed) {
                return;
            }
            if Instant::now() >= next {
                if tx.send(Delta::ClockTick).is_err() {
                    return;
                }
                // Advance by the period, not from `now`, so ticks do not
                // drift over a long match.
                next += period;
            }
            thread::sleep(POLL_SLICE.min(period));
        }
    });
    ClockHandle {
        stop,
        thread: Some(thread),
    }
}

impl ClockHandle {
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
