// src/scrape/pause.rs
use std::thread;

use rand::rngs::ThreadRng;

use crate::config::DelayRange;

/// Politeness pauses go through here so the loop can run without sleeping.
pub trait Pause {
    fn pause(&mut self, range: &DelayRange);
}

/// Sleep the current thread for a random duration within the range.
pub struct ThreadSleep {
    rng: ThreadRng,
}

impl ThreadSleep {
    pub fn new() -> Self {
        Self { rng: rand::thread_rng() }
    }
}

impl Default for ThreadSleep {
    fn default() -> Self {
        Self::new()
    }
}

impl Pause for ThreadSleep {
    fn pause(&mut self, range: &DelayRange) {
        let d = range.sample(&mut self.rng);
        if d.is_zero() {
            return;
        }
        logd!("Sleeping {:.1}s", d.as_secs_f64());
        thread::sleep(d);
    }
}

/// Never sleeps.
pub struct NoPause;

impl Pause for NoPause {
    fn pause(&mut self, _range: &DelayRange) {}
}
