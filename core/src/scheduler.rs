use std::future::Future;
use std::time::Duration;

/// Runs an iteration once, or forever with a fixed pause between iterations.
///
/// The pause starts when an iteration finishes, so a slow iteration delays
/// the next one instead of causing a burst of catch-up runs.
#[derive(Clone, Copy, Debug)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn is_one_shot(&self) -> bool {
        self.interval.is_zero()
    }

    /// Calls `iteration` with a 1-based iteration number.
    /// Only returns in one-shot mode.
    pub async fn run<F, Fut>(&self, mut iteration: F)
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = ()>,
    {
        if self.is_one_shot() {
            iteration(1).await;
            return;
        }

        let mut count: u64 = 0;
        loop {
            count += 1;
            iteration(count).await;
            tokio::time::sleep(self.interval).await;
        }
    }
}
