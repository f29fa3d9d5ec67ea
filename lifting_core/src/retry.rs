//! Bounded retry with pluggable backoff and sleeping.

use std::time::Duration;

/// Something that can block the current thread for a while
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Delay before attempt `n` (n >= 2) is `base * 2^(n-1)`
pub fn exponential_backoff(base: Duration) -> impl Fn(u32) -> Duration {
    move |attempt| base.saturating_mul(1u32 << attempt.saturating_sub(1).min(31))
}

/// Run `op` up to `max_attempts` times.
///
/// Before every attempt after the first, sleeps for `backoff(attempt)` where
/// `attempt` is the 1-based number of the attempt about to run. Stops on
/// success or on an error `is_retryable` rejects, and otherwise returns the
/// last error once attempts run out.
pub fn retry<T, E, Op, Retryable, Backoff, S>(
    max_attempts: u32,
    backoff: Backoff,
    is_retryable: Retryable,
    sleeper: &S,
    mut op: Op,
) -> Result<T, E>
where
    Op: FnMut(u32) -> Result<T, E>,
    Retryable: Fn(&E) -> bool,
    Backoff: Fn(u32) -> Duration,
    S: Sleeper + ?Sized,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && is_retryable(&err) => {
                attempt += 1;
                let delay = backoff(attempt);
                tracing::warn!("Attempt {} failed, retrying in {:?}", attempt - 1, delay);
                sleeper.sleep(delay);
            }
            Err(err) => return Err(err),
        }
    }
}
