//! Polling helper shared by element discovery and stability detection.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollError<E> {
    #[error("condition not met within {0:?}")]
    Timeout(Duration),
    #[error("probe failed: {0}")]
    Probe(E),
}

/// Run `probe` immediately and then every `interval` until it yields a value,
/// fails, or `timeout` elapses.
pub async fn poll_until<T, E, F, Fut>(
    mut probe: F,
    interval: Duration,
    timeout: Duration,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = probe().await.map_err(PollError::Probe)? {
            return Ok(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(PollError::Timeout(timeout));
        }
        sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn returns_first_value() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let out: Result<u32, PollError<()>> = poll_until(
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok((n == 3).then_some(n))
            },
            Duration::from_millis(100),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(out, Ok(3));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out() {
        let start = Instant::now();
        let out: Result<(), PollError<()>> = poll_until(
            || async { Ok(None) },
            Duration::from_millis(100),
            Duration::from_millis(350),
        )
        .await;
        assert_eq!(out, Err(PollError::Timeout(Duration::from_millis(350))));
        assert!(start.elapsed() >= Duration::from_millis(350));
    }

    #[tokio::test(start_paused = true)]
    async fn probe_errors_stop_polling() {
        let out: Result<(), PollError<&str>> = poll_until(
            || async { Err("detached") },
            Duration::from_millis(100),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(out, Err(PollError::Probe("detached")));
    }
}
