use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use version_launcher::error::Error;
use version_launcher::process::Prober;
use version_launcher::server::ReadinessCheck;

/// Starts answering once `ready_after` has passed since it was built.
struct DelayedProber {
    created: Instant,
    ready_after: Option<Duration>,
    calls: AtomicU32,
}

impl DelayedProber {
    fn ready_after(delay: Duration) -> Self {
        Self {
            created: Instant::now(),
            ready_after: Some(delay),
            calls: AtomicU32::new(0),
        }
    }

    fn never() -> Self {
        Self {
            created: Instant::now(),
            ready_after: None,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl Prober for DelayedProber {
    async fn is_connectable(&self, _host: &str, _port: u16) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.ready_after {
            Some(delay) => self.created.elapsed() >= delay,
            None => false,
        }
    }
}

fn assert_within_deadline(elapsed: Duration) {
    assert!(elapsed >= Duration::from_secs(2), "gave up early after {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2010), "overran deadline: {:?}", elapsed);
}

fn check() -> ReadinessCheck {
    ReadinessCheck::new(Duration::from_secs(2), Duration::from_millis(50))
}

#[tokio::test(start_paused = true)]
async fn test_ready_immediately() {
    let prober = DelayedProber::ready_after(Duration::ZERO);

    let elapsed = check().wait(&prober, "localhost", 9001).await.unwrap();

    assert_eq!(elapsed, Duration::ZERO);
    assert_eq!(prober.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_ready_before_timeout() {
    let prober = DelayedProber::ready_after(Duration::from_millis(1500));

    let elapsed = check().wait(&prober, "localhost", 9001).await.unwrap();

    // Success is reported on the first probe after the server came up
    assert!(elapsed >= Duration::from_millis(1500));
    assert!(elapsed < Duration::from_millis(1550));
}

#[tokio::test(start_paused = true)]
async fn test_ready_just_after_timeout_is_a_timeout() {
    let prober = DelayedProber::ready_after(Duration::from_millis(2001));

    let err = check().wait(&prober, "localhost", 9001).await.unwrap_err();

    assert!(matches!(
        err,
        Error::ReadinessTimeout { ref host, port: 9001, timeout }
            if host == "localhost" && timeout == Duration::from_secs(2)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_never_ready_waits_the_full_timeout() {
    let prober = DelayedProber::never();
    let started = Instant::now();

    let result = check().wait(&prober, "localhost", 9001).await;

    assert!(matches!(result, Err(Error::ReadinessTimeout { .. })));
    assert_within_deadline(started.elapsed());
    // One probe per poll interval, give or take the last one
    let calls = prober.calls.load(Ordering::SeqCst);
    assert!((40..=41).contains(&calls), "unexpected probe count {}", calls);
}

/// Hangs forever, like a connect to a black-holed address.
struct HangingProber;

#[async_trait]
impl Prober for HangingProber {
    async fn is_connectable(&self, _host: &str, _port: u16) -> bool {
        std::future::pending::<()>().await;
        true
    }
}

#[tokio::test(start_paused = true)]
async fn test_hanging_probe_is_bounded_by_timeout() {
    let started = Instant::now();

    let result = check().wait(&HangingProber, "10.255.255.1", 80).await;

    assert!(matches!(result, Err(Error::ReadinessTimeout { .. })));
    assert_within_deadline(started.elapsed());
}
