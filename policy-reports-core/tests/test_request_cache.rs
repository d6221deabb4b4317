//! Tests for TTL request de-duplication

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use policy_reports_core::application::TtlRequestCache;

fn counting_fetch(
    counter: &Arc<AtomicUsize>,
    delay: Duration,
    value: u32,
) -> impl FnOnce() -> BoxFuture<'static, Result<u32, String>> {
    let counter = Arc::clone(counter);
    move || {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            Ok::<u32, String>(value)
        }
        .boxed()
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_share_one_fetch() {
    let cache: TtlRequestCache<&str, u32, String> = TtlRequestCache::new(Duration::from_secs(60));
    let counter = Arc::new(AtomicUsize::new(0));

    let fetches: Vec<_> = (0..10)
        .map(|_| cache.get_or_fetch("reports", counting_fetch(&counter, Duration::from_secs(5), 7)))
        .collect();
    let results = join_all(fetches).await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|result| *result == Ok(7)));
}

#[tokio::test(start_paused = true)]
async fn test_caller_during_pending_fetch_binds_to_it() {
    let cache: TtlRequestCache<&str, u32, String> = TtlRequestCache::new(Duration::from_secs(60));
    let counter = Arc::new(AtomicUsize::new(0));

    let first = cache.get_or_fetch("reports", counting_fetch(&counter, Duration::from_secs(30), 1));
    let first = tokio::spawn(first);
    tokio::time::advance(Duration::from_secs(10)).await;

    let second = cache.get_or_fetch("reports", counting_fetch(&counter, Duration::ZERO, 2));

    assert_eq!(second.await, Ok(1));
    assert_eq!(first.await.expect("task joins"), Ok(1));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_is_replaced_even_while_pending() {
    let ttl = Duration::from_secs(300);
    let cache: TtlRequestCache<&str, u32, String> = TtlRequestCache::new(ttl);
    let counter = Arc::new(AtomicUsize::new(0));

    // Never awaited, so it stays pending
    let _stale = cache.get_or_fetch("reports", counting_fetch(&counter, Duration::from_secs(3600), 1));
    tokio::time::advance(ttl + Duration::from_millis(1)).await;
    assert!(!cache.is_fresh(&"reports"));

    let fresh = cache.get_or_fetch("reports", counting_fetch(&counter, Duration::ZERO, 2));
    assert_eq!(fresh.await, Ok(2));
    assert!(cache.is_fresh(&"reports"));
}

#[tokio::test(start_paused = true)]
async fn test_failure_is_cached_until_ttl() {
    let ttl = Duration::from_secs(300);
    let cache: TtlRequestCache<&str, u32, String> = TtlRequestCache::new(ttl);
    let attempts = Arc::new(AtomicUsize::new(0));

    let failing = {
        let attempts = Arc::clone(&attempts);
        move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err::<u32, String>("connection refused".to_string())
        }
    };
    assert!(cache.get_or_fetch("reports", failing.clone()).await.is_err());

    tokio::time::advance(Duration::from_secs(299)).await;
    assert!(cache.get_or_fetch("reports", failing).await.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    let retried = cache
        .get_or_fetch("reports", || async { Ok::<u32, String>(3) })
        .await;
    assert_eq!(retried, Ok(3));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_keys_are_independent() {
    let cache: TtlRequestCache<&str, u32, String> = TtlRequestCache::default();

    let a = cache.get_or_fetch("a", || async { Ok(1) }).await;
    let b = cache.get_or_fetch("b", || async { Ok(2) }).await;

    assert_eq!((a, b), (Ok(1), Ok(2)));
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}
