//! Rotation and retry behaviour of the provider dispatcher, driven by scripted calls.

use millet_ai_services::{CallOutcome, Degraded, Dispatcher, KeyPool};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn dispatcher(keys: &[&str]) -> Dispatcher {
    let pool = KeyPool::new(keys.iter().map(|k| k.to_string()).collect());
    Dispatcher::new(Arc::new(pool), Duration::from_secs(5))
}

/// Records which key each attempt used and replays `script` in order
/// (the last entry repeats once the script runs out).
fn scripted(
    script: Vec<CallOutcome<&'static str>>,
) -> (
    Arc<Mutex<Vec<String>>>,
    impl FnMut(String) -> std::future::Ready<CallOutcome<&'static str>>,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_call = seen.clone();
    let mut script = script.into_iter().collect::<std::collections::VecDeque<_>>();
    let call = move |key: String| {
        seen_in_call.lock().unwrap().push(key);
        let outcome = if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        };
        std::future::ready(outcome)
    };
    (seen, call)
}

#[tokio::test]
async fn success_on_first_attempt_uses_one_key() {
    let d = dispatcher(&["k1", "k2", "k3"]);
    let (seen, call) = scripted(vec![CallOutcome::Success("ok")]);

    let out = d.dispatch(call).await.unwrap();

    assert_eq!(out, "ok");
    assert_eq!(*seen.lock().unwrap(), vec!["k1"]);
}

#[tokio::test]
async fn rate_limit_rotates_to_next_key() {
    let d = dispatcher(&["k1", "k2", "k3"]);
    let (seen, call) = scripted(vec![CallOutcome::RateLimited, CallOutcome::Success("from k2")]);

    let out = d.dispatch(call).await.unwrap();

    assert_eq!(out, "from k2");
    assert_eq!(*seen.lock().unwrap(), vec!["k1", "k2"]);
}

#[tokio::test]
async fn transient_failures_are_retried_with_fresh_keys() {
    let d = dispatcher(&["k1", "k2"]);
    let (seen, call) = scripted(vec![
        CallOutcome::Transient("503".to_string()),
        CallOutcome::Success("recovered"),
    ]);

    assert_eq!(d.dispatch(call).await.unwrap(), "recovered");
    assert_eq!(*seen.lock().unwrap(), vec!["k1", "k2"]);
}

#[tokio::test]
async fn exhausts_after_pool_size_plus_one_attempts() {
    let d = dispatcher(&["k1", "k2", "k3"]);
    let (seen, call) = scripted(vec![CallOutcome::RateLimited]);

    let err = d.dispatch(call).await.unwrap_err();

    match err {
        Degraded::Exhausted { attempts, last_error } => {
            assert_eq!(attempts, 4);
            assert_eq!(last_error.as_deref(), Some("rate limited"));
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
    // Rotation wraps around: the spare attempt goes back to the first key.
    assert_eq!(*seen.lock().unwrap(), vec!["k1", "k2", "k3", "k1"]);
}

#[tokio::test]
async fn empty_pool_reports_unconfigured_without_calling() {
    let d = dispatcher(&[]);
    let (seen, call) = scripted(vec![CallOutcome::Success("never")]);

    let err = d.dispatch(call).await.unwrap_err();

    assert!(matches!(err, Degraded::Unconfigured));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn parse_fault_stops_without_retry() {
    let d = dispatcher(&["k1", "k2", "k3"]);
    let (seen, call) = scripted(vec![
        CallOutcome::ParseFault("not json".to_string()),
        CallOutcome::Success("unused"),
    ]);

    let err = d.dispatch(call).await.unwrap_err();

    assert!(matches!(err, Degraded::ParseFault(ref e) if e == "not json"));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn explicit_attempt_budget_is_respected() {
    let d = dispatcher(&["k1", "k2", "k3"]);
    let (seen, call) = scripted(vec![CallOutcome::Transient("boom".to_string())]);

    let err = d.dispatch_with(2, call).await.unwrap_err();

    assert!(matches!(err, Degraded::Exhausted { attempts: 2, .. }));
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn rotation_continues_across_dispatches() {
    let d = dispatcher(&["k1", "k2", "k3"]);

    let (first, call) = scripted(vec![CallOutcome::Success("a")]);
    d.dispatch(call).await.unwrap();
    let (second, call) = scripted(vec![CallOutcome::Success("b")]);
    d.dispatch(call).await.unwrap();

    assert_eq!(*first.lock().unwrap(), vec!["k1"]);
    assert_eq!(*second.lock().unwrap(), vec!["k2"]);
}

#[tokio::test]
async fn slow_attempt_times_out_and_next_key_is_tried() {
    let pool = KeyPool::new(vec!["slow".to_string(), "fast".to_string()]);
    let d = Dispatcher::new(Arc::new(pool), Duration::from_millis(50));

    let out = d
        .dispatch(|key: String| async move {
            if key == "slow" {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            CallOutcome::Success(key)
        })
        .await
        .unwrap();

    assert_eq!(out, "fast");
}
