use std::cell::RefCell;
use std::fmt;
use std::time::Duration;

use squarefund::core::retry::{
    Classify, Completion, FailureKind, RetryCaller, RetryError, RetryPolicy,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Failure {
    kind: FailureKind,
    attempt: usize,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} failure on attempt {}", self.kind, self.attempt)
    }
}

impl Classify for Failure {
    fn failure_kind(&self) -> FailureKind {
        self.kind
    }
}

/// Runs `caller` over a script of per-attempt outcomes (`None` = success) and
/// returns the result plus the instant each attempt started.
async fn run_script(
    caller: &RetryCaller,
    script: &[Option<FailureKind>],
) -> (Result<Completion<usize>, RetryError<Failure>>, Vec<Instant>) {
    let starts = RefCell::new(Vec::new());
    let result = caller
        .call(|| {
            let attempt = {
                let mut starts = starts.borrow_mut();
                starts.push(Instant::now());
                starts.len() - 1
            };
            let outcome = match script.get(attempt).copied().flatten() {
                None => Ok(attempt),
                Some(kind) => Err(Failure { kind, attempt }),
            };
            async move { outcome }
        })
        .await;
    (result, starts.into_inner())
}

fn gaps(starts: &[Instant]) -> Vec<Duration> {
    starts.windows(2).map(|w| w[1] - w[0]).collect()
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_every_time_degrades_after_all_attempts() {
    let caller = RetryCaller::new(RetryPolicy::default());
    let script = [Some(FailureKind::Unavailable); 3];

    let (result, starts) = run_script(&caller, &script).await;

    assert_eq!(result.unwrap(), Completion::Degraded { attempts: 3 });
    assert_eq!(starts.len(), 3);
    assert_eq!(
        gaps(&starts),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_waits_double_for_any_policy() {
    for (max_attempts, base_ms) in [(1, 1000), (2, 50), (4, 300), (6, 7)] {
        let policy = RetryPolicy::new(max_attempts, Duration::from_millis(base_ms));
        let caller = RetryCaller::new(policy);
        let script = vec![Some(FailureKind::Unavailable); max_attempts as usize];

        let (result, starts) = run_script(&caller, &script).await;

        assert_eq!(
            result.unwrap(),
            Completion::Degraded {
                attempts: max_attempts
            }
        );
        assert_eq!(starts.len(), max_attempts as usize);
        let expected: Vec<Duration> = (0..max_attempts.saturating_sub(1))
            .map(|i| Duration::from_millis(base_ms * 2u64.pow(i)))
            .collect();
        assert_eq!(gaps(&starts), expected, "policy {policy:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_success_on_attempt_k_stops_immediately() {
    let caller = RetryCaller::new(RetryPolicy::default());

    for k in 0..3 {
        let mut script = vec![Some(FailureKind::Fault); k];
        script.push(None);

        let before = Instant::now();
        let (result, starts) = run_script(&caller, &script).await;

        assert_eq!(result.unwrap(), Completion::Delivered(k));
        assert_eq!(starts.len(), k + 1);
        // No wait happens after the successful attempt.
        assert_eq!(Instant::now(), *starts.last().unwrap());
        let waited: Duration = gaps(&starts).into_iter().sum();
        assert_eq!(Instant::now() - before, waited);
    }
}

#[tokio::test(start_paused = true)]
async fn test_faults_every_time_reraise_last_error() {
    let caller = RetryCaller::new(RetryPolicy::default());
    let script = [Some(FailureKind::Fault); 3];

    let (result, starts) = run_script(&caller, &script).await;

    match result {
        Err(RetryError::Exhausted {
            attempts,
            last_error,
        }) => {
            assert_eq!(attempts, 3);
            assert_eq!(last_error.attempt, 2);
        }
        other => panic!("expected exhausted faults, got {other:?}"),
    }
    assert_eq!(starts.len(), 3);
    assert_eq!(
        gaps(&starts),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_final_attempt_kind_decides_fallback_or_error() {
    let caller = RetryCaller::new(RetryPolicy::default());

    let faults_then_status = [
        Some(FailureKind::Fault),
        Some(FailureKind::Fault),
        Some(FailureKind::Unavailable),
    ];
    let (result, _) = run_script(&caller, &faults_then_status).await;
    assert_eq!(result.unwrap(), Completion::Degraded { attempts: 3 });

    let status_then_fault = [
        Some(FailureKind::Unavailable),
        Some(FailureKind::Unavailable),
        Some(FailureKind::Fault),
    ];
    let (result, _) = run_script(&caller, &status_then_fault).await;
    assert!(matches!(
        result,
        Err(RetryError::Exhausted { attempts: 3, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_fatal_failure_is_not_retried() {
    let caller = RetryCaller::new(RetryPolicy::default());
    let before = Instant::now();

    let (result, starts) = run_script(&caller, &[Some(FailureKind::Fatal)]).await;

    match result {
        Err(RetryError::Fatal { attempts, error }) => {
            assert_eq!(attempts, 1);
            assert_eq!(error.attempt, 0);
        }
        other => panic!("expected fatal failure, got {other:?}"),
    }
    assert_eq!(starts.len(), 1);
    assert_eq!(Instant::now(), before);
}

#[tokio::test(start_paused = true)]
async fn test_fatal_after_retries_reports_attempts_performed() {
    let caller = RetryCaller::new(RetryPolicy::default());
    let script = [
        Some(FailureKind::Unavailable),
        Some(FailureKind::Unavailable),
        Some(FailureKind::Fatal),
    ];

    let (result, starts) = run_script(&caller, &script).await;

    let err = result.unwrap_err();
    assert_eq!(err.attempts(), 3);
    match err {
        RetryError::Fatal { attempts, error } => {
            assert_eq!(attempts, 3);
            assert_eq!(error.attempt, 2);
        }
        other => panic!("expected fatal failure, got {other:?}"),
    }
    assert_eq!(starts.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_fatal_on_second_attempt_stops_without_further_waits() {
    let caller = RetryCaller::new(RetryPolicy::new(5, Duration::from_millis(7)));
    let before = Instant::now();

    let (result, starts) = run_script(
        &caller,
        &[Some(FailureKind::Fault), Some(FailureKind::Fatal)],
    )
    .await;

    assert!(matches!(result, Err(RetryError::Fatal { attempts: 2, .. })));
    assert_eq!(starts.len(), 2);
    assert_eq!(Instant::now() - before, Duration::from_millis(7));
}

#[tokio::test(start_paused = true)]
async fn test_invocations_share_no_state() {
    let caller = RetryCaller::new(RetryPolicy::default());

    let (first, first_starts) = run_script(&caller, &[None]).await;
    let (second, second_starts) = run_script(&caller, &[None]).await;

    assert_eq!(first.unwrap(), Completion::Delivered(0));
    assert_eq!(second.unwrap(), Completion::Delivered(0));
    assert_eq!(first_starts.len(), 1);
    assert_eq!(second_starts.len(), 1);

    // A degraded run does not carry its attempt count into the next call.
    let (degraded, _) = run_script(&caller, &[Some(FailureKind::Unavailable); 3]).await;
    assert_eq!(degraded.unwrap(), Completion::Degraded { attempts: 3 });
    let (after, starts) = run_script(&caller, &[Some(FailureKind::Fault), None]).await;
    assert_eq!(after.unwrap(), Completion::Delivered(1));
    assert_eq!(gaps(&starts), vec![Duration::from_millis(1000)]);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_first_attempt() {
    let token = CancellationToken::new();
    token.cancel();
    let caller = RetryCaller::new(RetryPolicy::default()).with_cancellation(token);

    let (result, starts) = run_script(&caller, &[None]).await;

    assert!(matches!(result, Err(RetryError::Cancelled { attempts: 0 })));
    assert!(starts.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_interrupts_backoff_wait() {
    let token = CancellationToken::new();
    let caller = RetryCaller::new(RetryPolicy::default()).with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        token.cancel();
    });

    let before = Instant::now();
    let (result, starts) = run_script(&caller, &[Some(FailureKind::Unavailable); 3]).await;
    canceller.await.unwrap();

    assert!(matches!(result, Err(RetryError::Cancelled { attempts: 1 })));
    assert_eq!(starts.len(), 1);
    assert_eq!(Instant::now() - before, Duration::from_millis(500));
}

#[test]
fn test_retry_error_reports_attempts() {
    let exhausted: RetryError<Failure> = RetryError::Exhausted {
        attempts: 3,
        last_error: Failure {
            kind: FailureKind::Fault,
            attempt: 2,
        },
    };
    assert_eq!(exhausted.attempts(), 3);
    assert_eq!(
        exhausted.to_string(),
        "retries exhausted after 3 attempts: Fault failure on attempt 2"
    );
    assert_eq!(
        RetryError::<Failure>::Cancelled { attempts: 1 }.to_string(),
        "cancelled after 1 attempts"
    );

    let fatal = RetryError::Fatal {
        attempts: 2,
        error: Failure {
            kind: FailureKind::Fatal,
            attempt: 1,
        },
    };
    assert_eq!(fatal.attempts(), 2);
    assert_eq!(fatal.to_string(), "Fatal failure on attempt 1");
}
