use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::common::*;
use crate::eligibility::check::{Check, CheckContext, CheckFailure, CheckResult};
use crate::eligibility::directory::DirectoryError;

fn failing(name: &'static str, reason: &'static str) -> Arc<Check> {
    Arc::new(
        Check::new(name)
            .with_fail_reason(reason)
            .with_rule_fn(|check, _| Err(check.fail(None, None))),
    )
}

fn passing(name: &'static str) -> Arc<Check> {
    Arc::new(Check::new(name).with_rule_fn(|_, _| Ok(())))
}

#[test]
fn own_rule_never_runs_when_a_dependency_fails() {
    let user = member();
    let directory = snapshot();
    let ctx = CheckContext::new(&user, &directory).at(now());
    let ran = Arc::new(AtomicBool::new(false));
    let spy = ran.clone();

    let gate = Check::new("gate")
        .with_fail_reason("gate fallback")
        .with_dependencies([passing("ok"), failing("blocked", "dependency said no")])
        .with_rule_fn(move |_, _| {
            spy.store(true, Ordering::SeqCst);
            Ok(())
        });

    let result = gate.check(&ctx).expect("no lookup errors");

    assert!(!ran.load(Ordering::SeqCst));
    assert!(!result.passed);
    assert_eq!(result.fail_reason, "dependency said no");
}

#[test]
fn first_failing_dependency_in_declared_order_is_reported() {
    let user = member();
    let directory = snapshot();
    let ctx = CheckContext::new(&user, &directory).at(now());
    let later_runs = Arc::new(AtomicUsize::new(0));
    let counter = later_runs.clone();
    let later = Arc::new(
        Check::new("later")
            .with_fail_reason("second reason")
            .with_rule_fn(move |check, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(check.fail(None, None))
            }),
    );

    let gate = Check::new("gate").with_dependencies([failing("earlier", "first reason"), later]);

    for _ in 0..3 {
        let result = gate.check(&ctx).expect("no lookup errors");
        assert_eq!(result.fail_reason, "first reason");
    }
    assert_eq!(later_runs.load(Ordering::SeqCst), 0);
}

#[test]
fn nested_dependencies_run_depth_first() {
    let user = member();
    let directory = snapshot();
    let ctx = CheckContext::new(&user, &directory).at(now());
    let inner = failing("inner", "inner failed");
    let middle = Arc::new(
        Check::new("middle")
            .with_fail_reason("middle failed")
            .depends_on(inner)
            .with_rule_fn(|check, _| Err(check.fail(None, None))),
    );
    let gate = Check::new("gate").with_dependencies([middle, failing("sibling", "sibling")]);

    let result = gate.check(&ctx).expect("no lookup errors");
    assert_eq!(result.fail_reason, "inner failed");
}

#[test]
fn repeated_checks_yield_identical_results() {
    let user = member();
    let directory = snapshot();
    let ctx = CheckContext::new(&user, &directory).at(now());
    let gate = Check::new("gate").with_dependencies([failing("blocked", "no")]);

    let first = gate.check(&ctx).expect("no lookup errors");
    let second = gate.check(&ctx).expect("no lookup errors");
    assert_eq!(first, second);
}

#[test]
fn passing_check_has_empty_reason_and_fix() {
    let user = member();
    let directory = snapshot();
    let ctx = CheckContext::new(&user, &directory).at(now());
    let gate = Check::new("gate")
        .with_fail_reason("unused")
        .with_fix("unused")
        .with_dependencies([passing("a"), passing("b")]);

    let result = gate.check(&ctx).expect("no lookup errors");

    assert_eq!(result, CheckResult::pass());
    assert!(result.fail_reason.is_empty());
    assert!(result.fix.is_empty());
    assert_eq!(result.to_string(), "");
    assert!(gate.passes(&ctx).expect("no lookup errors"));
}

#[test]
fn fail_falls_back_to_configured_reason_and_fix() {
    let check = Check::new("configured")
        .with_fail_reason("configured reason")
        .with_fix("configured fix");

    match check.fail(None, None) {
        CheckFailure::Ineligible(failed) => {
            assert_eq!(failed.reason(), "configured reason");
            assert_eq!(failed.fix(), Some("configured fix"));
        }
        other => panic!("expected ineligibility, got {other:?}"),
    }

    match check.fail(Some("specific".to_string()), Some("do this".to_string())) {
        CheckFailure::Ineligible(failed) => {
            assert_eq!(failed.reason(), "specific");
            assert_eq!(failed.fix(), Some("do this"));
        }
        other => panic!("expected ineligibility, got {other:?}"),
    }
}

#[test]
fn check_without_configured_reason_uses_default() {
    let user = member();
    let directory = snapshot();
    let ctx = CheckContext::new(&user, &directory).at(now());
    let check = Check::new("bare").with_rule_fn(|check, _| Err(check.fail(None, None)));

    let result = check.check(&ctx).expect("no lookup errors");
    assert_eq!(result.fail_reason, crate::eligibility::check::DEFAULT_FAIL_REASON);
    assert!(result.fix.is_empty());
}

#[test]
fn result_display_joins_reason_and_fix() {
    let result = CheckResult {
        passed: false,
        fail_reason: "You are not logged in.".to_string(),
        fix: "Login!".to_string(),
    };
    assert_eq!(result.to_string(), "You are not logged in. Login!");
}

#[test]
fn lookup_errors_propagate_instead_of_failing_the_check() {
    let user = member();
    let directory = FlakyDirectory { inner: snapshot() };
    let semester = semester();
    let ctx = CheckContext::new(&user, &directory)
        .with_semester(Some(&semester))
        .at(now());
    let check = Check::new("lookup").with_rule_fn(|_, ctx| {
        let semester = ctx.semester.expect("semester supplied");
        ctx.directory.enrollment(&ctx.user.id, &semester.id)?;
        Ok(())
    });

    match check.check(&ctx) {
        Err(DirectoryError::Unavailable(message)) => assert_eq!(message, "connection reset"),
        other => panic!("expected directory error, got {other:?}"),
    }
    assert!(check.passes(&ctx).is_err());
}

#[test]
fn outline_lists_dependency_tree_in_order() {
    let leaf = passing("leaf");
    let branch = Arc::new(Check::new("branch").depends_on(leaf.clone()));
    let gate = Check::new("gate").with_dependencies([branch, leaf]);

    assert_eq!(
        gate.outline(),
        vec![(0, "gate"), (1, "branch"), (2, "leaf"), (1, "leaf")]
    );
}
