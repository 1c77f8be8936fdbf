//! Tests for the contribution review service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{CreditLedgerError, MockContributionRepository, MockCreditLedger};
use crate::domain::{ErrorCode, PatternId, QualityScore, ReviewStatus};
use crate::test_support::MutableClock;
use rstest::{fixture, rstest};

#[fixture]
fn pending() -> Contribution {
    Contribution {
        id: ContributionId::random(),
        pattern_id: PatternId::new("CP-001").expect("pattern id"),
        implementation_id: crate::domain::ImplementationId::random(),
        submitted_by: UserId::random(),
        status: ReviewStatus::Pending,
        quality_score: None,
        reviewer_id: None,
        reviewed_at: None,
        credits_awarded: 0,
        rejection_reason: None,
        submitted_at: MutableClock::fixture_time(),
    }
}

fn make_service(
    repo: MockContributionRepository,
    ledger: MockCreditLedger,
) -> ContributionReviewService<MockContributionRepository, MockCreditLedger> {
    ContributionReviewService::new(
        Arc::new(repo),
        Arc::new(ledger),
        Arc::new(MutableClock::at_fixture_time()),
    )
}

fn expect_lookup(repo: &mut MockContributionRepository, contribution: &Contribution) {
    let found = contribution.clone();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(found)));
}

fn expect_commit(repo: &mut MockContributionRepository, contribution: &Contribution) {
    let base = contribution.clone();
    repo.expect_record_review()
        .times(1)
        .returning(move |record| Ok(ReviewCommit::Applied(base.clone().with_review(record))));
}

fn approve_request(contribution: &Contribution, score: Option<i64>) -> ApproveContributionRequest {
    ApproveContributionRequest {
        contribution_id: contribution.id,
        reviewer_id: UserId::random(),
        quality_score: score.map(|s| QualityScore::new(s).expect("valid score")),
    }
}

#[rstest]
#[tokio::test]
async fn approve_commits_and_awards_credits(pending: Contribution) {
    let mut repo = MockContributionRepository::new();
    expect_lookup(&mut repo, &pending);
    expect_commit(&mut repo, &pending);

    let author = pending.submitted_by;
    let implementation_id = pending.implementation_id;
    let mut ledger = MockCreditLedger::new();
    ledger
        .expect_award()
        .withf(move |award| {
            award.user_id == author
                && award.amount == APPROVAL_CREDITS
                && award.reason == CreditReason::ContributionApproved
                && award.provenance.implementation_id == implementation_id
                && award.provenance.pattern_id.as_ref() == "CP-001"
        })
        .times(1)
        .return_once(|_| Ok(()));

    let receipt = make_service(repo, ledger)
        .approve(approve_request(&pending, Some(5)))
        .await
        .expect("approval succeeds");

    assert_eq!(
        receipt,
        ApprovalReceipt {
            user_id: author,
            credits_awarded: 25,
            credit_award_failed: false,
        }
    );
}

#[rstest]
#[case(None)]
#[case(Some(1))]
#[case(Some(5))]
#[tokio::test]
async fn approve_records_optional_quality_score(pending: Contribution, #[case] score: Option<i64>) {
    let mut repo = MockContributionRepository::new();
    expect_lookup(&mut repo, &pending);
    let base = pending.clone();
    let expected = score.map(|s| QualityScore::new(s).expect("valid score"));
    repo.expect_record_review()
        .withf(move |record| {
            record.outcome
                == ReviewOutcome::Approved {
                    quality_score: expected,
                    credits: APPROVAL_CREDITS,
                }
                && record.reviewed_at == MutableClock::fixture_time()
        })
        .times(1)
        .returning(move |record| Ok(ReviewCommit::Applied(base.clone().with_review(record))));
    let mut ledger = MockCreditLedger::new();
    ledger.expect_award().times(1).return_once(|_| Ok(()));

    make_service(repo, ledger)
        .approve(approve_request(&pending, score))
        .await
        .expect("approval succeeds");
}

#[rstest]
#[tokio::test]
async fn approve_unknown_contribution_is_not_found(pending: Contribution) {
    let mut repo = MockContributionRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_record_review().times(0);
    let mut ledger = MockCreditLedger::new();
    ledger.expect_award().times(0);

    let err = make_service(repo, ledger)
        .approve(approve_request(&pending, None))
        .await
        .expect_err("missing contribution");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(ReviewStatus::Approved, "Contribution already approved")]
#[case(ReviewStatus::Rejected, "Contribution already rejected")]
#[tokio::test]
async fn approve_terminal_contribution_is_invalid_state(
    mut pending: Contribution,
    #[case] status: ReviewStatus,
    #[case] message: &str,
) {
    pending.status = status;
    let mut repo = MockContributionRepository::new();
    expect_lookup(&mut repo, &pending);
    repo.expect_record_review().times(0);
    let mut ledger = MockCreditLedger::new();
    ledger.expect_award().times(0);

    let err = make_service(repo, ledger)
        .approve(approve_request(&pending, None))
        .await
        .expect_err("already reviewed");

    assert_eq!(err.code(), ErrorCode::InvalidState);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn losing_the_commit_race_awards_nothing(pending: Contribution) {
    let mut repo = MockContributionRepository::new();
    expect_lookup(&mut repo, &pending);
    repo.expect_record_review().times(1).return_once(|_| {
        Ok(ReviewCommit::Stale {
            current: ReviewStatus::Approved,
        })
    });
    let mut ledger = MockCreditLedger::new();
    ledger.expect_award().times(0);

    let err = make_service(repo, ledger)
        .approve(approve_request(&pending, Some(3)))
        .await
        .expect_err("stale review");

    assert_eq!(err.code(), ErrorCode::InvalidState);
    assert_eq!(err.message(), "Contribution already approved");
}

#[rstest]
#[tokio::test]
async fn failed_award_keeps_the_approval(pending: Contribution) {
    let mut repo = MockContributionRepository::new();
    expect_lookup(&mut repo, &pending);
    expect_commit(&mut repo, &pending);
    let mut ledger = MockCreditLedger::new();
    ledger
        .expect_award()
        .times(1)
        .return_once(|_| Err(CreditLedgerError::write("ledger offline")));

    let receipt = make_service(repo, ledger)
        .approve(approve_request(&pending, None))
        .await
        .expect("approval still succeeds");

    assert!(receipt.credit_award_failed);
    assert_eq!(receipt.credits_awarded, APPROVAL_CREDITS);
}

#[rstest]
#[case(None, "No reason provided")]
#[case(Some("  "), "No reason provided")]
#[case(Some("Duplicates CP-002"), "Duplicates CP-002")]
#[tokio::test]
async fn reject_records_reason_without_credits(
    pending: Contribution,
    #[case] reason: Option<&str>,
    #[case] expected: &str,
) {
    let mut repo = MockContributionRepository::new();
    expect_lookup(&mut repo, &pending);
    let expected_reason = expected.to_owned();
    let base = pending.clone();
    repo.expect_record_review()
        .withf(move |record| {
            record.outcome
                == ReviewOutcome::Rejected {
                    reason: expected_reason.clone(),
                }
        })
        .times(1)
        .returning(move |record| Ok(ReviewCommit::Applied(base.clone().with_review(record))));
    let mut ledger = MockCreditLedger::new();
    ledger.expect_award().times(0);

    let receipt = make_service(repo, ledger)
        .reject(RejectContributionRequest {
            contribution_id: pending.id,
            reviewer_id: UserId::random(),
            reason: reason.map(str::to_owned),
        })
        .await
        .expect("rejection succeeds");

    assert_eq!(receipt.user_id, pending.submitted_by);
    assert_eq!(receipt.reason, expected);
}

#[rstest]
#[tokio::test]
async fn repository_failures_are_internal(pending: Contribution) {
    let mut repo = MockContributionRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| Err(ContributionPersistenceError::connection("pool exhausted")));
    let ledger = MockCreditLedger::new();

    let err = make_service(repo, ledger)
        .reject(RejectContributionRequest {
            contribution_id: pending.id,
            reviewer_id: UserId::random(),
            reason: None,
        })
        .await
        .expect_err("repository down");

    assert_eq!(err.code(), ErrorCode::InternalError);
}
