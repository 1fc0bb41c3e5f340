use std::sync::Arc;

use marketdesk_core::{AppError, BearerToken, Language, RecordId};
use marketdesk_domain::{RequestStatus, ReviewDecision};

use super::{RowActions, SubscriptionRequestReview};
use crate::list_store::FetchFailurePolicy;
use crate::screen_ports::NoticeLevel;
use crate::session::AdminSession;
use crate::test_fakes::{FakeNotifier, FakeRequestBackend, pending_request};

async fn review(
    backend: &FakeRequestBackend,
    language: Language,
) -> (SubscriptionRequestReview, Arc<FakeNotifier>) {
    let notifier = Arc::new(FakeNotifier::default());
    let session = AdminSession::new();
    session
        .start(
            BearerToken::new("token").unwrap_or_else(|_| panic!("test")),
            language,
        )
        .await;
    let review = SubscriptionRequestReview::new(
        Arc::new(backend.clone()),
        notifier.clone(),
        session,
        FetchFailurePolicy::default(),
    );
    (review, notifier)
}

#[tokio::test]
async fn approval_settles_row() {
    let backend = FakeRequestBackend::with_requests(vec![pending_request(1), pending_request(2)]);
    let (review, notifier) = review(&backend, Language::En).await;
    assert!(review.load().await.is_ok());

    let approved = review.approve(RecordId::new(1)).await;

    assert_eq!(
        approved.map(|request| request.status),
        Ok(RequestStatus::Approved)
    );
    let rows = review.rows().await;
    assert_eq!(rows[0].0.status, RequestStatus::Approved);
    assert_eq!(rows[0].1, RowActions::Settled("Already approved".to_owned()));
    assert_eq!(
        rows[1].1,
        RowActions::Decide(&[ReviewDecision::Approve, ReviewDecision::Reject])
    );
    assert_eq!(notifier.levels(), vec![NoticeLevel::Success]);
    assert_eq!(
        notifier.notices()[0].message,
        "Subscription request approved"
    );
}

#[tokio::test]
async fn failed_approval_rolls_back_to_pending() {
    let backend = FakeRequestBackend::with_requests(vec![pending_request(1)]);
    let (review, notifier) = review(&backend, Language::En).await;
    assert!(review.load().await.is_ok());
    backend
        .fail_next(AppError::Internal("status 500".to_owned()))
        .await;

    let result = review.approve(RecordId::new(1)).await;

    assert!(result.is_err());
    assert_eq!(
        review.store().snapshot().await[0].status,
        RequestStatus::Pending
    );
    assert_eq!(notifier.levels(), vec![NoticeLevel::Error]);
}

#[tokio::test]
async fn settled_request_cannot_be_decided_again() {
    let backend = FakeRequestBackend::with_requests(vec![pending_request(1)]);
    let (review, _) = review(&backend, Language::En).await;
    assert!(review.load().await.is_ok());
    assert!(review.approve(RecordId::new(1)).await.is_ok());

    let result = review.reject(RecordId::new(1), Some("late")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(backend.decisions().await.len(), 1);
}

#[tokio::test]
async fn rejection_sends_reason() {
    let backend = FakeRequestBackend::with_requests(vec![pending_request(3)]);
    let (review, _) = review(&backend, Language::Ar).await;
    assert!(review.load().await.is_ok());

    let rejected = review
        .reject(RecordId::new(3), Some("blurry receipt"))
        .await;

    assert_eq!(
        rejected.map(|request| request.rejection_reason),
        Ok(Some("blurry receipt".to_owned()))
    );
    assert_eq!(
        backend.decisions().await,
        vec![(
            RecordId::new(3),
            ReviewDecision::Reject,
            Some("blurry receipt".to_owned())
        )]
    );
    let rows = review.rows().await;
    assert_eq!(rows[0].1, RowActions::Settled("تم الرفض مسبقاً".to_owned()));
}

#[tokio::test]
async fn status_filter_all_shows_everything() {
    let backend = FakeRequestBackend::with_requests(vec![pending_request(1), pending_request(2)]);
    let (mut review, _) = review(&backend, Language::En).await;
    assert!(review.load().await.is_ok());
    assert!(review.approve(RecordId::new(2)).await.is_ok());

    review.set_status_filter("pending");
    assert_eq!(review.rows().await.len(), 1);

    review.set_status_filter("all");
    assert_eq!(review.rows().await.len(), 2);
}
