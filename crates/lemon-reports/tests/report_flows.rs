mod common;

use common::{civic, harness};
use lemon_auth::Registration;
use lemon_core::{Report, ReportOwner, ReportStatus, Scope};
use lemon_reports::{PollSchedule, Poller, ReportError, Tier};
use pretty_assertions::assert_eq;

fn dana() -> Registration {
    Registration {
        display_name: "Dana".into(),
        email: "dana@example.com".into(),
        password: "hunter22".into(),
        password_confirmation: "hunter22".into(),
    }
}

#[tokio::test]
async fn anonymous_reports_follow_the_user_after_registration() {
    let h = harness();
    let created = h.service.create_report(&civic(60_000)).await.unwrap();
    assert_eq!(created.owner, Some(ReportOwner::Session("abc".into())));

    let anonymous = h.service.list_reports().await.unwrap();
    assert_eq!(anonymous.len(), 1);
    assert_eq!(anonymous[0].vehicle(), "2018 Honda Civic");
    assert!(!anonymous[0].status.is_terminal());
    assert!(h.service.cache().is_fresh("session:abc"));

    h.auth.register(&dana()).await.unwrap();
    let calls_before = h.server.list_calls();
    let owned = h.service.list_reports().await.unwrap();

    assert_eq!(h.server.list_calls(), calls_before + 1);
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].owner, Some(ReportOwner::User("7".into())));
    assert!(h.service.cache().is_fresh("user:7"));
    assert!(!h.service.cache().is_fresh("session:abc"));
    assert!(matches!(
        h.server.with(|s| s.scopes.last().cloned()),
        Some(Scope::User { .. })
    ));
}

#[tokio::test]
async fn payment_required_surfaces_as_insufficient_credits() {
    let h = harness();
    h.server.with(|s| s.out_of_credits = true);

    let err = h.service.create_report(&civic(60_000)).await.unwrap_err();
    match err {
        ReportError::InsufficientCredits {
            required, current, ..
        } => {
            assert_eq!(required, Some(1));
            assert_eq!(current, Some(0));
        }
        other => panic!("expected insufficient credits, got {other:?}"),
    }
    assert!(h.service.list_reports().await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_mileage_never_reaches_the_network() {
    let h = harness();
    for mileage in [0, 1_000_001] {
        let err = h.service.create_report(&civic(mileage)).await.unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)), "{err:?}");
    }
    assert_eq!(h.server.create_calls(), 0);
    assert_eq!(h.server.with(|s| s.sessions_issued), 0);

    h.service.create_report(&civic(1_000_000)).await.unwrap();
    assert_eq!(h.server.create_calls(), 1);
}

#[tokio::test]
async fn premium_input_requires_an_account() {
    let h = harness();
    let mut input = civic(60_000);
    input.zip_code = Some("94107".into());

    let err = h.service.create_report(&input).await.unwrap_err();
    assert!(matches!(err, ReportError::PremiumRequiresLogin));
    assert_eq!(h.server.create_calls(), 0);

    h.auth.register(&dana()).await.unwrap();
    h.server.with(|s| s.credits = 1);
    let report = h.service.create_report(&input).await.unwrap();
    assert!(report.is_premium);
    assert_eq!(h.auth.identity().user().unwrap().credits, 1);
}

#[tokio::test]
async fn list_is_cached_until_a_write_lands() {
    let h = harness();
    h.service.list_reports().await.unwrap();
    h.service.list_reports().await.unwrap();
    assert_eq!(h.server.list_calls(), 1);

    h.service.create_report(&civic(60_000)).await.unwrap();
    let list = h.service.list_reports().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(h.server.list_calls(), 2);

    h.service.refresh_reports().await.unwrap();
    assert_eq!(h.server.list_calls(), 3);
}

#[tokio::test]
async fn concurrent_list_reads_share_one_request() {
    let h = harness();
    h.auth.bootstrap().await;
    let (a, b, c) = tokio::join!(
        h.service.list_reports(),
        h.service.list_reports(),
        h.service.list_reports()
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(h.server.list_calls(), 1);
}

#[tokio::test]
async fn failed_report_retries_into_fast_polling() {
    let h = harness();
    let created = h.service.create_report(&civic(60_000)).await.unwrap();
    let id = created.key().unwrap();
    h.server.with(|s| s.reports[0].status = ReportStatus::Failed);

    let retried = h.service.retry_report(&id).await.unwrap();
    assert_eq!(retried.status, ReportStatus::Processing);

    let poller = Poller::after_retry(PollSchedule::default(), retried);
    assert_eq!(poller.tier(), Tier::ActiveFast);
}

#[tokio::test]
async fn unknown_report_is_not_found() {
    let h = harness();
    let err = h.service.get_report("nope").await.unwrap_err();
    assert!(matches!(err, ReportError::NotFound { ref id } if id == "nope"));
    assert!(h.service.lookup_report("nope").await.unwrap().is_none());
    assert!(matches!(
        h.service.retry_report("nope").await,
        Err(ReportError::NotFound { .. })
    ));
}

#[tokio::test]
async fn no_session_disables_reports_without_requests() {
    let h = harness();
    h.server.with(|s| s.sessions_down = true);

    let err = h.service.list_reports().await.unwrap_err();
    assert!(matches!(err, ReportError::NoIdentity(_)));
    assert_eq!(h.server.list_calls(), 0);
    assert!(matches!(
        h.service.create_report(&civic(60_000)).await,
        Err(ReportError::NoIdentity(_))
    ));
    assert_eq!(h.server.create_calls(), 0);
}

#[tokio::test]
async fn logout_drops_the_account_list() {
    let h = harness();
    h.auth.register(&dana()).await.unwrap();
    h.service.list_reports().await.unwrap();
    assert!(h.service.cache().is_fresh("user:7"));

    h.auth.logout().await.unwrap();
    h.service.list_reports().await.unwrap();
    assert!(!h.service.cache().is_fresh("user:7"));
    assert!(matches!(
        h.server.with(|s| s.scopes.last().cloned()),
        Some(Scope::Session { .. })
    ));
}

#[tokio::test]
async fn logging_back_in_refetches_the_account_list() {
    let h = harness();
    h.auth.register(&dana()).await.unwrap();
    assert!(h.service.list_reports().await.unwrap().is_empty());
    assert_eq!(h.server.list_calls(), 1);

    h.auth.logout().await.unwrap();
    let session = h.auth.identity().session_id().unwrap().to_string();
    h.server.seed(Report {
        uuid: Some("r-anon".into()),
        make: "Honda".into(),
        model: "Civic".into(),
        year: 2018,
        mileage: 60_000,
        owner: Some(ReportOwner::Session(session)),
        ..Report::default()
    });
    h.auth.login("dana@example.com", "hunter22").await.unwrap();

    let reports = h.service.list_reports().await.unwrap();
    assert_eq!(h.server.list_calls(), 2);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].key().as_deref(), Some("r-anon"));
    assert_eq!(reports[0].owner, Some(ReportOwner::User("7".into())));
}
