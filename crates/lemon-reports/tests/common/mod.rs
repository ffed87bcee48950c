//! In-memory LemonLens server for report flow tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{TimeDelta, TimeZone, Utc};
use lemon_api::http::classify;
use lemon_api::{
    ApiError, AuthApi, AuthResponse, GoogleLoginRequest, LoginRequest, RegisterRequest, ReportApi,
    SessionApi, UserProfile,
};
use lemon_auth::{AuthManager, MemoryStorage};
use lemon_core::{ManualClock, Report, ReportInput, ReportOwner, ReportStatus, Scope};
use lemon_reports::ReportService;
use serde_json::json;

#[derive(Default)]
pub struct ServerState {
    pub reports: Vec<Report>,
    pub sessions_issued: usize,
    pub sessions_down: bool,
    pub out_of_credits: bool,
    pub credits: u32,
    pub list_calls: usize,
    pub create_calls: usize,
    pub scopes: Vec<Scope>,
}

#[derive(Default)]
pub struct FakeServer {
    pub state: Mutex<ServerState>,
}

impl FakeServer {
    pub fn with<T>(&self, f: impl FnOnce(&mut ServerState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    pub fn list_calls(&self) -> usize {
        self.with(|s| s.list_calls)
    }

    pub fn create_calls(&self) -> usize {
        self.with(|s| s.create_calls)
    }

    pub fn seed(&self, report: Report) {
        self.with(|s| s.reports.push(report));
    }

    fn owner_of(scope: &Scope) -> ReportOwner {
        match scope {
            Scope::User { user_id, .. } => ReportOwner::User(user_id.clone()),
            Scope::Session { session_id } => ReportOwner::Session(session_id.clone()),
        }
    }

    /// Moves every report of `session_id` to user 7, like the server does on
    /// login and registration.
    fn authenticate(&self, session_id: Option<&str>) -> AuthResponse {
        let migrated = self.with(|s| {
            let mut count = 0;
            for report in &mut s.reports {
                let from_session = matches!(
                    (&report.owner, session_id),
                    (Some(ReportOwner::Session(owner)), Some(sid)) if owner == sid
                );
                if from_session {
                    report.owner = Some(ReportOwner::User("7".into()));
                    count += 1;
                }
            }
            count
        });
        serde_json::from_value(json!({
            "user": {"id": 7, "name": "Dana", "email": "dana@example.com", "credits": 2},
            "token": "tok-7",
            "migrated_reports": migrated,
        }))
        .unwrap()
    }
}

impl SessionApi for FakeServer {
    async fn issue_session(&self) -> Result<String, ApiError> {
        self.with(|s| {
            if s.sessions_down {
                return Err(ApiError::Api {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            s.sessions_issued += 1;
            Ok(if s.sessions_issued == 1 {
                "abc".to_string()
            } else {
                format!("sess-{}", s.sessions_issued)
            })
        })
    }
}

impl AuthApi for FakeServer {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        Ok(self.authenticate(request.session_id.as_deref()))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        Ok(self.authenticate(request.session_id.as_deref()))
    }

    async fn login_google(&self, request: &GoogleLoginRequest) -> Result<AuthResponse, ApiError> {
        Ok(self.authenticate(request.session_id.as_deref()))
    }

    async fn logout(&self, _token: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn me(&self, _token: &str) -> Result<UserProfile, ApiError> {
        Ok(UserProfile {
            id: "7".into(),
            name: "Dana".into(),
            email: "dana@example.com".into(),
            credits: Some(self.with(|s| s.credits)),
        })
    }
}

impl ReportApi for FakeServer {
    async fn list_reports(&self, scope: &Scope) -> Result<Vec<Report>, ApiError> {
        // Yield so concurrent callers genuinely overlap.
        tokio::task::yield_now().await;
        let owner = Self::owner_of(scope);
        Ok(self.with(|s| {
            s.list_calls += 1;
            s.scopes.push(scope.clone());
            s.reports
                .iter()
                .filter(|r| r.owner.as_ref() == Some(&owner))
                .cloned()
                .collect()
        }))
    }

    async fn get_report(&self, scope: &Scope, id: &str) -> Result<Report, ApiError> {
        let owner = Self::owner_of(scope);
        self.with(|s| {
            s.reports
                .iter()
                .find(|r| r.key().as_deref() == Some(id) && r.owner.as_ref() == Some(&owner))
                .cloned()
                .ok_or_else(|| classify(404, r#"{"error":"Report not found"}"#))
        })
    }

    async fn create_report(&self, scope: &Scope, input: &ReportInput) -> Result<Report, ApiError> {
        self.with(|s| {
            s.create_calls += 1;
            if s.out_of_credits {
                return Err(classify(
                    402,
                    r#"{"error":"Insufficient credits","required_credits":1,"current_credits":0}"#,
                ));
            }
            let report = Report {
                uuid: Some(format!("r-{}", s.create_calls)),
                make: input.make.clone(),
                model: input.model.clone(),
                year: input.year,
                mileage: input.wire_mileage(),
                is_premium: input.is_premium(),
                owner: Some(Self::owner_of(scope)),
                status: ReportStatus::Pending,
                created_at: Some(Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap()),
                ..Report::default()
            };
            s.reports.push(report.clone());
            Ok(report)
        })
    }

    async fn retry_report(&self, scope: &Scope, id: &str) -> Result<Option<Report>, ApiError> {
        self.get_report(scope, id).await?;
        // Acknowledged without a body; the caller reads the report back.
        Ok(None)
    }
}

pub struct Harness {
    pub server: Arc<FakeServer>,
    pub auth: Arc<AuthManager<FakeServer>>,
    pub service: ReportService<FakeServer>,
}

pub fn harness() -> Harness {
    let server = Arc::new(FakeServer::default());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap(),
    ));
    let auth = Arc::new(
        AuthManager::new(
            Arc::clone(&server),
            Arc::new(MemoryStorage::default()),
            clock.clone(),
            TimeDelta::hours(24),
        )
        .unwrap(),
    );
    let service = ReportService::new(Arc::clone(&server), Arc::clone(&auth), clock);
    Harness {
        server,
        auth,
        service,
    }
}

pub fn civic(mileage: i64) -> ReportInput {
    ReportInput {
        make: "Honda".into(),
        model: "Civic".into(),
        year: 2018,
        mileage,
        ..ReportInput::default()
    }
}
