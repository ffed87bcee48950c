//! Identity-scoped report operations.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Datelike;
use lemon_api::{ApiError, AuthApi, ReportApi, SessionApi};
use lemon_auth::{AuthError, AuthManager};
use lemon_core::{Clock, Identity, Report, ReportInput, ReportStatus, Scope};
use tokio::sync::watch;

use crate::cache::ListCache;
use crate::error::ReportError;

/// Report client bound to the identity owned by an [`AuthManager`].
///
/// Reads are scoped by the active identity at call time. Any identity
/// transition empties the list cache, including one that ends on the
/// identity it started from: reports may have been migrated in between.
pub struct ReportService<A> {
    api: Arc<A>,
    auth: Arc<AuthManager<A>>,
    clock: Arc<dyn Clock>,
    cache: ListCache,
    identity: Mutex<watch::Receiver<Identity>>,
}

impl<A> ReportService<A>
where
    A: SessionApi + AuthApi + ReportApi + 'static,
{
    pub fn new(api: Arc<A>, auth: Arc<AuthManager<A>>, clock: Arc<dyn Clock>) -> Self {
        let identity = Mutex::new(auth.subscribe());
        Self {
            api,
            auth,
            clock,
            cache: ListCache::new(),
            identity,
        }
    }

    #[must_use]
    pub fn auth(&self) -> &AuthManager<A> {
        &self.auth
    }

    #[must_use]
    pub const fn cache(&self) -> &ListCache {
        &self.cache
    }

    /// Reports visible to the active identity, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// `NoIdentity` when no session can be obtained (no request is made),
    /// otherwise the API error.
    pub async fn list_reports(&self) -> Result<Arc<Vec<Report>>, ReportError> {
        let scope = self.scope().await?;
        let key = scope.cache_key();
        self.cache
            .get_or_fetch(&key, || self.api.list_reports(&scope))
            .await
            .map_err(ReportError::from)
    }

    /// Drop the cached list for the active identity and fetch it again.
    ///
    /// # Errors
    ///
    /// See [`Self::list_reports`].
    pub async fn refresh_reports(&self) -> Result<Arc<Vec<Report>>, ReportError> {
        if let Some(scope) = self.auth.identity().scope() {
            self.cache.invalidate(&scope.cache_key());
        }
        self.list_reports().await
    }

    /// Validate and submit a new report.
    ///
    /// Validation and the premium/login rule run before any network call.
    ///
    /// # Errors
    ///
    /// `Validation`, `PremiumRequiresLogin`, `NoIdentity`,
    /// `InsufficientCredits` (HTTP 402), or the API error.
    pub async fn create_report(&self, input: &ReportInput) -> Result<Report, ReportError> {
        input.validate(self.clock.now().year())?;
        if input.is_premium() && !self.auth.identity().is_authenticated() {
            return Err(ReportError::PremiumRequiresLogin);
        }

        let scope = self.scope().await?;
        let report = self.api.create_report(&scope, input).await?;
        self.cache.invalidate(&scope.cache_key());
        let key = report.key().unwrap_or_default();
        tracing::info!(
            report = %key,
            vehicle = %report.vehicle(),
            premium = input.is_premium(),
            "report created"
        );

        if input.is_premium()
            && let Err(error) = self.auth.refresh_credits().await
        {
            tracing::debug!(%error, "credit refresh after premium report failed");
        }
        Ok(report)
    }

    /// Fetch one report.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, otherwise as [`Self::list_reports`].
    pub async fn get_report(&self, id: &str) -> Result<Report, ReportError> {
        let scope = self.scope().await?;
        self.api.get_report(&scope, id).await.map_err(|error| match error {
            ApiError::NotFound(_) => ReportError::NotFound { id: id.to_string() },
            other => other.into(),
        })
    }

    /// [`Self::get_report`] with "not found" as `Ok(None)`, for pollers.
    ///
    /// # Errors
    ///
    /// Any error other than `NotFound`.
    pub async fn lookup_report(&self, id: &str) -> Result<Option<Report>, ReportError> {
        match self.get_report(id).await {
            Ok(report) => Ok(Some(report)),
            Err(ReportError::NotFound { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Re-submit a failed report. The returned report is `processing` from
    /// the client's point of view even if the server has not caught up yet.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Core` if the report cannot be retried from its current
    /// state, or the API error.
    pub async fn retry_report(&self, id: &str) -> Result<Report, ReportError> {
        let scope = self.scope().await?;
        let returned = self.api.retry_report(&scope, id).await.map_err(|error| match error {
            ApiError::NotFound(_) => ReportError::NotFound { id: id.to_string() },
            other => other.into(),
        })?;
        self.cache.invalidate(&scope.cache_key());

        let mut report = match returned {
            Some(report) => report,
            None => self.get_report(id).await?,
        };
        if report.status == ReportStatus::Failed {
            report.transition(ReportStatus::Processing)?;
        }
        tracing::info!(report = id, status = %report.status, "report retried");
        Ok(report)
    }

    /// Resolve the request scope, obtaining an anonymous session if needed.
    async fn scope(&self) -> Result<Scope, ReportError> {
        self.sync_identity();
        let identity = self.auth.ensure_identity().await.map_err(|error| match error {
            AuthError::SessionUnavailable(_) => ReportError::NoIdentity(error),
            other => ReportError::Auth(other),
        })?;
        self.sync_identity();
        identity
            .scope()
            .ok_or(ReportError::NoIdentity(AuthError::NotAuthenticated))
    }

    /// Drop every cached list once per observed identity transition.
    ///
    /// The watch version advances on each published change, so logout
    /// followed by login as the same user still counts as a change.
    fn sync_identity(&self) {
        let mut rx = self.identity.lock().unwrap_or_else(PoisonError::into_inner);
        if !rx.has_changed().unwrap_or(false) {
            return;
        }
        let scope = rx.borrow_and_update().scope().map(|s| s.cache_key());
        tracing::debug!(scope = scope.as_deref().unwrap_or("none"), "identity changed; dropping cached report lists");
        self.cache.clear();
    }
}
