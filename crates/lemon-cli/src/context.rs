use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use lemon_api::ApiClient;
use lemon_auth::{AuthManager, TokenStore};
use lemon_config::LemonConfig;
use lemon_core::{Clock, SystemClock};
use lemon_reports::{PollSchedule, ReportService};

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub config: LemonConfig,
    pub api: Arc<ApiClient>,
    pub auth: Arc<AuthManager<ApiClient>>,
    pub reports: ReportService<ApiClient>,
    pub state_dir: PathBuf,
}

impl AppContext {
    pub fn init(config: LemonConfig) -> anyhow::Result<Self> {
        let state_dir = config
            .session
            .resolved_state_dir()
            .context("home directory not found; set LEMONLENS_SESSION__STATE_DIR")?;
        let api = Arc::new(ApiClient::new(&config.api).context("invalid api configuration")?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let auth = Arc::new(
            lemon_auth::from_config(Arc::clone(&api), &config.session, Arc::clone(&clock))
                .context("failed to restore identity")?,
        );
        let reports = ReportService::new(Arc::clone(&api), Arc::clone(&auth), clock);

        if !config.api.has_api_key() {
            tracing::debug!(base_url = api.base_url(), "no api key configured");
        }
        Ok(Self {
            config,
            api,
            auth,
            reports,
            state_dir,
        })
    }

    #[must_use]
    pub const fn poll_schedule(&self) -> PollSchedule {
        PollSchedule::from_config(&self.config.polling)
    }

    /// Which credential tier holds the bearer token, for status output.
    #[must_use]
    pub fn token_source(&self) -> Option<&'static str> {
        TokenStore::keyring(&self.state_dir).source()
    }
}
