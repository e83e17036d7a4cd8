//! Application context: configuration, the REST client, and the signed-in
//! session, owned in one place.
//!
//! The bearer token is the only state shared across screens. It is set by
//! [`AppContext::login`], cleared by [`AppContext::logout`], and mirrored to
//! device storage so a restart can [`AppContext::restore`] it.

use dermadetect_api::analysis::RemoteAnalyzer;
use dermadetect_api::client::ApiClient;
use dermadetect_core::models::risk::RiskLevel;
use dermadetect_core::models::sync::{SyncEnvelope, SyncResponse};
use dermadetect_core::models::user::{Profile, Role, User};
use dermadetect_triage::classifier::{AnalysisRequest, ImageCountClassifier, RiskAnalyzer};
use dermadetect_triage::error::TriageError;
use dermadetect_triage::flow::TriageController;
use dermadetect_triage::session::Consent;
use tracing::{info, warn};

use crate::config::{AppConfig, ClassifierMode};
use crate::storage::{AUTH_TOKEN_KEY, AUTH_USER_KEY, KeyValueStore};

/// Token and user for the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// The analyzer selected by [`AppConfig::classifier`].
#[derive(Debug, Clone)]
pub enum ConfiguredAnalyzer {
    Local(ImageCountClassifier),
    Remote(RemoteAnalyzer),
}

impl RiskAnalyzer for ConfiguredAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<RiskLevel, TriageError> {
        match self {
            ConfiguredAnalyzer::Local(analyzer) => analyzer.analyze(request).await,
            ConfiguredAnalyzer::Remote(analyzer) => analyzer.analyze(request).await,
        }
    }
}

pub type Triage = TriageController<ConfiguredAnalyzer, ApiClient>;

pub struct AppContext<S> {
    config: AppConfig,
    client: ApiClient,
    store: S,
    session: Option<AuthSession>,
}

impl<S: KeyValueStore> AppContext<S> {
    /// A signed-out context.
    pub fn new(config: AppConfig, store: S) -> Self {
        let client = ApiClient::new(&config.api_base_url);
        Self {
            config,
            client,
            store,
            session: None,
        }
    }

    /// Pick up a session persisted by an earlier [`login`](Self::login).
    ///
    /// A token without a readable user record is discarded.
    pub fn restore(config: AppConfig, store: S) -> eyre::Result<Self> {
        let mut ctx = Self::new(config, store);

        let Some(token) = ctx.store.get(AUTH_TOKEN_KEY)? else {
            return Ok(ctx);
        };
        let user = ctx
            .store
            .get(AUTH_USER_KEY)?
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "stored user record is unreadable");
                    None
                }
            });

        match user {
            Some(user) => {
                info!(user_id = %user.id, role = ?user.role, "restored session");
                ctx.install(AuthSession { token, user });
            }
            None => {
                ctx.store.remove(AUTH_TOKEN_KEY)?;
                ctx.store.remove(AUTH_USER_KEY)?;
            }
        }
        Ok(ctx)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.user.role)
    }

    /// Authenticate, then store the token and user. Nothing is stored if
    /// the server rejects the credentials.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        role: Role,
    ) -> eyre::Result<&AuthSession> {
        let email_owned = email.to_string();
        let password = password.to_string();
        let response = self
            .client
            .run(move |client| client.login(&email_owned, &password, role))
            .await?;

        self.store.set(AUTH_TOKEN_KEY, &response.access_token)?;
        self.store
            .set(AUTH_USER_KEY, &serde_json::to_string(&response.user)?)?;

        info!(email, user_id = %response.user.id, role = ?response.user.role, "logged in");
        let session = AuthSession {
            token: response.access_token,
            user: response.user,
        };
        Ok(self.install(session))
    }

    /// Forget the session locally. The server is not contacted.
    pub fn logout(&mut self) -> eyre::Result<()> {
        self.store.remove(AUTH_TOKEN_KEY)?;
        self.store.remove(AUTH_USER_KEY)?;
        self.client.clear_token();
        if let Some(session) = self.session.take() {
            info!(user_id = %session.user.id, "logged out");
        }
        Ok(())
    }

    pub fn analyzer(&self) -> ConfiguredAnalyzer {
        match self.config.classifier {
            ClassifierMode::Local => {
                ConfiguredAnalyzer::Local(ImageCountClassifier::new(self.config.simulated_delay()))
            }
            ClassifierMode::Remote => ConfiguredAnalyzer::Remote(RemoteAnalyzer::with_path(
                self.client.clone(),
                &self.config.analysis_path,
            )),
        }
    }

    /// Start a triage for a consenting patient. The controller holds its
    /// own clone of the client, so it keeps the token current at this call.
    pub fn begin_triage(&self, patient_id: &str) -> eyre::Result<Triage> {
        let consent = Consent::record(patient_id)?;
        info!(
            patient_id = consent.patient_id(),
            classifier = ?self.config.classifier,
            "starting triage"
        );
        Ok(TriageController::new(
            consent,
            self.analyzer(),
            self.client.clone(),
        ))
    }

    pub async fn profile(&self) -> eyre::Result<Profile> {
        Ok(self.client.run(|client| client.current_user()).await?)
    }

    pub async fn sync(&self, envelope: SyncEnvelope) -> eyre::Result<SyncResponse> {
        Ok(self.client.run(move |client| client.sync(&envelope)).await?)
    }

    fn install(&mut self, session: AuthSession) -> &AuthSession {
        self.client.set_token(session.token.clone());
        self.session.insert(session)
    }
}
