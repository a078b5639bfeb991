use crate::api::{AuthError, WatchlistApi};
use crate::models::Credentials;
use crate::token::{decode_username, TokenStore, TOKEN_KEY};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const REGISTERED_MESSAGE: &str = "Registered successfully! Please login.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn endpoint(self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Register => "register",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    LoggedIn { username: String },
    Registered { message: String },
}

pub struct SessionController {
    api: Arc<dyn WatchlistApi>,
    store: Arc<dyn TokenStore>,
    session: Option<Session>,
    mode: AuthMode,
    form: Credentials,
}

impl SessionController {
    pub fn new(api: Arc<dyn WatchlistApi>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            session: None,
            mode: AuthMode::Login,
            form: Credentials::default(),
        }
    }

    // Offline. Anything unreadable leaves the user signed out.
    pub fn restore_session(&mut self) -> Option<&Session> {
        let token = match self.store.get(TOKEN_KEY) {
            Ok(t) => t,
            Err(e) => {
                warn!("Failed to read persisted token: {:#}", e);
                None
            }
        };
        self.session = token.and_then(|token| {
            decode_username(&token).map(|username| Session { username, token })
        });
        match &self.session {
            Some(s) => info!("Restored session for '{}'", s.username),
            None => info!("No persisted session"),
        }
        self.session.as_ref()
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<&Session, AuthError> {
        let response = self.api.login(credentials).await.map_err(|e| {
            warn!("Login failed for '{}': {}", credentials.username, e);
            e
        })?;
        if let Err(e) = self.store.set(TOKEN_KEY, &response.token) {
            warn!("Failed to persist token: {:#}", e);
        }
        info!("Logged in as '{}'", response.username);
        Ok(&*self.session.insert(Session {
            username: response.username,
            token: response.token,
        }))
    }

    pub async fn register(&mut self, credentials: &Credentials) -> Result<String, AuthError> {
        self.api.register(credentials).await.map_err(|e| {
            warn!("Registration failed for '{}': {}", credentials.username, e);
            e
        })?;
        info!("Registered '{}'", credentials.username);
        self.mode = AuthMode::Login;
        self.form = Credentials::default();
        Ok(REGISTERED_MESSAGE.to_string())
    }

    pub async fn submit_auth(&mut self) -> Result<AuthOutcome, AuthError> {
        let credentials = self.form.clone();
        debug!("Submitting auth form to /auth/{}", self.mode.endpoint());
        match self.mode {
            AuthMode::Login => {
                let session = self.login(&credentials).await?;
                Ok(AuthOutcome::LoggedIn {
                    username: session.username.clone(),
                })
            }
            AuthMode::Register => {
                let message = self.register(&credentials).await?;
                Ok(AuthOutcome::Registered { message })
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            warn!("Failed to clear persisted token: {:#}", e);
        }
        if let Some(s) = self.session.take() {
            info!("Logged out '{}'", s.username);
        }
    }

    pub fn toggle_mode(&mut self) -> AuthMode {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.mode
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn auth_form(&self) -> &Credentials {
        &self.form
    }

    pub fn auth_form_mut(&mut self) -> &mut Credentials {
        &mut self.form
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}
