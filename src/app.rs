use crate::api::{AuthError, HttpApi, WatchlistApi};
use crate::config::Config;
use crate::models::Credentials;
use crate::session::{AuthOutcome, SessionController};
use crate::token::{FileTokenStore, TokenStore};
use crate::watchlist::WatchlistController;
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::info;

// The watchlist only exists while a session does.
pub struct App {
    api: Arc<dyn WatchlistApi>,
    session: SessionController,
    watchlist: Option<WatchlistController>,
}

impl App {
    pub fn new(api: Arc<dyn WatchlistApi>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            session: SessionController::new(api.clone(), store),
            api,
            watchlist: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api: Arc<dyn WatchlistApi> = Arc::new(HttpApi::new(&config.api_base)?);
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.storage_path));
        Ok(Self::new(api, store))
    }

    pub async fn start(&mut self) -> Option<String> {
        self.restore();
        self.open_watchlist().await;
        self.session.username().map(|s| s.to_string())
    }

    pub fn restore(&mut self) -> Option<String> {
        self.session
            .restore_session()
            .map(|s| s.username.clone())
    }

    // Restores the session and loads the list, failing if either is missing.
    pub async fn open(&mut self) -> Result<&mut WatchlistController> {
        self.watchlist = None;
        let Some(session) = self.session.restore_session() else {
            bail!("Not logged in; run `cinelist login` first");
        };
        info!("Opening watchlist for '{}'", session.username);
        let mut watchlist = WatchlistController::new(self.api.clone(), &session.token);
        watchlist
            .refresh()
            .await
            .context("Could not load the watchlist")?;
        Ok(self.watchlist.insert(watchlist))
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<String, AuthError> {
        let username = self.session.login(credentials).await?.username.clone();
        self.open_watchlist().await;
        Ok(username)
    }

    pub async fn register(&mut self, credentials: &Credentials) -> Result<String, AuthError> {
        self.session.register(credentials).await
    }

    pub async fn submit_auth(&mut self) -> Result<AuthOutcome, AuthError> {
        let outcome = self.session.submit_auth().await?;
        if matches!(outcome, AuthOutcome::LoggedIn { .. }) {
            self.open_watchlist().await;
        }
        Ok(outcome)
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.watchlist = None;
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionController {
        &mut self.session
    }

    pub fn watchlist(&self) -> Option<&WatchlistController> {
        self.watchlist.as_ref()
    }

    pub fn watchlist_mut(&mut self) -> Option<&mut WatchlistController> {
        self.watchlist.as_mut()
    }

    pub fn require_watchlist(&mut self) -> Result<&mut WatchlistController> {
        match self.watchlist.as_mut() {
            Some(w) => Ok(w),
            None => bail!("Not logged in; run `cinelist login` first"),
        }
    }

    async fn open_watchlist(&mut self) {
        let Some(token) = self.session.token() else {
            self.watchlist = None;
            return;
        };
        info!("Opening watchlist for '{}'", self.session.username().unwrap_or_default());
        let mut watchlist = WatchlistController::new(self.api.clone(), token);
        // Failures are logged by refresh; the list just starts empty.
        let _ = watchlist.refresh().await;
        self.watchlist = Some(watchlist);
    }
}
