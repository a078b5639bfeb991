use crate::models::{Credentials, ErrorBody, LoginResponse, Movie, MovieForm, MovieId};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
const AUTH_FAILED: &str = "Auth failed";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("Auth request failed: {0}")]
    Request(String),
}

#[async_trait]
pub trait WatchlistApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;
    async fn register(&self, credentials: &Credentials) -> Result<(), AuthError>;
    async fn list_movies(&self, token: &str) -> Result<Vec<Movie>>;
    async fn create_movie(&self, form: &MovieForm) -> Result<()>;
    async fn update_movie(&self, id: &MovieId, form: &MovieForm) -> Result<()>;
    async fn replace_movie(&self, movie: &Movie) -> Result<()>;
    async fn delete_movie(&self, id: &MovieId) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let user_agent = format!("cinelist/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build watchlist HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn movie_url(&self, id: &MovieId) -> String {
        self.url(&format!("/movies/{}", urlencoding::encode(&id.to_string())))
    }

    async fn send(&self, what: &str, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>)> {
        let res = request
            .send()
            .await
            .with_context(|| format!("{} request failed", what))?;
        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .with_context(|| format!("Failed to read {} body", what))?;
        debug!("{} -> {}", what, status);
        Ok((status, bytes.to_vec()))
    }

    async fn send_checked(&self, what: &str, request: RequestBuilder) -> Result<Vec<u8>> {
        let (status, bytes) = self.send(what, request).await?;
        if !status.is_success() {
            return Err(anyhow!(
                "{} HTTP error (status {}): {}",
                what,
                status,
                String::from_utf8_lossy(&bytes)
            ));
        }
        Ok(bytes)
    }

    async fn auth_call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<Option<T>, AuthError> {
        let request = self
            .client
            .post(self.url(&format!("/auth/{}", endpoint)))
            .json(credentials);
        let (status, bytes) = self
            .send(endpoint, request)
            .await
            .map_err(|e| AuthError::Request(format!("{:#}", e)))?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| AUTH_FAILED.to_string());
            return Err(AuthError::Rejected(message));
        }
        Ok(serde_json::from_slice(&bytes).ok())
    }
}

#[async_trait]
impl WatchlistApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        self.auth_call::<LoginResponse>("login", credentials)
            .await?
            .ok_or_else(|| AuthError::Request("Unexpected login response".to_string()))
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), AuthError> {
        self.auth_call::<serde_json::Value>("register", credentials)
            .await
            .map(|_| ())
    }

    async fn list_movies(&self, token: &str) -> Result<Vec<Movie>> {
        let request = self.client.get(self.url("/movies")).bearer_auth(token);
        let bytes = self.send_checked("list movies", request).await?;
        serde_json::from_slice(&bytes).context("Failed to parse movie list JSON")
    }

    async fn create_movie(&self, form: &MovieForm) -> Result<()> {
        let request = self.client.post(self.url("/movies")).json(form);
        self.send_checked("create movie", request).await.map(|_| ())
    }

    async fn update_movie(&self, id: &MovieId, form: &MovieForm) -> Result<()> {
        let request = self.client.put(self.movie_url(id)).json(form);
        self.send_checked("update movie", request).await.map(|_| ())
    }

    async fn replace_movie(&self, movie: &Movie) -> Result<()> {
        let request = self.client.put(self.movie_url(&movie.id)).json(movie);
        self.send_checked("update movie", request).await.map(|_| ())
    }

    async fn delete_movie(&self, id: &MovieId) -> Result<()> {
        let request = self.client.delete(self.movie_url(id));
        self.send_checked("delete movie", request).await.map(|_| ())
    }
}
