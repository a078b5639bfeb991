use crate::api::WatchlistApi;
use crate::models::{Movie, MovieForm, MovieId};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Owns the local copy of the collection and the add/edit form. Every
/// mutation is followed by a wholesale refresh from the backend.
pub struct WatchlistController {
    api: Arc<dyn WatchlistApi>,
    token: String,
    movies: Vec<Movie>,
    form: MovieForm,
    editing_id: Option<MovieId>,
}

impl WatchlistController {
    pub fn new(api: Arc<dyn WatchlistApi>, token: impl Into<String>) -> Self {
        Self {
            api,
            token: token.into(),
            movies: Vec::new(),
            form: MovieForm::default(),
            editing_id: None,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn find(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| &m.id == id)
    }

    pub fn form(&self) -> &MovieForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut MovieForm {
        &mut self.form
    }

    pub fn editing_id(&self) -> Option<&MovieId> {
        self.editing_id.as_ref()
    }

    // On failure the previous collection is kept.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.api.list_movies(&self.token).await {
            Ok(movies) => {
                info!("Fetched {} movies", movies.len());
                self.movies = movies;
                Ok(())
            }
            Err(e) => {
                error!("Error fetching movies: {:#}", e);
                Err(e)
            }
        }
    }

    pub async fn submit(&mut self) -> Result<()> {
        let outcome = match &self.editing_id {
            Some(id) => {
                info!("Updating movie {} ('{}')", id, self.form.title);
                self.api.update_movie(id, &self.form).await
            }
            None => {
                info!("Adding movie '{}'", self.form.title);
                self.api.create_movie(&self.form).await
            }
        };
        self.reset_form();
        self.settle("save movie", outcome).await
    }

    pub async fn remove(&mut self, id: &MovieId) -> Result<()> {
        info!("Deleting movie {}", id);
        let outcome = self.api.delete_movie(id).await;
        self.settle("delete movie", outcome).await
    }

    pub async fn toggle_watched(&mut self, movie: &Movie) -> Result<()> {
        let updated = movie.with_watched_flipped();
        info!("Marking '{}' watched={}", movie.title, updated.watched);
        let outcome = self.api.replace_movie(&updated).await;
        self.settle("toggle watched", outcome).await
    }

    pub async fn toggle_favorite(&mut self, movie: &Movie) -> Result<()> {
        let updated = movie.with_favorite_flipped();
        info!("Marking '{}' favorite={}", movie.title, updated.is_favorite);
        let outcome = self.api.replace_movie(&updated).await;
        self.settle("toggle favorite", outcome).await
    }

    pub fn begin_edit(&mut self, movie: &Movie) {
        self.form = MovieForm::from(movie);
        self.editing_id = Some(movie.id.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    fn reset_form(&mut self) {
        self.form = MovieForm::default();
        self.editing_id = None;
    }

    // Refresh runs whatever the mutation did; refresh errors are already logged.
    async fn settle(&mut self, what: &str, outcome: Result<()>) -> Result<()> {
        let _ = self.refresh().await;
        outcome.map_err(|e| {
            warn!("Failed to {}: {:#}", what, e);
            e.context(format!("Failed to {}", what))
        })
    }
}
