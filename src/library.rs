use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    entities::{movie, user},
    error::AppResult,
    models::{MovieChanges, NewMovie, Notice},
    omdb::{LookupOutcome, MovieLookup},
    repository::Repository,
    year::parse_year,
};

/// Why a movie was stored with its title only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Fallback {
    LookupDisabled,
    LookupUnavailable,
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ingestion {
    Enriched(movie::Model),
    Basic { movie: movie::Model, fallback: Fallback },
    MissingTitle,
    /// Holds the title that collided, which may be the service's canonical one.
    Duplicate(String),
}

impl Ingestion {
    pub fn notice(&self) -> Notice {
        match self {
            Ingestion::Enriched(_) => Notice::MovieAdded,
            Ingestion::Basic { fallback: Fallback::LookupDisabled, .. } => {
                Notice::MovieAddedWithoutLookup
            },
            Ingestion::Basic { fallback: Fallback::LookupUnavailable, .. } => {
                Notice::MovieAddedLookupUnavailable
            },
            Ingestion::Basic { fallback: Fallback::NotFound, .. } => Notice::MovieAddedNotFound,
            Ingestion::MissingTitle => Notice::MovieTitleMissing,
            Ingestion::Duplicate(_) => Notice::MovieDuplicate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(movie::Model),
    NothingToUpdate,
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Registration {
    Created(user::Model),
    MissingName,
    AlreadyExists,
}

impl Registration {
    pub fn notice(&self) -> Notice {
        match self {
            Registration::Created(_) => Notice::UserCreated,
            Registration::MissingName => Notice::UserNameMissing,
            Registration::AlreadyExists => Notice::UserExists,
        }
    }
}

/// Write-side workflows over the repository. `lookup` is `None` when no
/// metadata service is configured.
#[derive(Clone)]
pub struct Library {
    repo: Repository,
    lookup: Option<Arc<dyn MovieLookup>>,
}

impl Library {
    pub fn new(repo: Repository, lookup: Option<Arc<dyn MovieLookup>>) -> Self {
        if lookup.is_none() {
            warn!("no OMDb API key provided, movies will be stored by title only");
        }
        Self { repo, lookup }
    }

    pub async fn register_user(&self, raw_name: &str) -> AppResult<Registration> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Ok(Registration::MissingName);
        }
        if self.repo.find_user_by_name(name).await?.is_some() {
            debug!(name = %name, "user already exists");
            return Ok(Registration::AlreadyExists);
        }

        let user = self.repo.create_user(name).await?;
        info!(user_id = user.id, name = %user.name, "user created");
        Ok(Registration::Created(user))
    }

    /// Adds a title to the user's library, enriching it when the lookup
    /// service knows it. Performs at most one write and one lookup.
    pub async fn add_movie(&self, user_id: i32, raw_title: &str) -> AppResult<Ingestion> {
        let title = raw_title.trim();
        if title.is_empty() {
            return Ok(Ingestion::MissingTitle);
        }

        if self.repo.movie_exists_for_user(user_id, title).await? {
            debug!(user_id, title = %title, "movie already in library");
            return Ok(Ingestion::Duplicate(title.to_string()));
        }

        let Some(lookup) = &self.lookup else {
            return self.add_basic(user_id, title, Fallback::LookupDisabled).await;
        };

        let record = match lookup.lookup(title).await {
            LookupOutcome::Found(record) => record,
            LookupOutcome::NotFound => {
                return self.add_basic(user_id, title, Fallback::NotFound).await;
            },
            LookupOutcome::Unavailable => {
                return self.add_basic(user_id, title, Fallback::LookupUnavailable).await;
            },
        };

        // The canonical title can collide with an entry the raw input did not match.
        let canonical = record.title().unwrap_or(title);
        if self.repo.movie_exists_for_user(user_id, canonical).await? {
            debug!(user_id, title = %title, canonical = %canonical, "canonical title already in library");
            return Ok(Ingestion::Duplicate(canonical.to_string()));
        }

        let movie = self
            .repo
            .add_movie(NewMovie {
                user_id,
                title: canonical.to_string(),
                director: record.director().map(str::to_string),
                year: parse_year(record.year()),
                poster_url: record.poster().map(str::to_string),
            })
            .await?;

        info!(user_id, movie_id = movie.id, title = %movie.title, "enriched movie added");
        Ok(Ingestion::Enriched(movie))
    }

    async fn add_basic(
        &self,
        user_id: i32,
        title: &str,
        fallback: Fallback,
    ) -> AppResult<Ingestion> {
        let movie = self.repo.add_movie(NewMovie::basic(user_id, title)).await?;
        info!(user_id, movie_id = movie.id, title = %movie.title, ?fallback, "movie added by title only");
        Ok(Ingestion::Basic { movie, fallback })
    }

    pub async fn update_movie(
        &self,
        movie_id: i32,
        changes: &MovieChanges,
    ) -> AppResult<UpdateOutcome> {
        if changes.is_blank() {
            return Ok(UpdateOutcome::NothingToUpdate);
        }

        let updated = self
            .repo
            .update_movie(
                movie_id,
                changes.title.as_deref(),
                parse_year(changes.year.as_deref()),
                changes.director.as_deref(),
            )
            .await?;

        Ok(match updated {
            Some(movie) => {
                debug!(movie_id, "movie updated");
                UpdateOutcome::Updated(movie)
            },
            None => UpdateOutcome::NotFound,
        })
    }
}
