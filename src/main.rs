mod config;
mod db;
mod entities;
mod error;
mod library;
mod models;
mod omdb;
mod repository;
mod routes;
mod templates;
mod year;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    library::Library,
    omdb::{MovieLookup, OmdbClient},
    repository::Repository,
};

#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub library: Library,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/users", post(routes::create_user))
        .route("/users/{user_id}/delete", post(routes::delete_user))
        .route("/users/{user_id}/movies", get(routes::list_movies).post(routes::add_movie))
        .route("/users/{user_id}/movies/{movie_id}/update", post(routes::update_movie))
        .route("/users/{user_id}/movies/{movie_id}/delete", post(routes::delete_movie))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviweb=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let repo = Repository::new(db);

    let lookup = match &config.omdb_api_key {
        Some(api_key) => {
            let http = reqwest::Client::builder().user_agent("moviweb/0.1").build()?;
            let omdb = OmdbClient::new(
                http,
                api_key.clone(),
                config.omdb_base_url.clone(),
                config.omdb_timeout,
                config.omdb_rps,
            );
            Some(Arc::new(omdb) as Arc<dyn MovieLookup>)
        },
        None => None,
    };

    let library = Library::new(repo.clone(), lookup);
    let app = router(Arc::new(AppState { repo, library }));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
