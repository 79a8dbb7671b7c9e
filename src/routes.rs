use std::sync::Arc;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::{
    AppState,
    entities::user,
    error::{AppError, AppResult},
    library::UpdateOutcome,
    models::{MovieChanges, MovieForm, Notice, SearchQuery, UserForm},
    templates,
};

const NOTICE_COOKIE: &str = "notice";

/// Stores `notice` for the next page view and redirects there.
fn flash(jar: CookieJar, notice: Notice, to: &str) -> (CookieJar, Redirect) {
    let cookie = Cookie::build((NOTICE_COOKIE, notice.as_code())).path("/").http_only(true);
    (jar.add(cookie), Redirect::to(to))
}

/// Reads and clears the pending notice, if any.
fn take_notice(jar: CookieJar) -> (CookieJar, Option<Notice>) {
    let notice = jar.get(NOTICE_COOKIE).and_then(|c| Notice::from_code(c.value()));
    (jar.remove(Cookie::build(NOTICE_COOKIE).path("/")), notice)
}

fn movies_url(user_id: i32) -> String {
    format!("/users/{user_id}/movies")
}

async fn require_user(state: &AppState, user_id: i32) -> AppResult<user::Model> {
    state.repo.get_user(user_id).await?.ok_or_else(|| AppError::NotFound("user".into()))
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let users = state.repo.list_users().await?;
    let (jar, notice) = take_notice(jar);
    Ok((jar, Html(templates::index_page(&users, notice))))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<UserForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let registration = state.library.register_user(&form.name).await?;
    Ok(flash(jar, registration.notice(), "/"))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    if !state.repo.delete_user(user_id).await? {
        return Err(AppError::NotFound("user".into()));
    }
    Ok(flash(jar, Notice::UserDeleted, "/"))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Query(query): Query<SearchQuery>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let user = require_user(&state, user_id).await?;
    let search = query.q.as_deref().map(str::trim).unwrap_or_default();
    let movies = state.repo.list_movies(user_id, Some(search)).await?;

    let (jar, notice) = take_notice(jar);
    Ok((jar, Html(templates::movies_page(&user, &movies, search, notice))))
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    jar: CookieJar,
    Form(form): Form<MovieForm>,
) -> AppResult<(CookieJar, Redirect)> {
    require_user(&state, user_id).await?;
    let ingestion = state.library.add_movie(user_id, &form.title).await?;
    Ok(flash(jar, ingestion.notice(), &movies_url(user_id)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    jar: CookieJar,
    Form(changes): Form<MovieChanges>,
) -> AppResult<(CookieJar, Redirect)> {
    let notice = match state.library.update_movie(movie_id, &changes).await? {
        UpdateOutcome::Updated(_) => Notice::MovieUpdated,
        UpdateOutcome::NothingToUpdate => Notice::NothingToUpdate,
        UpdateOutcome::NotFound => return Err(AppError::NotFound("movie".into())),
    };
    Ok(flash(jar, notice, &movies_url(user_id)))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    if !state.repo.delete_movie(movie_id).await? {
        return Err(AppError::NotFound("movie".into()));
    }
    Ok(flash(jar, Notice::MovieDeleted, &movies_url(user_id)))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("page".into())
}
