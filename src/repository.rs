use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
    sea_query::{Expr, LikeExpr},
};
use tracing::debug;

use crate::{
    entities::{movie, user},
    error::AppResult,
    models::NewMovie,
};

/// Case-insensitive comparison key. Both the stored keys and the values
/// they are matched against go through here, so folding is Unicode-aware
/// on both sides.
pub fn fold_key(value: &str) -> String {
    value.trim().to_lowercase()
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, name: &str) -> AppResult<user::Model> {
        let model = user::ActiveModel {
            name: Set(name.to_string()),
            name_key: Set(fold_key(name)),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn find_user_by_name(&self, name: &str) -> AppResult<Option<user::Model>> {
        let user = user::Entity::find()
            .filter(user::Column::NameKey.eq(fold_key(name)))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    pub async fn list_users(&self) -> AppResult<Vec<user::Model>> {
        Ok(user::Entity::find().order_by_asc(user::Column::Id).all(&self.db).await?)
    }

    pub async fn get_user(&self, id: i32) -> AppResult<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Deletes the user together with every movie they own.
    pub async fn delete_user(&self, id: i32) -> AppResult<bool> {
        let txn = self.db.begin().await?;

        let movies =
            movie::Entity::delete_many().filter(movie::Column::UserId.eq(id)).exec(&txn).await?;
        let deleted = user::Entity::delete_by_id(id).exec(&txn).await?;

        if deleted.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;
        debug!(user_id = id, movies = movies.rows_affected, "deleted user");
        Ok(true)
    }

    pub async fn list_movies(
        &self,
        user_id: i32,
        search: Option<&str>,
    ) -> AppResult<Vec<movie::Model>> {
        let mut query = movie::Entity::find().filter(movie::Column::UserId.eq(user_id));

        // Wildcards typed by the user match literally.
        if let Some(term) = search.map(fold_key).filter(|t| !t.is_empty()) {
            let pattern = LikeExpr::new(format!("%{}%", escape_like(&term))).escape('\\');
            query = query.filter(Expr::col(movie::Column::TitleKey).like(pattern));
        }

        Ok(query.order_by_asc(movie::Column::Id).all(&self.db).await?)
    }

    /// Case-insensitive match on the trimmed title. Blank titles never exist.
    pub async fn movie_exists_for_user(&self, user_id: i32, title: &str) -> AppResult<bool> {
        let key = fold_key(title);
        if key.is_empty() {
            return Ok(false);
        }

        let existing = movie::Entity::find()
            .filter(movie::Column::UserId.eq(user_id))
            .filter(movie::Column::TitleKey.eq(key))
            .one(&self.db)
            .await?;
        Ok(existing.is_some())
    }

    pub async fn add_movie(&self, new_movie: NewMovie) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            title_key: Set(fold_key(&new_movie.title)),
            title: Set(new_movie.title),
            director: Set(new_movie.director),
            year: Set(new_movie.year),
            poster_url: Set(new_movie.poster_url),
            user_id: Set(new_movie.user_id),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Title and director are only replaced by non-blank text, while any
    /// `Some` year (zero included) is applied. No field can be cleared.
    pub async fn update_movie(
        &self,
        id: i32,
        title: Option<&str>,
        year: Option<i32>,
        director: Option<&str>,
    ) -> AppResult<Option<movie::Model>> {
        let Some(existing) = movie::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut model: movie::ActiveModel = existing.clone().into();
        if let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) {
            model.title = Set(title.to_string());
            model.title_key = Set(fold_key(title));
        }
        if year.is_some() {
            model.year = Set(year);
        }
        if let Some(director) = director.map(str::trim).filter(|d| !d.is_empty()) {
            model.director = Set(Some(director.to_string()));
        }

        if !model.is_changed() {
            return Ok(Some(existing));
        }
        Ok(Some(model.update(&self.db).await?))
    }

    pub async fn delete_movie(&self, id: i32) -> AppResult<bool> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::PaginatorTrait;

    use super::*;

    async fn repo() -> Repository {
        Repository::new(crate::db::memory().await)
    }

    async fn movie_count(repo: &Repository) -> u64 {
        movie::Entity::find().count(&repo.db).await.unwrap()
    }

    #[tokio::test]
    async fn users_are_found_by_name_ignoring_case() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        repo.create_user("Bob").await.unwrap();

        assert_eq!(repo.find_user_by_name("ann").await.unwrap(), Some(ann.clone()));
        assert_eq!(repo.find_user_by_name("ANN").await.unwrap(), Some(ann.clone()));
        assert_eq!(repo.find_user_by_name("an").await.unwrap(), None);
        assert_eq!(repo.get_user(ann.id).await.unwrap(), Some(ann));
        assert_eq!(repo.get_user(999).await.unwrap(), None);

        let names: Vec<_> =
            repo.list_users().await.unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, ["Ann", "Bob"]);
    }

    #[tokio::test]
    async fn existence_check_trims_and_ignores_case() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        let bob = repo.create_user("Bob").await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "Inception")).await.unwrap();

        assert!(repo.movie_exists_for_user(ann.id, "inception").await.unwrap());
        assert!(repo.movie_exists_for_user(ann.id, "  INCEPTION  ").await.unwrap());
        assert!(!repo.movie_exists_for_user(ann.id, "Inception 2").await.unwrap());
        assert!(!repo.movie_exists_for_user(bob.id, "Inception").await.unwrap());
        assert!(!repo.movie_exists_for_user(ann.id, "").await.unwrap());
        assert!(!repo.movie_exists_for_user(ann.id, "   ").await.unwrap());
    }

    #[tokio::test]
    async fn listing_filters_by_owner_and_search_term() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        let bob = repo.create_user("Bob").await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "The Matrix")).await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "Matrix Reloaded")).await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "Heat")).await.unwrap();
        repo.add_movie(NewMovie::basic(bob.id, "The Matrix")).await.unwrap();

        assert_eq!(repo.list_movies(ann.id, None).await.unwrap().len(), 3);
        assert_eq!(repo.list_movies(ann.id, Some("  ")).await.unwrap().len(), 3);

        let titles: Vec<_> = repo
            .list_movies(ann.id, Some("matrix"))
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, ["The Matrix", "Matrix Reloaded"]);
        assert!(repo.list_movies(ann.id, Some("alien")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn added_movie_keeps_every_field() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        let movie = repo
            .add_movie(NewMovie {
                user_id: ann.id,
                title: "Heat".into(),
                director: Some("Michael Mann".into()),
                year: Some(1995),
                poster_url: Some("https://img/heat.jpg".into()),
            })
            .await
            .unwrap();

        assert!(movie.id > 0);
        assert_eq!(movie.director.as_deref(), Some("Michael Mann"));
        assert_eq!(movie.year, Some(1995));
        assert_eq!(movie.poster_url.as_deref(), Some("https://img/heat.jpg"));
        assert_eq!(movie.user_id, ann.id);
    }

    #[tokio::test]
    async fn update_ignores_blank_text_but_applies_zero_year() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        let movie = repo
            .add_movie(NewMovie {
                director: Some("Nolan".into()),
                year: Some(2010),
                ..NewMovie::basic(ann.id, "Inception")
            })
            .await
            .unwrap();

        let updated = repo.update_movie(movie.id, Some("  "), Some(0), Some("")).await.unwrap();
        let updated = updated.unwrap();
        assert_eq!(updated.title, "Inception");
        assert_eq!(updated.director.as_deref(), Some("Nolan"));
        assert_eq!(updated.year, Some(0));

        let updated =
            repo.update_movie(movie.id, Some(" Inception (2010) "), None, Some("Christopher Nolan"));
        let updated = updated.await.unwrap().unwrap();
        assert_eq!(updated.title, "Inception (2010)");
        assert_eq!(updated.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(updated.year, Some(0));

        let untouched = repo.update_movie(movie.id, None, None, None).await.unwrap();
        assert_eq!(untouched, Some(updated));

        assert_eq!(repo.update_movie(999, Some("x"), None, None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_movie_reports_missing_rows() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        let movie = repo.add_movie(NewMovie::basic(ann.id, "Heat")).await.unwrap();

        assert!(!repo.delete_movie(movie.id + 1).await.unwrap());
        assert_eq!(movie_count(&repo).await, 1);
        assert!(repo.delete_movie(movie.id).await.unwrap());
        assert!(!repo.delete_movie(movie.id).await.unwrap());
        assert_eq!(movie_count(&repo).await, 0);
    }

    #[tokio::test]
    async fn deleting_a_user_removes_their_movies_only() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        let bob = repo.create_user("Bob").await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "Heat")).await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "Alien")).await.unwrap();
        repo.add_movie(NewMovie::basic(bob.id, "Heat")).await.unwrap();

        assert!(repo.delete_user(ann.id).await.unwrap());
        assert_eq!(repo.get_user(ann.id).await.unwrap(), None);
        assert!(repo.list_movies(ann.id, None).await.unwrap().is_empty());
        assert_eq!(movie_count(&repo).await, 1);

        assert!(!repo.delete_user(ann.id).await.unwrap());
        assert_eq!(movie_count(&repo).await, 1);
    }

    #[tokio::test]
    async fn non_ascii_titles_fold_case_on_both_sides() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "ÉLITE")).await.unwrap();
        let amelie = NewMovie::basic(ann.id, "Le Fabuleux Destin d'Amélie Poulain");
        repo.add_movie(amelie).await.unwrap();

        for term in ["ÉLITE", "élite", "Élit"] {
            let hits = repo.list_movies(ann.id, Some(term)).await.unwrap();
            assert_eq!(hits.len(), 1, "search {term:?}");
            assert_eq!(hits[0].title, "ÉLITE");
        }
        assert_eq!(repo.list_movies(ann.id, Some("AMÉLIE")).await.unwrap().len(), 1);

        assert!(repo.movie_exists_for_user(ann.id, "élite").await.unwrap());
        assert!(
            repo.movie_exists_for_user(ann.id, "LE FABULEUX DESTIN D'AMÉLIE POULAIN").await.unwrap()
        );
    }

    #[tokio::test]
    async fn non_ascii_user_names_fold_case() {
        let repo = repo().await;
        let eve = repo.create_user("Élodie").await.unwrap();

        assert_eq!(repo.find_user_by_name("ÉLODIE").await.unwrap(), Some(eve.clone()));
        assert_eq!(repo.find_user_by_name(" élodie ").await.unwrap(), Some(eve));
    }

    #[tokio::test]
    async fn search_wildcards_match_literally() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "Heat")).await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "100% Wolf")).await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "snake_case")).await.unwrap();

        let hits = repo.list_movies(ann.id, Some("_")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "snake_case");

        let hits = repo.list_movies(ann.id, Some("%")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "100% Wolf");

        assert!(repo.list_movies(ann.id, Some("\\")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn renaming_a_movie_refreshes_its_match_key() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        let movie = repo.add_movie(NewMovie::basic(ann.id, "Amelie")).await.unwrap();

        repo.update_movie(movie.id, Some("AMÉLIE"), None, None).await.unwrap();
        assert!(repo.movie_exists_for_user(ann.id, "amélie").await.unwrap());
        assert!(!repo.movie_exists_for_user(ann.id, "amelie").await.unwrap());
    }

    #[tokio::test]
    async fn schema_cascade_removes_movies_of_deleted_users() {
        let repo = repo().await;
        let ann = repo.create_user("Ann").await.unwrap();
        repo.add_movie(NewMovie::basic(ann.id, "Heat")).await.unwrap();

        user::Entity::delete_by_id(ann.id).exec(&repo.db).await.unwrap();
        assert_eq!(movie_count(&repo).await, 0);
    }
}
