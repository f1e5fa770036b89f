use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{movie, user};

/// Write payload for a movie, shared by create and update. A `poster_url` of
/// `None` on update leaves the stored value untouched.
#[derive(Clone, Debug, Default)]
pub struct MovieDraft {
    pub title: String,
    pub director: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
}

/// Data-access contract for users and their movie collections.
///
/// Every mutating operation is a single unit of work against the store.
/// Underlying store errors never cross this boundary: they are logged with the
/// operation and entity id, the unit of work is rolled back, and the operation
/// reports failure as `None`/`false`.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn list_users(&self) -> Vec<user::Model>;
    async fn get_user(&self, user_id: i32) -> Option<user::Model>;
    async fn list_movies_for_user(&self, user_id: i32) -> Vec<movie::Model>;
    async fn get_movie(&self, movie_id: i32) -> Option<movie::Model>;
    async fn create_user(&self, name: &str) -> Option<user::Model>;
    async fn create_movie(&self, user_id: i32, draft: MovieDraft) -> Option<movie::Model>;
    async fn update_movie(&self, movie_id: i32, draft: MovieDraft) -> Option<movie::Model>;
    async fn delete_movie(&self, movie_id: i32) -> bool;
    async fn delete_user(&self, user_id: i32) -> bool;
}

#[derive(Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieStore for SqlStore {
    async fn list_users(&self) -> Vec<user::Model> {
        match user::Entity::find().order_by_asc(user::Column::Id).all(&self.db).await {
            Ok(users) => users,
            Err(err) => {
                tracing::error!(%err, "list_users failed");
                Vec::new()
            }
        }
    }

    async fn get_user(&self, user_id: i32) -> Option<user::Model> {
        match user::Entity::find_by_id(user_id).one(&self.db).await {
            Ok(found) => found,
            Err(err) => {
                tracing::error!(user_id, %err, "get_user failed");
                None
            }
        }
    }

    async fn list_movies_for_user(&self, user_id: i32) -> Vec<movie::Model> {
        let result = movie::Entity::find()
            .filter(movie::Column::UserId.eq(user_id))
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await;
        match result {
            Ok(movies) => movies,
            Err(err) => {
                tracing::error!(user_id, %err, "list_movies_for_user failed");
                Vec::new()
            }
        }
    }

    async fn get_movie(&self, movie_id: i32) -> Option<movie::Model> {
        match movie::Entity::find_by_id(movie_id).one(&self.db).await {
            Ok(found) => found,
            Err(err) => {
                tracing::error!(movie_id, %err, "get_movie failed");
                None
            }
        }
    }

    async fn create_user(&self, name: &str) -> Option<user::Model> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let model = user::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            created_at: Set(now_sec()),
        };

        match model.insert(&self.db).await {
            Ok(created) => Some(created),
            Err(err) => {
                tracing::error!(name, %err, "create_user failed");
                None
            }
        }
    }

    async fn create_movie(&self, user_id: i32, draft: MovieDraft) -> Option<movie::Model> {
        let title = draft.title.trim();
        if title.is_empty() {
            return None;
        }

        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(title.to_string()),
            director: Set(draft.director),
            year: Set(draft.year),
            rating: Set(draft.rating),
            poster_url: Set(draft.poster_url),
            user_id: Set(user_id),
            created_at: Set(now_sec()),
        };

        // An unknown user_id trips the foreign key and lands here as Err.
        match model.insert(&self.db).await {
            Ok(created) => Some(created),
            Err(err) => {
                tracing::error!(user_id, %err, "create_movie failed");
                None
            }
        }
    }

    async fn update_movie(&self, movie_id: i32, draft: MovieDraft) -> Option<movie::Model> {
        let title = draft.title.trim();
        if title.is_empty() {
            return None;
        }

        let model = movie::ActiveModel {
            id: Set(movie_id),
            title: Set(title.to_string()),
            director: Set(draft.director),
            year: Set(draft.year),
            rating: Set(draft.rating),
            // NotSet keeps the stored poster when the draft carries none.
            poster_url: match draft.poster_url {
                Some(url) => Set(Some(url)),
                None => NotSet,
            },
            user_id: NotSet,
            created_at: NotSet,
        };

        match model.update(&self.db).await {
            Ok(updated) => Some(updated),
            Err(DbErr::RecordNotUpdated) => None,
            Err(err) => {
                tracing::error!(movie_id, %err, "update_movie failed");
                None
            }
        }
    }

    async fn delete_movie(&self, movie_id: i32) -> bool {
        match movie::Entity::delete_by_id(movie_id).exec(&self.db).await {
            Ok(result) => result.rows_affected > 0,
            Err(err) => {
                tracing::error!(movie_id, %err, "delete_movie failed");
                false
            }
        }
    }

    async fn delete_user(&self, user_id: i32) -> bool {
        let result = async {
            let txn = self.db.begin().await?;

            movie::Entity::delete_many()
                .filter(movie::Column::UserId.eq(user_id))
                .exec(&txn)
                .await?;

            let deleted = user::Entity::delete_by_id(user_id).exec(&txn).await?;

            txn.commit().await?;
            Ok::<_, DbErr>(deleted.rows_affected > 0)
        }
        .await;

        match result {
            Ok(deleted) => deleted,
            Err(err) => {
                tracing::error!(user_id, %err, "delete_user failed");
                false
            }
        }
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    use super::*;

    async fn test_store() -> SqlStore {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SqlStore::new(db)
    }

    fn draft(title: &str) -> MovieDraft {
        MovieDraft { title: title.to_string(), ..Default::default() }
    }

    #[tokio::test]
    async fn create_user_assigns_stable_retrievable_id() {
        let store = test_store().await;

        let ada = store.create_user("Ada").await.unwrap();
        let grace = store.create_user("Grace").await.unwrap();
        assert_ne!(ada.id, grace.id);

        let fetched = store.get_user(ada.id).await.unwrap();
        assert_eq!(fetched.id, ada.id);
        assert_eq!(fetched.name, "Ada");
    }

    #[tokio::test]
    async fn create_user_rejects_empty_name() {
        let store = test_store().await;

        assert!(store.create_user("").await.is_none());
        assert!(store.create_user("   ").await.is_none());
        assert!(store.list_users().await.is_empty());
    }

    #[tokio::test]
    async fn movies_are_scoped_to_their_owner() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        let grace = store.create_user("Grace").await.unwrap();

        store.create_movie(ada.id, draft("Metropolis")).await.unwrap();
        store.create_movie(ada.id, draft("M")).await.unwrap();
        store.create_movie(grace.id, draft("Sunrise")).await.unwrap();

        let ada_movies = store.list_movies_for_user(ada.id).await;
        let titles: Vec<_> = ada_movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Metropolis", "M"]);
        assert!(ada_movies.iter().all(|m| m.user_id == ada.id));

        assert_eq!(store.list_movies_for_user(grace.id).await.len(), 1);
        assert!(store.list_movies_for_user(9999).await.is_empty());
    }

    #[tokio::test]
    async fn create_movie_requires_existing_user() {
        let store = test_store().await;

        assert!(store.create_movie(42, draft("Orphan")).await.is_none());

        let ada = store.create_user("Ada").await.unwrap();
        assert!(store.list_movies_for_user(ada.id).await.is_empty());
    }

    #[tokio::test]
    async fn create_movie_rejects_empty_title() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();

        assert!(store.create_movie(ada.id, draft("  ")).await.is_none());
        assert!(store.list_movies_for_user(ada.id).await.is_empty());
    }

    #[tokio::test]
    async fn update_preserves_poster_when_omitted() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();

        let movie = store
            .create_movie(
                ada.id,
                MovieDraft {
                    title: "Metropolis".to_string(),
                    poster_url: Some("https://posters.example/metropolis.jpg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store
            .update_movie(
                movie.id,
                MovieDraft {
                    title: "Metropolis (restored)".to_string(),
                    year: Some(1927),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Metropolis (restored)");
        assert_eq!(updated.year, Some(1927));
        assert_eq!(updated.poster_url.as_deref(), Some("https://posters.example/metropolis.jpg"));

        let stored = store.get_movie(movie.id).await.unwrap();
        assert_eq!(stored.poster_url.as_deref(), Some("https://posters.example/metropolis.jpg"));
    }

    #[tokio::test]
    async fn update_replaces_poster_when_provided() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        let movie = store.create_movie(ada.id, draft("M")).await.unwrap();

        let updated = store
            .update_movie(
                movie.id,
                MovieDraft {
                    title: "M".to_string(),
                    poster_url: Some("https://posters.example/m.jpg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.poster_url.as_deref(), Some("https://posters.example/m.jpg"));
    }

    #[tokio::test]
    async fn update_missing_movie_reports_absent() {
        let store = test_store().await;

        assert!(store.update_movie(7, draft("Nope")).await.is_none());
    }

    #[tokio::test]
    async fn delete_movie_is_noop_for_unknown_id() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        store.create_movie(ada.id, draft("Metropolis")).await.unwrap();

        assert!(!store.delete_movie(9999).await);
        assert_eq!(store.list_movies_for_user(ada.id).await.len(), 1);
    }

    #[tokio::test]
    async fn delete_user_cascades_to_movies() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        let grace = store.create_user("Grace").await.unwrap();
        let movie = store.create_movie(ada.id, draft("Metropolis")).await.unwrap();
        store.create_movie(grace.id, draft("Sunrise")).await.unwrap();

        assert!(store.delete_user(ada.id).await);

        assert!(store.get_user(ada.id).await.is_none());
        assert!(store.list_movies_for_user(ada.id).await.is_empty());
        assert!(store.get_movie(movie.id).await.is_none());

        // Other users are untouched.
        assert_eq!(store.list_movies_for_user(grace.id).await.len(), 1);

        assert!(!store.delete_user(ada.id).await);
    }

    #[tokio::test]
    async fn full_collection_lifecycle() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();

        let movie = store
            .create_movie(
                ada.id,
                MovieDraft {
                    title: "Test Movie".to_string(),
                    director: Some("Test Director".to_string()),
                    year: Some(2020),
                    rating: Some(8.5),
                    poster_url: None,
                },
            )
            .await
            .unwrap();

        let listed = store.list_movies_for_user(ada.id).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Test Movie");
        assert_eq!(listed[0].director.as_deref(), Some("Test Director"));
        assert_eq!(listed[0].year, Some(2020));
        assert_eq!(listed[0].rating, Some(8.5));

        store
            .update_movie(
                movie.id,
                MovieDraft {
                    title: "Updated Movie".to_string(),
                    director: Some("Test Director".to_string()),
                    year: Some(2020),
                    rating: Some(8.5),
                    poster_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(store.get_movie(movie.id).await.unwrap().title, "Updated Movie");

        assert!(store.delete_movie(movie.id).await);
        assert!(store.get_movie(movie.id).await.is_none());
    }
}
