//! Shared setup for the API integration tests.
//!
//! Integration tests need a PostgreSQL database: set DATABASE_URL before
//! running them with `--ignored`.

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use uuid::Uuid;

use speech_kids_backend::db::Database;
use speech_kids_backend::services::tokens;
use speech_kids_backend::{build_router, AppState};

pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// # Panics
    /// Panics if DATABASE_URL is not set or the database is unreachable.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);
        let app = build_router(AppState { db: db.clone() });

        Self { db, app }
    }

    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a player directly in the database and return its ID and token.
    pub async fn create_test_player(&self, name: &str) -> (Uuid, String) {
        let token = tokens::generate_token();
        let (player, _) = self
            .db
            .create_player(&tokens::hash_token(&token), name, "🦁")
            .await
            .expect("Failed to create test player");
        (player.id, token)
    }

    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Remove a player; dependent rows go with it via ON DELETE CASCADE.
    pub async fn cleanup_player(&self, player_id: Uuid) {
        let _ = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(player_id)
            .execute(self.db.pool())
            .await;
    }
}
