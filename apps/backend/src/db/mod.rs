//! PostgreSQL database operations

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Players ===

    /// Create a player together with its profile row.
    pub async fn create_player(
        &self,
        token_hash: &str,
        name: &str,
        avatar: &str,
    ) -> Result<(Player, DbProfile)> {
        let mut tx = self.pool.begin().await?;

        let player = sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO players (id, token_hash)
            VALUES ($1, $2)
            RETURNING id, token_hash, created_at, last_seen_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(token_hash)
        .fetch_one(&mut *tx)
        .await?;

        let profile = sqlx::query_as::<_, DbProfile>(
            r#"
            INSERT INTO profiles (id, name, avatar, level, total_stars)
            VALUES ($1, $2, $3, 1, 0)
            RETURNING id, name, avatar, level, total_stars, created_at, updated_at
            "#,
        )
        .bind(player.id)
        .bind(name)
        .bind(avatar)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((player, profile))
    }

    pub async fn get_player_by_token_hash(&self, token_hash: &str) -> Result<Option<Player>> {
        let player = sqlx::query_as::<_, Player>(
            r#"
            SELECT id, token_hash, created_at, last_seen_at
            FROM players
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(player)
    }

    pub async fn update_last_seen(&self, player_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE players SET last_seen_at = NOW() WHERE id = $1")
            .bind(player_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // === Profiles ===

    pub async fn get_profile(&self, player_id: Uuid) -> Result<Option<DbProfile>> {
        let profile = sqlx::query_as::<_, DbProfile>(
            r#"
            SELECT id, name, avatar, level, total_stars, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Update name and/or avatar; `None` keeps the stored value.
    pub async fn update_profile(
        &self,
        player_id: Uuid,
        name: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<Option<DbProfile>> {
        let profile = sqlx::query_as::<_, DbProfile>(
            r#"
            UPDATE profiles
            SET name = COALESCE($2, name),
                avatar = COALESCE($3, avatar),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, avatar, level, total_stars, created_at, updated_at
            "#,
        )
        .bind(player_id)
        .bind(name)
        .bind(avatar)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Overwrite the star total and level (last write wins).
    pub async fn update_stars(
        &self,
        player_id: Uuid,
        total_stars: i32,
        level: i32,
    ) -> Result<Option<DbProfile>> {
        let profile = sqlx::query_as::<_, DbProfile>(
            r#"
            UPDATE profiles
            SET total_stars = $2,
                level = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, avatar, level, total_stars, created_at, updated_at
            "#,
        )
        .bind(player_id)
        .bind(total_stars)
        .bind(level)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    // === Game progress ===

    pub async fn get_progress(&self, player_id: Uuid) -> Result<Vec<DbGameProgress>> {
        let rows = sqlx::query_as::<_, DbGameProgress>(
            r#"
            SELECT player_id, game_type, games_played, correct_answers,
                   total_answers, highest_streak, updated_at
            FROM game_progress
            WHERE player_id = $1
            ORDER BY game_type
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert or replace the progress row for one game.
    pub async fn upsert_progress(
        &self,
        player_id: Uuid,
        game: GameType,
        progress: &GameProgress,
    ) -> Result<DbGameProgress> {
        let row = sqlx::query_as::<_, DbGameProgress>(
            r#"
            INSERT INTO game_progress
                (player_id, game_type, games_played, correct_answers, total_answers, highest_streak)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (player_id, game_type) DO UPDATE SET
                games_played = EXCLUDED.games_played,
                correct_answers = EXCLUDED.correct_answers,
                total_answers = EXCLUDED.total_answers,
                highest_streak = EXCLUDED.highest_streak,
                updated_at = NOW()
            RETURNING player_id, game_type, games_played, correct_answers,
                      total_answers, highest_streak, updated_at
            "#,
        )
        .bind(player_id)
        .bind(game.as_str())
        .bind(count_to_db("games_played", progress.games_played)?)
        .bind(count_to_db("correct_answers", progress.correct_answers)?)
        .bind(count_to_db("total_answers", progress.total_answers)?)
        .bind(count_to_db("highest_streak", progress.highest_streak)?)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    // === Achievements ===

    pub async fn get_achievements(&self, player_id: Uuid) -> Result<Vec<DbAchievement>> {
        let rows = sqlx::query_as::<_, DbAchievement>(
            r#"
            SELECT achievement, earned_at
            FROM achievements
            WHERE player_id = $1
            ORDER BY id
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Returns whether the badge was newly stored.
    pub async fn add_achievement(&self, player_id: Uuid, achievement: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO achievements (player_id, achievement)
            VALUES ($1, $2)
            ON CONFLICT (player_id, achievement) DO NOTHING
            "#,
        )
        .bind(player_id)
        .bind(achievement)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    // === Leaderboard ===

    pub async fn get_leaderboard(&self, limit: i64) -> Result<Vec<DbLeaderboardEntry>> {
        let rows = sqlx::query_as::<_, DbLeaderboardEntry>(
            r#"
            SELECT id, name, avatar, level, total_stars
            FROM profiles
            ORDER BY total_stars DESC, updated_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
