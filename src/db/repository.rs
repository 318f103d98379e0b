//! Database repository for the four site collections.
//!
//! Every write is a single statement; nothing here spans collections.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Feedback, Query, Rating, Review};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Close the pool. Later calls fail with a database error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ==================== FEEDBACK ====================

    /// List all feedback, newest first.
    pub async fn list_feedbacks(&self) -> Result<Vec<Feedback>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, email, feedback, created_at FROM feedbacks ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(feedback_from_row).collect())
    }

    /// Store a feedback message.
    pub async fn create_feedback(
        &self,
        name: &str,
        email: Option<&str>,
        feedback: &str,
    ) -> Result<Feedback, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO feedbacks (id, name, email, feedback, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(email)
        .bind(feedback)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Feedback {
            id,
            name: name.to_string(),
            email: email.map(str::to_string),
            feedback: feedback.to_string(),
            created_at: now,
        })
    }

    // ==================== QUERIES ====================

    /// List all queries, newest first.
    pub async fn list_queries(&self) -> Result<Vec<Query>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, email, query, created_at FROM queries ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(query_from_row).collect())
    }

    /// Store a visitor question.
    pub async fn create_query(
        &self,
        name: &str,
        email: Option<&str>,
        query: &str,
    ) -> Result<Query, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO queries (id, name, email, query, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(name)
            .bind(email)
            .bind(query)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(Query {
            id,
            name: name.to_string(),
            email: email.map(str::to_string),
            query: query.to_string(),
            created_at: now,
        })
    }

    // ==================== REVIEWS ====================

    /// List all reviews, newest first.
    pub async fn list_reviews(&self) -> Result<Vec<Review>, AppError> {
        let rows = sqlx::query(
            "SELECT id, username, comment, date_published, language, user_id FROM reviews ORDER BY date_published DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(review_from_row).collect())
    }

    /// Store a review.
    pub async fn create_review(
        &self,
        username: &str,
        comment: &str,
        language: &str,
        user_id: Option<&str>,
    ) -> Result<Review, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO reviews (id, username, comment, date_published, language, user_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(username)
        .bind(comment)
        .bind(&now)
        .bind(language)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(Review {
            id,
            username: username.to_string(),
            comment: comment.to_string(),
            date_published: now,
            language: language.to_string(),
            user_id: user_id.map(str::to_string),
        })
    }

    // ==================== RATINGS ====================

    /// List all ratings, most recently updated first.
    pub async fn list_ratings(&self) -> Result<Vec<Rating>, AppError> {
        let rows = sqlx::query(
            "SELECT user_id, rating, updated_at FROM ratings ORDER BY updated_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(rating_from_row).collect())
    }

    /// Insert or replace the rating for `user_id`. Concurrent writers race; the last one wins.
    pub async fn upsert_rating(&self, user_id: &str, rating: i64) -> Result<Rating, AppError> {
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query(
            r#"INSERT INTO ratings (user_id, rating, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET rating = excluded.rating, updated_at = excluded.updated_at
               RETURNING user_id, rating, updated_at"#,
        )
        .bind(user_id)
        .bind(rating)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        Ok(rating_from_row(&row))
    }
}

// Helper functions for row conversion

fn feedback_from_row(row: &sqlx::sqlite::SqliteRow) -> Feedback {
    Feedback {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        feedback: row.get("feedback"),
        created_at: row.get("created_at"),
    }
}

fn query_from_row(row: &sqlx::sqlite::SqliteRow) -> Query {
    Query {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        query: row.get("query"),
        created_at: row.get("created_at"),
    }
}

fn review_from_row(row: &sqlx::sqlite::SqliteRow) -> Review {
    Review {
        id: row.get("id"),
        username: row.get("username"),
        comment: row.get("comment"),
        date_published: row.get("date_published"),
        language: row.get("language"),
        user_id: row.get("user_id"),
    }
}

fn rating_from_row(row: &sqlx::sqlite::SqliteRow) -> Rating {
    Rating {
        user_id: row.get("user_id"),
        rating: row.get("rating"),
        updated_at: row.get("updated_at"),
    }
}
