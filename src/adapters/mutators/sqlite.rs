//! Append-only persistence for TaskResults and Generations, backed by a
//! single SQLite file. Both tables are created if absent on first connect;
//! every call commits its own transaction.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::time::Duration;

use crate::domain::config::SqliteConfig;
use crate::domain::models::{Generation, TaskResult};
use crate::domain::ports::{GenerationMutator, TaskResultMutator};
use crate::error::PersistError;

pub struct SqlitePersistence {
    pool: SqlitePool,
}

impl SqlitePersistence {
    pub async fn connect(config: &SqliteConfig) -> Result<Self, PersistError> {
        if config.database.is_empty() {
            return Err(PersistError::MissingDatabasePath);
        }
        let url = format!("sqlite://{}?mode=rwc", config.database);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs_f64(config.timeout))
            .connect(&url)
            .await?;
        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await
            .ok();
        let this = Self { pool };
        this.migrate().await?;
        Ok(this)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn migrate(&self) -> Result<(), PersistError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS task_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                url TEXT NOT NULL,
                status_code INTEGER NOT NULL,
                headers TEXT NOT NULL,
                content TEXT NOT NULL,
                hash TEXT NOT NULL,
                language TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                temperature REAL NOT NULL,
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_task_results_hash ON task_results(hash)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_task_results_url ON task_results(url)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_task_results_title ON task_results(title)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS generations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question_answers TEXT NOT NULL,
                references_json TEXT NOT NULL,
                language TEXT NOT NULL DEFAULT 'de',
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_generations_language ON generations(language)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_task_results(&self) -> Result<i64, PersistError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM task_results")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n"))
    }

    pub async fn count_generations(&self) -> Result<i64, PersistError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM generations")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n"))
    }
}

#[async_trait]
impl TaskResultMutator for SqlitePersistence {
    async fn call(&self, value: TaskResult) -> Result<Option<TaskResult>, PersistError> {
        let headers = serde_json::to_string(&value.headers)?;
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO task_results
                (title, url, status_code, headers, content, hash, language, difficulty, temperature)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&value.title)
        .bind(&value.url)
        .bind(value.status_code as i64)
        .bind(&headers)
        .bind(&value.content)
        .bind(&value.hash)
        .bind(value.language.to_string())
        .bind(value.difficulty.to_string())
        .bind(value.temperature)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(value))
    }
}

#[async_trait]
impl GenerationMutator for SqlitePersistence {
    async fn call(&self, value: Generation) -> Result<Option<Generation>, PersistError> {
        let question_answers = serde_json::to_string(&value.question_answers)?;
        let references = serde_json::to_string(&value.references)?;
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO generations (question_answers, references_json, language)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&question_answers)
        .bind(&references)
        .bind(value.language.to_string())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Difficulty, Language, QA};
    use std::collections::HashMap;

    async fn memory_store() -> SqlitePersistence {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqlitePersistence::from_pool(pool);
        store.migrate().await.unwrap();
        store
    }

    fn sample_result() -> TaskResult {
        TaskResult {
            title: "Onboarding".into(),
            url: "12345".into(),
            status_code: 200,
            headers: HashMap::new(),
            content: "Hello world".into(),
            hash: "abc123".into(),
            language: Language::En,
            difficulty: Difficulty::Easy,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn persists_task_result_and_returns_it_unchanged() {
        let store = memory_store().await;
        let result = sample_result();
        let returned = store.call(result.clone()).await.unwrap().unwrap();
        assert_eq!(returned, result);
        assert_eq!(store.count_task_results().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn persists_generation_with_its_references() {
        let store = memory_store().await;
        let generation = Generation {
            question_answers: vec![QA {
                question: "What is this page about?".into(),
                answer: "Onboarding.".into(),
                chunks: vec!["Hello world".into()],
            }],
            references: vec![sample_result()],
            language: Language::En,
        };
        let returned = store.call(generation.clone()).await.unwrap().unwrap();
        assert_eq!(returned, generation);
        assert_eq!(store.count_generations().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let store = memory_store().await;
        store.migrate().await.unwrap();
        store.migrate().await.unwrap();
    }
}
