use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::model::{ClimateSuitability, HybridRecord, SuccessScore, YieldLevel};
use crate::store::traits::HybridStore;

const CREATE_HYBRIDS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS hybrids (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        parent_a TEXT NOT NULL,
        parent_b TEXT NOT NULL,
        expected_heat INTEGER NOT NULL,
        expected_yield TEXT NOT NULL,
        climate_suitability TEXT NOT NULL,
        expected_flavor TEXT NOT NULL,
        ai_success_score TEXT NOT NULL DEFAULT 'Unknown'
    )
"#;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `database_url`.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid SQLite URL '{}'", database_url))?
            .create_if_missing(true);

        // Each in-memory connection is its own database, so pin the pool to one
        // connection that never gets recycled.
        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to create SQLite connection pool")?;

        Ok(Self { pool })
    }

    /// Fresh in-memory store with the schema applied.
    pub async fn in_memory() -> Result<Self> {
        let store = Self::new("sqlite::memory:", 1).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Create the hybrids table if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_HYBRIDS_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create hybrids table")?;
        Ok(())
    }
}

fn row_to_record(row: &SqliteRow) -> Result<HybridRecord> {
    let id: i64 = row.get("id");
    let heat: i64 = row.get("expected_heat");
    let heat = u64::try_from(heat)
        .with_context(|| format!("Stored hybrid {} has negative heat {}", id, heat))?;
    let expected_yield: String = row.get("expected_yield");
    let climate: String = row.get("climate_suitability");
    let score: String = row.get("ai_success_score");

    Ok(HybridRecord {
        id: Some(id),
        ai_success_score: Some(SuccessScore::parse(&score)),
        ..HybridRecord::new(
            row.get::<String, _>("parent_a"),
            row.get::<String, _>("parent_b"),
            heat,
            YieldLevel::parse(&expected_yield),
            ClimateSuitability::parse(&climate),
            row.get::<String, _>("expected_flavor"),
        )
    })
}

#[async_trait::async_trait]
impl HybridStore for SqliteStore {
    async fn list_hybrids(&self) -> Result<Vec<HybridRecord>> {
        let rows = sqlx::query(
            "SELECT id, parent_a, parent_b, expected_heat, expected_yield, climate_suitability, expected_flavor, ai_success_score FROM hybrids ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list hybrids")?;

        rows.iter().map(row_to_record).collect()
    }

    async fn insert_hybrid(&self, record: &HybridRecord) -> Result<i64> {
        let heat = i64::try_from(record.expected_heat_shu)
            .context("Expected heat does not fit the hybrids table")?;
        let score = record
            .ai_success_score
            .unwrap_or(SuccessScore::Unknown)
            .to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO hybrids (parent_a, parent_b, expected_heat, expected_yield, climate_suitability, expected_flavor, ai_success_score)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.parent_a)
        .bind(&record.parent_b)
        .bind(heat)
        .bind(record.expected_yield.as_str())
        .bind(record.climate_suitability.as_str())
        .bind(&record.expected_flavor)
        .bind(score)
        .execute(&self.pool)
        .await
        .context("Failed to insert hybrid")?;

        Ok(result.last_insert_rowid())
    }

    async fn count_hybrids(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM hybrids")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count hybrids")?;
        Ok(row.get("count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = SqliteStore::in_memory().await.unwrap();

        let mut record = HybridRecord::new(
            "Carolina Reaper",
            "Habanero",
            1_200_000,
            YieldLevel::VeryHigh,
            ClimateSuitability::High,
            "Smoky",
        );
        record.id = Some(99);
        let first = store.insert_hybrid(&record).await.unwrap();
        let second = store.insert_hybrid(&record).await.unwrap();
        assert!(second > first);
        assert_eq!(store.count_hybrids().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_round_trips_values() {
        let store = SqliteStore::in_memory().await.unwrap();

        let mut scored = HybridRecord::new("A", "B", 500_000, YieldLevel::High, ClimateSuitability::Medium, "Fruity");
        scored.ai_success_score = Some(SuccessScore::Score(0.625));
        let unscored = HybridRecord::new("C", "D", 0, YieldLevel::Other("Huge".to_string()), ClimateSuitability::Low, "Sweet");

        let id = store.insert_hybrid(&scored).await.unwrap();
        store.insert_hybrid(&unscored).await.unwrap();

        let records = store.list_hybrids().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, Some(id));
        assert_eq!(records[0].expected_heat_shu, 500_000);
        assert_eq!(records[0].ai_success_score, Some(SuccessScore::Score(0.625)));
        assert_eq!(records[1].expected_yield, YieldLevel::Other("Huge".to_string()));
        assert_eq!(records[1].ai_success_score, Some(SuccessScore::Unknown));
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        assert_eq!(store.count_hybrids().await.unwrap(), 0);
    }
}
