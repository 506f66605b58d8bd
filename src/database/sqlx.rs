use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use tracing::{debug, info};

use super::history::{HistoryError, HistoryStore, TripRecord};

/// History kept in a SQLite `trip_history` table.
pub struct SqliteHistory {
    pool: SqlitePool,
}

impl SqliteHistory {
    pub async fn connect(database_url: &str) -> Result<Self, HistoryError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        info!("Connected to SQLite database at {database_url}");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trip_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                route TEXT NOT NULL,
                distance_km REAL NOT NULL,
                old_cost REAL NOT NULL,
                new_cost REAL NOT NULL,
                saving REAL NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(SqliteHistory { pool })
    }
}

impl HistoryStore for SqliteHistory {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn append(&self, record: &TripRecord) -> Result<(), HistoryError> {
        sqlx::query(
            r#"
            INSERT INTO trip_history (timestamp, route, distance_km, old_cost, new_cost, saving)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.timestamp.to_rfc3339())
        .bind(&record.route)
        .bind(record.distance_km)
        .bind(record.old_cost)
        .bind(record.new_cost)
        .bind(record.saving)
        .execute(&self.pool)
        .await?;
        debug!("Stored trip record for route {}", record.route);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<TripRecord>, HistoryError> {
        let rows: Vec<(String, String, f64, f64, f64, f64)> = sqlx::query_as(
            "SELECT timestamp, route, distance_km, old_cost, new_cost, saving FROM trip_history ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(timestamp, route, distance_km, old_cost, new_cost, saving)| -> Result<TripRecord, HistoryError> {
                Ok(TripRecord {
                    timestamp: DateTime::parse_from_rfc3339(&timestamp)?.with_timezone(&Utc),
                    route,
                    distance_km,
                    old_cost,
                    new_cost,
                    saving,
                })
            })
            .collect()
    }
}
