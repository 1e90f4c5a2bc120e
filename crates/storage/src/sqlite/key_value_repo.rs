use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{KeyValueStore, StorageError, StoredValue};

use super::SqliteStore;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn missing(key: &str, kind: &str) -> StorageError {
    StorageError::Serialization(format!("`{key}` is marked {kind} but has no value"))
}

fn map_value_row(key: &str, row: &sqlx::sqlite::SqliteRow) -> Result<StoredValue, StorageError> {
    let kind: String = row.try_get("kind").map_err(ser)?;
    match kind.as_str() {
        "integer" => row
            .try_get::<Option<i64>, _>("int_value")
            .map_err(ser)?
            .map(StoredValue::Integer)
            .ok_or_else(|| missing(key, "integer")),
        "real" => row
            .try_get::<Option<f64>, _>("real_value")
            .map_err(ser)?
            .map(StoredValue::Real)
            .ok_or_else(|| missing(key, "real")),
        "timestamp" => row
            .try_get::<Option<DateTime<Utc>>, _>("ts_value")
            .map_err(ser)?
            .map(StoredValue::Timestamp)
            .ok_or_else(|| missing(key, "timestamp")),
        other => Err(StorageError::Serialization(format!(
            "unknown value kind for `{key}`: {other}"
        ))),
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get_value(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT kind, int_value, real_value, ts_value
                FROM key_values
                WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.map(|row| map_value_row(key, &row)).transpose()
    }

    async fn set_values(&self, entries: &[(&str, StoredValue)]) -> Result<(), StorageError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(conn)?;

        for (key, value) in entries {
            let (int_value, real_value, ts_value) = match *value {
                StoredValue::Integer(v) => (Some(v), None, None),
                StoredValue::Real(v) => (None, Some(v), None),
                StoredValue::Timestamp(v) => (None, None, Some(v)),
            };

            sqlx::query(
                r"
                    INSERT INTO key_values (key, kind, int_value, real_value, ts_value, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(key) DO UPDATE SET
                        kind = excluded.kind,
                        int_value = excluded.int_value,
                        real_value = excluded.real_value,
                        ts_value = excluded.ts_value,
                        updated_at = excluded.updated_at
                ",
            )
            .bind(*key)
            .bind(value.kind())
            .bind(int_value)
            .bind(real_value)
            .bind(ts_value)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
