use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::domain::HotelId;

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCity {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredHotel {
    pub id: HotelId,
    pub local_code: String,
    pub name: String,
    pub city_code: String,
}

impl StoredHotel {
    pub fn global_code(&self) -> String {
        shared::domain::global_code(&self.city_code, &self.local_code)
    }
}

/// Result of writing a hotel keyed by `(city, local_code)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(HotelId),
    Updated(HotelId),
}

impl SaveOutcome {
    pub fn hotel_id(self) -> HotelId {
        match self {
            SaveOutcome::Created(id) | SaveOutcome::Updated(id) => id,
        }
    }
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Inserts a city or renames the existing one with the same code.
    pub async fn upsert_city(&self, code: &str, name: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO cities (code, name) VALUES (?, ?)
             ON CONFLICT(code) DO UPDATE SET name = excluded.name",
        )
        .bind(code)
        .bind(name)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to upsert city '{code}'"))?;
        Ok(())
    }

    pub async fn list_cities(&self) -> Result<Vec<StoredCity>> {
        let rows = sqlx::query("SELECT code, name FROM cities ORDER BY name, code")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(city_from_row).collect())
    }

    pub async fn city_by_code(&self, code: &str) -> Result<Option<StoredCity>> {
        let row = sqlx::query("SELECT code, name FROM cities WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(city_from_row))
    }

    /// Looks a city up by its display name. Names are not unique; the first
    /// code in order wins.
    pub async fn city_by_name(&self, name: &str) -> Result<Option<StoredCity>> {
        let row = sqlx::query("SELECT code, name FROM cities WHERE name = ? ORDER BY code LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(city_from_row))
    }

    pub async fn list_hotels_for_city(&self, city_code: &str) -> Result<Vec<StoredHotel>> {
        let rows = sqlx::query(
            "SELECT id, local_code, name, city_code FROM hotels WHERE city_code = ? ORDER BY id",
        )
        .bind(city_code)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(hotel_from_row).collect())
    }

    pub async fn hotel_by_id(&self, hotel_id: HotelId) -> Result<Option<StoredHotel>> {
        let row = sqlx::query("SELECT id, local_code, name, city_code FROM hotels WHERE id = ?")
            .bind(hotel_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(hotel_from_row))
    }

    /// Renames the hotel with this `(city, local_code)` pair, or creates it.
    pub async fn save_hotel(
        &self,
        city_code: &str,
        local_code: &str,
        name: &str,
    ) -> Result<SaveOutcome> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM hotels WHERE city_code = ? AND local_code = ?")
                .bind(city_code)
                .bind(local_code)
                .fetch_optional(&mut *tx)
                .await?;

        let outcome = match existing {
            Some(id) => {
                sqlx::query("UPDATE hotels SET name = ? WHERE id = ?")
                    .bind(name)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                SaveOutcome::Updated(HotelId(id))
            }
            None => {
                let rec = sqlx::query(
                    "INSERT INTO hotels (local_code, name, city_code) VALUES (?, ?, ?) RETURNING id",
                )
                .bind(local_code)
                .bind(name)
                .bind(city_code)
                .fetch_one(&mut *tx)
                .await
                .with_context(|| {
                    format!("failed to insert hotel '{local_code}' in city '{city_code}'")
                })?;
                SaveOutcome::Created(HotelId(rec.get::<i64, _>(0)))
            }
        };

        tx.commit().await?;
        debug!(city_code, local_code, ?outcome, "hotel saved");
        Ok(outcome)
    }

    /// Returns `false` when no hotel had this id.
    pub async fn delete_hotel(&self, hotel_id: HotelId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = ?")
            .bind(hotel_id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn city_from_row(row: sqlx::sqlite::SqliteRow) -> StoredCity {
    StoredCity {
        code: row.get("code"),
        name: row.get("name"),
    }
}

fn hotel_from_row(row: sqlx::sqlite::SqliteRow) -> StoredHotel {
    StoredHotel {
        id: HotelId(row.get("id")),
        local_code: row.get("local_code"),
        name: row.get("name"),
        city_code: row.get("city_code"),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
