pub mod repository;

use std::path::{Path, PathBuf};

use rusqlite_migration::{Migrations, M};

use crate::error::{Error, Result};
use crate::records::{RatingRecord, ShiftRecord};

/// The data store: a SQLite file holding the close-shift and rating tables.
///
/// All access goes through one `tokio_rusqlite` connection, which serializes
/// calls on its own thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Default store location (`~/.closedash/closedash.db`).
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::home_dir()
            .ok_or_else(|| Error::Config("cannot determine home directory".into()))?
            .join(".closedash");
        Ok(dir.join("closedash.db"))
    }

    /// Open an existing store. A missing file is reported as
    /// [`Error::SourceNotFound`], never created.
    pub async fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.display().to_string()));
        }
        Self::open_at(path).await
    }

    /// Create the store at `path` (and its parent directory) if needed.
    pub async fn create_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::Config(e.to_string()))?;
        }
        Self::open_at(path).await
    }

    async fn open_at(path: &Path) -> Result<Self> {
        let conn = tokio_rusqlite::Connection::open(path).await?;
        Self::init(&conn).await?;
        log::debug!("Opened data store at {}", path.display());
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory store (for testing).
    pub async fn open_memory() -> Result<Self> {
        let conn = tokio_rusqlite::Connection::open_in_memory().await?;
        Self::init(&conn).await?;
        Ok(Self { conn, path: None })
    }

    async fn init(conn: &tokio_rusqlite::Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;\
                 PRAGMA busy_timeout=5000;",
            )
            .map_err(|e| e.to_string())?;
            let migrations = Migrations::new(vec![M::up(include_str!(
                "migrations/001_initial.sql"
            ))]);
            migrations.to_latest(conn).map_err(|e| e.to_string())?;
            Ok::<(), String>(())
        })
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference to the underlying connection.
    pub fn conn(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Load both tables, in insertion order.
    pub async fn load(&self) -> Result<(Vec<ShiftRecord>, Vec<RatingRecord>)> {
        let (shifts, ratings) = self
            .conn
            .call(|conn| {
                let shifts = repository::list_shifts(conn)?;
                let ratings = repository::list_ratings(conn)?;
                Ok::<_, rusqlite::Error>((shifts, ratings))
            })
            .await?;
        log::info!(
            "Loaded {} close shifts and {} rating rows",
            shifts.len(),
            ratings.len()
        );
        Ok((shifts, ratings))
    }

    /// Overwrite both tables with the given collections.
    pub async fn save(&self, shifts: Vec<ShiftRecord>, ratings: Vec<RatingRecord>) -> Result<()> {
        let (n_shifts, n_ratings) = (shifts.len(), ratings.len());
        self.conn
            .call(move |conn| repository::replace_all(conn, &shifts, &ratings))
            .await?;
        log::info!("Saved {n_shifts} close shifts and {n_ratings} rating rows");
        Ok(())
    }

    pub async fn append_shift(&self, shift: ShiftRecord) -> Result<i64> {
        Ok(self
            .conn
            .call(move |conn| repository::insert_shift(conn, &shift))
            .await?)
    }

    pub async fn append_rating(&self, rating: RatingRecord) -> Result<i64> {
        Ok(self
            .conn
            .call(move |conn| repository::insert_rating(conn, &rating))
            .await?)
    }

    /// Row counts of (close shifts, ratings).
    pub async fn counts(&self) -> Result<(i64, i64)> {
        Ok(self.conn.call(|conn| repository::counts(conn)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn shift(day: u32, revenue: f64) -> ShiftRecord {
        ShiftRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            location: "Amiens".into(),
            period_label: "23:00 - 00:00".into(),
            order_count: day,
            revenue,
        }
    }

    fn rating(day: u32, brand: &str) -> RatingRecord {
        RatingRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            location: "Beauvais".into(),
            brand: brand.into(),
            rating_platform_a: 4.7,
            rating_platform_b: 4.3,
        }
    }

    #[tokio::test]
    async fn test_open_memory_has_tables() {
        let db = Database::open_memory().await.unwrap();

        let tables: Vec<String> = db
            .conn()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                Ok::<Vec<String>, rusqlite::Error>(rows.filter_map(|r| r.ok()).collect())
            })
            .await
            .unwrap();

        assert!(tables.contains(&"close_shifts".to_string()));
        assert!(tables.contains(&"ratings".to_string()));
        assert_eq!(db.counts().await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_append_and_load_preserves_order() {
        let db = Database::open_memory().await.unwrap();
        db.append_shift(shift(3, 300.0)).await.unwrap();
        db.append_shift(shift(1, 120.5)).await.unwrap();
        db.append_rating(rating(2, "Smash")).await.unwrap();

        let (shifts, ratings) = db.load().await.unwrap();
        assert_eq!(shifts, vec![shift(3, 300.0), shift(1, 120.5)]);
        assert_eq!(ratings, vec![rating(2, "Smash")]);
    }

    #[tokio::test]
    async fn test_save_replaces_tables() {
        let db = Database::open_memory().await.unwrap();
        db.append_shift(shift(9, 1.0)).await.unwrap();

        let shifts = vec![shift(1, 10.0), shift(2, 20.0)];
        let ratings = vec![rating(1, "Tacos"), rating(1, "Smash")];
        db.save(shifts.clone(), ratings.clone()).await.unwrap();

        let (loaded_shifts, loaded_ratings) = db.load().await.unwrap();
        assert_eq!(loaded_shifts, shifts);
        assert_eq!(loaded_ratings, ratings);
    }

    #[tokio::test]
    async fn test_open_existing_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.db");
        match Database::open_existing(&missing).await {
            Err(Error::SourceNotFound(p)) => assert!(p.ends_with("nope.db")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("missing store should not open"),
        }
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn test_create_then_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("closes.db");

        let db = Database::create_at(&path).await.unwrap();
        db.append_shift(shift(1, 42.0)).await.unwrap();
        drop(db);

        let reopened = Database::open_existing(&path).await.unwrap();
        assert_eq!(reopened.path(), Some(path.as_path()));
        let (shifts, _) = reopened.load().await.unwrap();
        assert_eq!(shifts, vec![shift(1, 42.0)]);
    }
}
