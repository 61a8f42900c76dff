use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::records::{RatingRecord, ShiftRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ── Close shifts ───────────────────────────────────────────────────

pub fn insert_shift(conn: &Connection, shift: &ShiftRecord) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO close_shifts (date, location, period_label, order_count, revenue)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            shift.date.format(DATE_FORMAT).to_string(),
            shift.location,
            shift.period_label,
            shift.order_count,
            shift.revenue,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All shifts in insertion order.
pub fn list_shifts(conn: &Connection) -> Result<Vec<ShiftRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT date, location, period_label, order_count, revenue
         FROM close_shifts ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ShiftRecord {
            date: date_column(row, 0)?,
            location: row.get(1)?,
            period_label: row.get(2)?,
            order_count: row.get(3)?,
            revenue: row.get(4)?,
        })
    })?;
    rows.collect()
}

// ── Ratings ────────────────────────────────────────────────────────

pub fn insert_rating(conn: &Connection, rating: &RatingRecord) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO ratings (date, location, brand, rating_platform_a, rating_platform_b)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            rating.date.format(DATE_FORMAT).to_string(),
            rating.location,
            rating.brand,
            rating.rating_platform_a,
            rating.rating_platform_b,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All rating rows in insertion order.
pub fn list_ratings(conn: &Connection) -> Result<Vec<RatingRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT date, location, brand, rating_platform_a, rating_platform_b
         FROM ratings ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RatingRecord {
            date: date_column(row, 0)?,
            location: row.get(1)?,
            brand: row.get(2)?,
            rating_platform_a: row.get(3)?,
            rating_platform_b: row.get(4)?,
        })
    })?;
    rows.collect()
}

// ── Whole store ────────────────────────────────────────────────────

/// Replace both tables with the given rows in one transaction.
pub fn replace_all(
    conn: &mut Connection,
    shifts: &[ShiftRecord],
    ratings: &[RatingRecord],
) -> Result<(), rusqlite::Error> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM close_shifts", [])?;
    tx.execute("DELETE FROM ratings", [])?;
    for shift in shifts {
        insert_shift(&tx, shift)?;
    }
    for rating in ratings {
        insert_rating(&tx, rating)?;
    }
    tx.commit()
}

/// Row counts of (close_shifts, ratings).
pub fn counts(conn: &Connection) -> Result<(i64, i64), rusqlite::Error> {
    let shifts = conn.query_row("SELECT COUNT(*) FROM close_shifts", [], |row| row.get(0))?;
    let ratings = conn.query_row("SELECT COUNT(*) FROM ratings", [], |row| row.get(0))?;
    Ok((shifts, ratings))
}

fn date_column(row: &Row<'_>, idx: usize) -> Result<NaiveDate, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
