//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and purchase dates as
//! `YYYY-MM-DD`, so both sort lexically and work with SQLite's date
//! functions.

use chrono::{DateTime, NaiveDate, Utc};
use stockroom_core::{category::Category, item::Item};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCategory::from_row`].
pub const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Raw values read directly from a `categories` row.
pub struct RawCategory {
  pub id:          i64,
  pub name:        String,
  pub description: String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawCategory {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      created_at:  row.get(3)?,
      updated_at:  row.get(4)?,
    })
  }

  pub fn into_category(self) -> Result<Category> {
    Ok(Category {
      id:          self.id,
      name:        self.name,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Item columns joined with the category name; matches
/// [`RawItem::from_row`]. Expects `items i JOIN categories c`.
pub const ITEM_SELECT: &str = "
  SELECT i.id, i.name, i.category_id, c.name, i.price,
         i.purchase_date, i.created_at, i.updated_at
  FROM items i
  JOIN categories c ON c.id = i.category_id";

/// Raw values read directly from an `items` row joined with `categories`.
pub struct RawItem {
  pub id:            i64,
  pub name:          String,
  pub category_id:   i64,
  pub category_name: String,
  pub price:         f64,
  pub purchase_date: String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawItem {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      category_id:   row.get(2)?,
      category_name: row.get(3)?,
      price:         row.get(4)?,
      purchase_date: row.get(5)?,
      created_at:    row.get(6)?,
      updated_at:    row.get(7)?,
    })
  }

  pub fn into_item(self) -> Result<Item> {
    Ok(Item {
      id:            self.id,
      name:          self.name,
      category_id:   self.category_id,
      category_name: self.category_name,
      price:         self.price,
      purchase_date: decode_date(&self.purchase_date)?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}
