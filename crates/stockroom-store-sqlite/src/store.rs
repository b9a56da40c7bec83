//! [`SqliteStore`] — the SQLite implementation of [`CategoryStore`] and
//! [`ItemStore`].

use std::{ffi::c_int, path::Path};

use chrono::{NaiveDate, Utc};
use rusqlite::{
  OptionalExtension as _, ffi,
  functions::{Context, FunctionFlags},
  types::Value,
};

use stockroom_core::{
  category::{Category, NewCategory},
  item::{Item, NewItem},
  store::{CategoryStore, ItemStore, SearchPattern},
};

use crate::{
  Error, Result,
  encode::{CATEGORY_COLUMNS, ITEM_SELECT, RawCategory, RawItem, encode_date, encode_dt},
  schema::SCHEMA,
};

/// Result of an update or delete that can hit a missing row or a constraint.
enum Write<T> {
  Done(T),
  Missing,
  Rejected,
}

/// Result of an insert; there is no row to miss.
enum Insert<T> {
  Done(T),
  Rejected,
}

fn violates(err: &rusqlite::Error, extended_code: c_int) -> bool {
  matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.extended_code == extended_code)
}

/// A foreign key violation. `ON DELETE RESTRICT` reports through the trigger
/// code rather than the plain foreign key one.
fn violates_foreign_key(err: &rusqlite::Error) -> bool {
  violates(err, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) || violates(err, ffi::SQLITE_CONSTRAINT_TRIGGER)
}

/// SQL name of the Unicode lowercasing function registered on every
/// connection. The built-in `LOWER()` folds ASCII only.
const FOLD_CASE: &str = "fold_case";

fn fold_case(ctx: &Context<'_>) -> rusqlite::Result<Option<String>> {
  Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase()))
}

fn fetch_item(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<RawItem> {
  conn.query_row(
    &format!("{ITEM_SELECT} WHERE i.id = ?1"),
    rusqlite::params![id],
    RawItem::from_row,
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Stockroom inventory backed by a single SQLite file.
///
/// Clones share the same background connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open a fresh in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.create_scalar_function(
          FOLD_CASE,
          1,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          fold_case,
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run an item query built on [`ITEM_SELECT`] with positional `params`.
  async fn query_items(&self, sql: String, params: Vec<Value>) -> Result<Vec<Item>> {
    let raws: Vec<RawItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawItem::into_item).collect()
  }
}

// ─── CategoryStore impl ──────────────────────────────────────────────────────

impl CategoryStore for SqliteStore {
  type Error = Error;

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let raws: Vec<RawCategory> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawCategory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCategory::into_category).collect()
  }

  async fn get_category(&self, id: i64) -> Result<Option<Category>> {
    let raw: Option<RawCategory> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
              rusqlite::params![id],
              RawCategory::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCategory::into_category).transpose()
  }

  async fn create_category(&self, input: NewCategory) -> Result<Category> {
    let now = Utc::now();
    let at_str = encode_dt(now);
    let name = input.name.clone();
    let description = input.description.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO categories (name, description, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![name, description, at_str],
        );
        match inserted {
          Ok(_) => Ok(Insert::Done(conn.last_insert_rowid())),
          Err(e) if violates(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => Ok(Insert::Rejected),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Insert::Done(id) => Ok(Category {
        id,
        name: input.name,
        description: input.description,
        created_at: now,
        updated_at: now,
      }),
      Insert::Rejected => Err(Error::NameTaken(input.name)),
    }
  }

  async fn update_category(&self, id: i64, input: NewCategory) -> Result<Option<Category>> {
    let at_str = encode_dt(Utc::now());
    let name = input.name.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let updated = conn.execute(
          "UPDATE categories SET name = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
          rusqlite::params![input.name, input.description, at_str, id],
        );
        match updated {
          Ok(0) => Ok(Write::Missing),
          Ok(_) => Ok(Write::Done(conn.query_row(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
            rusqlite::params![id],
            RawCategory::from_row,
          )?)),
          Err(e) if violates(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => Ok(Write::Rejected),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Write::Done(raw) => raw.into_category().map(Some),
      Write::Missing => Ok(None),
      Write::Rejected => Err(Error::NameTaken(name)),
    }
  }

  async fn delete_category(&self, id: i64) -> Result<bool> {
    let outcome = self
      .conn
      .call(move |conn| {
        let in_use = conn.query_row(
          "SELECT EXISTS (SELECT 1 FROM items WHERE category_id = ?1)",
          rusqlite::params![id],
          |r| r.get::<_, bool>(0),
        )?;
        if in_use {
          return Ok(Write::Rejected);
        }
        match conn.execute("DELETE FROM categories WHERE id = ?1", rusqlite::params![id]) {
          Ok(0) => Ok(Write::Missing),
          Ok(_) => Ok(Write::Done(())),
          Err(e) if violates_foreign_key(&e) => Ok(Write::Rejected),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Write::Done(()) => Ok(true),
      Write::Missing => Ok(false),
      Write::Rejected => Err(Error::CategoryInUse(id)),
    }
  }

  async fn category_name_exists<'a>(
    &'a self,
    name: &'a str,
    exclude_id: Option<i64>,
  ) -> Result<bool> {
    let name = name.to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS (
             SELECT 1 FROM categories WHERE name = ?1 AND (?2 IS NULL OR id != ?2)
           )",
          rusqlite::params![name, exclude_id],
          |r| r.get::<_, bool>(0),
        )?)
      })
      .await?;

    Ok(exists)
  }
}

// ─── ItemStore impl ──────────────────────────────────────────────────────────

impl ItemStore for SqliteStore {
  type Error = Error;

  async fn list_items(&self) -> Result<Vec<Item>> {
    self.query_items(format!("{ITEM_SELECT} ORDER BY i.id"), vec![]).await
  }

  async fn get_item(&self, id: i64) -> Result<Option<Item>> {
    let raw: Option<RawItem> = self
      .conn
      .call(move |conn| Ok(fetch_item(conn, id).optional()?))
      .await?;

    raw.map(RawItem::into_item).transpose()
  }

  async fn create_item(&self, input: NewItem) -> Result<Item> {
    let at_str = encode_dt(Utc::now());
    let date_str = encode_date(input.purchase_date);
    let category_id = input.category_id;

    let outcome = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO items (name, category_id, price, purchase_date, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![input.name, input.category_id, input.price, date_str, at_str],
        );
        match inserted {
          Ok(_) => Ok(Insert::Done(fetch_item(conn, conn.last_insert_rowid())?)),
          Err(e) if violates_foreign_key(&e) => Ok(Insert::Rejected),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Insert::Done(raw) => raw.into_item(),
      Insert::Rejected => Err(Error::UnknownCategory(category_id)),
    }
  }

  async fn update_item(&self, id: i64, input: NewItem) -> Result<Option<Item>> {
    let at_str = encode_dt(Utc::now());
    let date_str = encode_date(input.purchase_date);
    let category_id = input.category_id;

    let outcome = self
      .conn
      .call(move |conn| {
        let updated = conn.execute(
          "UPDATE items
           SET name = ?1, category_id = ?2, price = ?3, purchase_date = ?4, updated_at = ?5
           WHERE id = ?6",
          rusqlite::params![input.name, input.category_id, input.price, date_str, at_str, id],
        );
        match updated {
          Ok(0) => Ok(Write::Missing),
          Ok(_) => Ok(Write::Done(fetch_item(conn, id)?)),
          Err(e) if violates_foreign_key(&e) => Ok(Write::Rejected),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Write::Done(raw) => raw.into_item().map(Some),
      Write::Missing => Ok(None),
      Write::Rejected => Err(Error::UnknownCategory(category_id)),
    }
  }

  async fn delete_item(&self, id: i64) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM items WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    Ok(affected > 0)
  }

  async fn search_items<'a>(&'a self, pattern: &'a SearchPattern) -> Result<Vec<Item>> {
    // `pattern` is already lowercased with the same Unicode rules.
    self
      .query_items(
        format!("{ITEM_SELECT} WHERE {FOLD_CASE}(i.name) LIKE ?1 ESCAPE '\\' ORDER BY i.id"),
        vec![pattern.as_like().into()],
      )
      .await
  }

  async fn items_older_than(&self, days: i64, today: NaiveDate) -> Result<Vec<Item>> {
    self
      .query_items(
        format!(
          "{ITEM_SELECT}
           WHERE julianday(?1) - julianday(i.purchase_date) > ?2
           ORDER BY i.purchase_date ASC, i.id ASC"
        ),
        vec![encode_date(today).into(), days.into()],
      )
      .await
  }
}
