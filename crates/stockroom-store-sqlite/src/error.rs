//! Error type for `stockroom-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// `ON DELETE RESTRICT`: items still reference the category.
  #[error("category {0} is still referenced by items")]
  CategoryInUse(i64),

  /// An item was written with a `category_id` that has no row.
  #[error("category {0} does not exist")]
  UnknownCategory(i64),

  #[error("category name {0:?} is already taken")]
  NameTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
