//! Error types for `stockroom-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed input: an empty required field or a non-positive id/price.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("category not found: {0}")]
  CategoryNotFound(i64),

  #[error("item not found: {0}")]
  ItemNotFound(i64),

  #[error("category with name {0:?} already exists")]
  DuplicateCategoryName(String),

  /// Failure inside the storage backend, carried through unchanged.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  /// Box a backend error. Used as `.map_err(Error::store)`.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::CategoryNotFound(_) | Self::ItemNotFound(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
