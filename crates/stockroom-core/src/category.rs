//! Category records: the named groups items are filed under.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted category. `id` and both timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:          i64,
  /// Unique across all categories (case-sensitive).
  pub name:        String,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::store::CategoryStore::create_category`] and
/// [`crate::store::CategoryStore::update_category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
  pub name:        String,
  pub description: String,
}

impl NewCategory {
  pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
    Self { name: name.into(), description: description.into() }
  }
}
