//! Inventory items.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A persisted inventory item, read together with its category's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
  pub id:            i64,
  pub name:          String,
  /// Non-owning reference to a [`crate::category::Category`].
  pub category_id:   i64,
  /// Joined from the category on read; never written through an item.
  pub category_name: String,
  /// Original purchase price. Always strictly positive.
  pub price:         f64,
  pub purchase_date: NaiveDate,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input to [`crate::store::ItemStore::create_item`] and
/// [`crate::store::ItemStore::update_item`].
///
/// Ids and timestamps are always set by the store; they are not accepted from
/// callers.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
  pub name:          String,
  pub category_id:   i64,
  pub price:         f64,
  pub purchase_date: NaiveDate,
}
