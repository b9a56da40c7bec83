//! Declining-balance depreciation.
//!
//! An item loses a fixed fraction of its remaining value every year:
//!
//! ```text
//! current_value = price × (1 − DEPRECIATION_RATE) ^ (days_used / DAYS_PER_YEAR)
//! ```
//!
//! Snapshots are computed on demand from an [`Item`] and an evaluation
//! instant. They are never stored.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Fraction of the remaining value lost per year.
pub const DEPRECIATION_RATE: f64 = 0.20;

/// Fixed year length; leap years are not accounted for.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Items strictly older than this many days are due for replacement.
pub const REPLACEMENT_THRESHOLD_DAYS: i64 = 100;

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// An item together with its depreciation as of some instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationSnapshot {
  #[serde(flatten)]
  pub item:               Item,
  /// Whole days between the purchase date and the evaluation instant.
  pub days_used:          i64,
  pub depreciation_rate:  f64,
  pub current_value:      f64,
  /// `item.price - current_value`.
  pub depreciation_value: f64,
}

impl DepreciationSnapshot {
  pub fn years_used(&self) -> f64 { self.days_used as f64 / DAYS_PER_YEAR }

  /// Share of the original price already lost, in percent.
  pub fn depreciation_percentage(&self) -> f64 {
    percentage_of(self.depreciation_value, self.item.price)
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Whole days from midnight UTC of `purchase_date` to `as_of`, rounded down.
///
/// Purchase dates after `as_of` count as zero days.
pub fn days_used(purchase_date: NaiveDate, as_of: DateTime<Utc>) -> i64 {
  let purchased_at = purchase_date.and_time(NaiveTime::MIN).and_utc();
  let hours = (as_of - purchased_at).num_hours();
  hours.div_euclid(24).max(0)
}

/// Value left of `price` after `days_used` days.
///
/// Assumes a validated (positive) price. Exactly `price` when `days_used` is
/// zero.
pub fn current_value(price: f64, days_used: i64) -> f64 {
  let years_used = days_used.max(0) as f64 / DAYS_PER_YEAR;
  price * (1.0 - DEPRECIATION_RATE).powf(years_used)
}

/// Compute the depreciation snapshot for `item` as of `as_of`.
pub fn calculate(item: Item, as_of: DateTime<Utc>) -> DepreciationSnapshot {
  let days_used = days_used(item.purchase_date, as_of);
  let current_value = current_value(item.price, days_used);
  let depreciation_value = item.price - current_value;

  DepreciationSnapshot {
    item,
    days_used,
    depreciation_rate: DEPRECIATION_RATE,
    current_value,
    depreciation_value,
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Totals across a set of items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSummary {
  pub item_count:     usize,
  /// Sum of purchase prices.
  pub total_original: f64,
  /// Sum of current values.
  pub total_current:  f64,
}

impl InvestmentSummary {
  pub fn total_depreciation(&self) -> f64 {
    self.total_original - self.total_current
  }

  /// Zero when there is nothing invested.
  pub fn depreciation_percentage(&self) -> f64 {
    percentage_of(self.total_depreciation(), self.total_original)
  }
}

impl<'a> FromIterator<&'a DepreciationSnapshot> for InvestmentSummary {
  fn from_iter<T: IntoIterator<Item = &'a DepreciationSnapshot>>(iter: T) -> Self {
    iter.into_iter().fold(Self::default(), |acc, snapshot| Self {
      item_count:     acc.item_count + 1,
      total_original: acc.total_original + snapshot.item.price,
      total_current:  acc.total_current + snapshot.current_value,
    })
  }
}

fn percentage_of(part: f64, whole: f64) -> f64 {
  if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}
