//! The `CategoryStore` and `ItemStore` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `stockroom-store-sqlite`). The services in [`crate::service`] depend on
//! this abstraction, not on any concrete backend.
//!
//! "Not found" is not an error at this level: lookups return `Option`, and
//! updates and deletes report whether a row was touched. The services turn
//! those into [`crate::Error`] variants.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  category::{Category, NewCategory},
  item::{Item, NewItem},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// A case-insensitive substring filter over item names.
///
/// Built by the caller from an already trimmed, non-empty keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
  needle: String,
}

impl SearchPattern {
  pub fn contains(keyword: &str) -> Self {
    Self { needle: keyword.to_lowercase() }
  }

  /// The lowercased keyword.
  pub fn keyword(&self) -> &str { &self.needle }

  /// SQL `LIKE` operand: the keyword wrapped in `%` wildcards, with `\` as
  /// the escape character for literal `%`, `_` and `\`.
  pub fn as_like(&self) -> String {
    let mut out = String::with_capacity(self.needle.len() + 2);
    out.push('%');
    for c in self.needle.chars() {
      if matches!(c, '%' | '_' | '\\') {
        out.push('\\');
      }
      out.push(c);
    }
    out.push('%');
    out
  }

  /// In-process equivalent of the `LIKE` form. Backends must fold the
  /// stored name with the same Unicode lowercasing before comparing.
  pub fn matches(&self, name: &str) -> bool {
    name.to_lowercase().contains(&self.needle)
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Persistence for [`Category`] records.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded runtimes.
pub trait CategoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All categories ordered by id.
  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  fn get_category(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + '_;

  /// Persist a new category; the store assigns the id and timestamps.
  fn create_category(
    &self,
    input: NewCategory,
  ) -> impl Future<Output = Result<Category, Self::Error>> + Send + '_;

  /// Overwrite name and description. Returns `None` if no row has `id`.
  fn update_category(
    &self,
    id: i64,
    input: NewCategory,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + '_;

  /// Returns `false` if no row has `id`.
  ///
  /// Backends decide what happens to items still filed under the category.
  fn delete_category(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Whether some category other than `exclude_id` is named exactly `name`.
  fn category_name_exists<'a>(
    &'a self,
    name: &'a str,
    exclude_id: Option<i64>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

/// Persistence for [`Item`] records. Every returned item carries its
/// category's name.
pub trait ItemStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All items ordered by id.
  fn list_items(
    &self,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + '_;

  fn get_item(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// Persist a new item; the store assigns the id and timestamps.
  fn create_item(
    &self,
    input: NewItem,
  ) -> impl Future<Output = Result<Item, Self::Error>> + Send + '_;

  /// Returns `None` if no row has `id`.
  fn update_item(
    &self,
    id: i64,
    input: NewItem,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + '_;

  /// Returns `false` if no row has `id`.
  fn delete_item(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Items whose name matches `pattern`, ordered by id.
  fn search_items<'a>(
    &'a self,
    pattern: &'a SearchPattern,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + 'a;

  /// Items purchased strictly more than `days` days before `today`, oldest
  /// purchase first.
  fn items_older_than(
    &self,
    days: i64,
    today: NaiveDate,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::SearchPattern;

  #[test]
  fn like_form_wraps_and_escapes() {
    assert_eq!(SearchPattern::contains("Laptop").as_like(), "%laptop%");
    assert_eq!(SearchPattern::contains("50%_off").as_like(), "%50\\%\\_off%");
  }

  #[test]
  fn matches_ignores_case() {
    let pattern = SearchPattern::contains("laptop");
    assert!(pattern.matches("Laptop Dell"));
    assert!(pattern.matches("Gaming LAPTOP"));
    assert!(!pattern.matches("Monitor"));
  }

  #[test]
  fn folds_non_ascii_case() {
    let pattern = SearchPattern::contains("ÉLITE");
    assert_eq!(pattern.keyword(), "élite");
    assert!(pattern.matches("Kursi Élite"));
  }
}
