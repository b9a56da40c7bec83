use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
  Error, Result,
  depreciation::{self, DepreciationSnapshot, InvestmentSummary, REPLACEMENT_THRESHOLD_DAYS},
  item::{Item, NewItem},
  store::{CategoryStore, ItemStore, SearchPattern},
  validation::{validate_id, validate_not_empty, validate_price},
};

/// Item operations and depreciation reports.
///
/// Time-dependent operations take `as_of`, the evaluation instant; `None`
/// means now.
pub struct ItemService<I, C> {
  items:      Arc<I>,
  categories: Arc<C>,
}

impl<I, C> Clone for ItemService<I, C> {
  fn clone(&self) -> Self {
    Self {
      items:      Arc::clone(&self.items),
      categories: Arc::clone(&self.categories),
    }
  }
}

impl<I, C> ItemService<I, C>
where
  I: ItemStore,
  C: CategoryStore,
{
  pub fn new(items: Arc<I>, categories: Arc<C>) -> Self { Self { items, categories } }

  // ── CRUD ──────────────────────────────────────────────────────────────────

  pub async fn get_all(&self) -> Result<Vec<Item>> {
    self.items.list_items().await.map_err(Error::store)
  }

  pub async fn get_by_id(&self, id: i64) -> Result<Item> {
    validate_id(id)?;
    self
      .items
      .get_item(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ItemNotFound(id))
  }

  pub async fn create(
    &self,
    name: &str,
    category_id: i64,
    price: f64,
    purchase_date: NaiveDate,
  ) -> Result<Item> {
    let input = self.checked_input(name, category_id, price, purchase_date).await?;
    let item = self.items.create_item(input).await.map_err(Error::store)?;

    tracing::info!(item_id = item.id, name = %item.name, "item created");
    Ok(item)
  }

  pub async fn update(
    &self,
    id: i64,
    name: &str,
    category_id: i64,
    price: f64,
    purchase_date: NaiveDate,
  ) -> Result<Item> {
    validate_id(id)?;
    let input = self.checked_input(name, category_id, price, purchase_date).await?;
    let item = self
      .items
      .update_item(id, input)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ItemNotFound(id))?;

    tracing::info!(item_id = id, "item updated");
    Ok(item)
  }

  pub async fn delete(&self, id: i64) -> Result<()> {
    validate_id(id)?;
    if !self.items.delete_item(id).await.map_err(Error::store)? {
      return Err(Error::ItemNotFound(id));
    }

    tracing::info!(item_id = id, "item deleted");
    Ok(())
  }

  /// Case-insensitive substring search on item names. No match is an empty
  /// list, not an error.
  pub async fn search(&self, keyword: &str) -> Result<Vec<Item>> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
      return Err(Error::validation("search keyword cannot be empty"));
    }

    let pattern = SearchPattern::contains(keyword);
    let items = self.items.search_items(&pattern).await.map_err(Error::store)?;
    tracing::debug!(keyword, matches = items.len(), "item search");
    Ok(items)
  }

  // ── Depreciation ──────────────────────────────────────────────────────────

  /// Items older than [`REPLACEMENT_THRESHOLD_DAYS`], oldest purchase first.
  pub async fn items_need_replacement(
    &self,
    as_of: Option<DateTime<Utc>>,
  ) -> Result<Vec<Item>> {
    let today = as_of.unwrap_or_else(Utc::now).date_naive();
    self
      .items
      .items_older_than(REPLACEMENT_THRESHOLD_DAYS, today)
      .await
      .map_err(Error::store)
  }

  pub async fn item_depreciation(
    &self,
    id: i64,
    as_of: Option<DateTime<Utc>>,
  ) -> Result<DepreciationSnapshot> {
    let item = self.get_by_id(id).await?;
    Ok(depreciation::calculate(item, as_of.unwrap_or_else(Utc::now)))
  }

  /// A snapshot for every item, ordered by id.
  pub async fn depreciation_report(
    &self,
    as_of: Option<DateTime<Utc>>,
  ) -> Result<Vec<DepreciationSnapshot>> {
    let as_of = as_of.unwrap_or_else(Utc::now);
    let items = self.get_all().await?;
    Ok(
      items
        .into_iter()
        .map(|item| depreciation::calculate(item, as_of))
        .collect(),
    )
  }

  /// Original and current value summed over all items.
  pub async fn total_investment(
    &self,
    as_of: Option<DateTime<Utc>>,
  ) -> Result<InvestmentSummary> {
    let snapshots = self.depreciation_report(as_of).await?;
    Ok(snapshots.iter().collect())
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  /// Shared create/update checks, in order: name, category id, price, then
  /// that the category exists.
  async fn checked_input(
    &self,
    name: &str,
    category_id: i64,
    price: f64,
    purchase_date: NaiveDate,
  ) -> Result<NewItem> {
    let name = name.trim();
    validate_not_empty(name, "Item name")?;
    validate_id(category_id)
      .map_err(|_| Error::validation("invalid category ID: ID must be greater than 0"))?;
    validate_price(price)?;

    let category = self
      .categories
      .get_category(category_id)
      .await
      .map_err(Error::store)?;
    if category.is_none() {
      tracing::warn!(category_id, "item references unknown category");
      return Err(Error::CategoryNotFound(category_id));
    }

    Ok(NewItem {
      name: name.to_owned(),
      category_id,
      price,
      purchase_date,
    })
  }
}
