//! [`MemoryStore`]: an in-process implementation of both store traits.
//!
//! Stands in for a real backend in service tests. Enforces the same
//! constraints as the SQLite schema: unique category names, items must
//! reference an existing category, and a category with items cannot be
//! deleted.

use std::{
  collections::BTreeMap,
  sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
  },
};

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::{
  category::{Category, NewCategory},
  item::{Item, NewItem},
  store::{CategoryStore, ItemStore, SearchPattern},
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("store unavailable")]
  Unavailable,

  #[error("category {0} does not exist")]
  UnknownCategory(i64),

  #[error("category {0} is still referenced by items")]
  CategoryInUse(i64),

  #[error("category name {0:?} is already taken")]
  NameTaken(String),
}

/// An item row as stored: no joined category name.
#[derive(Debug, Clone)]
struct ItemRow {
  id:            i64,
  name:          String,
  category_id:   i64,
  price:         f64,
  purchase_date: NaiveDate,
  created_at:    chrono::DateTime<Utc>,
  updated_at:    chrono::DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
  categories:       BTreeMap<i64, Category>,
  items:            BTreeMap<i64, ItemRow>,
  next_category_id: i64,
  next_item_id:     i64,
}

impl State {
  fn join(&self, row: &ItemRow) -> Item {
    Item {
      id:            row.id,
      name:          row.name.clone(),
      category_id:   row.category_id,
      category_name: self
        .categories
        .get(&row.category_id)
        .map(|c| c.name.clone())
        .unwrap_or_default(),
      price:         row.price,
      purchase_date: row.purchase_date,
      created_at:    row.created_at,
      updated_at:    row.updated_at,
    }
  }

  fn name_taken(&self, name: &str, exclude_id: Option<i64>) -> bool {
    self
      .categories
      .values()
      .any(|c| c.name == name && Some(c.id) != exclude_id)
  }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
  state:       Mutex<State>,
  unavailable: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Make every subsequent call fail with [`MemoryError::Unavailable`].
  pub fn set_unavailable(&self, unavailable: bool) {
    self.unavailable.store(unavailable, Ordering::SeqCst);
  }

  fn lock(&self) -> Result<MutexGuard<'_, State>, MemoryError> {
    if self.unavailable.load(Ordering::SeqCst) {
      return Err(MemoryError::Unavailable);
    }
    Ok(self.state.lock().unwrap_or_else(PoisonError::into_inner))
  }
}

impl CategoryStore for MemoryStore {
  type Error = MemoryError;

  async fn list_categories(&self) -> Result<Vec<Category>, MemoryError> {
    Ok(self.lock()?.categories.values().cloned().collect())
  }

  async fn get_category(&self, id: i64) -> Result<Option<Category>, MemoryError> {
    Ok(self.lock()?.categories.get(&id).cloned())
  }

  async fn create_category(&self, input: NewCategory) -> Result<Category, MemoryError> {
    let mut state = self.lock()?;
    if state.name_taken(&input.name, None) {
      return Err(MemoryError::NameTaken(input.name));
    }

    state.next_category_id += 1;
    let now = Utc::now();
    let category = Category {
      id:          state.next_category_id,
      name:        input.name,
      description: input.description,
      created_at:  now,
      updated_at:  now,
    };
    state.categories.insert(category.id, category.clone());
    Ok(category)
  }

  async fn update_category(
    &self,
    id: i64,
    input: NewCategory,
  ) -> Result<Option<Category>, MemoryError> {
    let mut state = self.lock()?;
    if !state.categories.contains_key(&id) {
      return Ok(None);
    }
    if state.name_taken(&input.name, Some(id)) {
      return Err(MemoryError::NameTaken(input.name));
    }

    Ok(state.categories.get_mut(&id).map(|category| {
      category.name = input.name;
      category.description = input.description;
      category.updated_at = Utc::now();
      category.clone()
    }))
  }

  async fn delete_category(&self, id: i64) -> Result<bool, MemoryError> {
    let mut state = self.lock()?;
    if state.items.values().any(|row| row.category_id == id) {
      return Err(MemoryError::CategoryInUse(id));
    }
    Ok(state.categories.remove(&id).is_some())
  }

  async fn category_name_exists<'a>(
    &'a self,
    name: &'a str,
    exclude_id: Option<i64>,
  ) -> Result<bool, MemoryError> {
    Ok(self.lock()?.name_taken(name, exclude_id))
  }
}

impl ItemStore for MemoryStore {
  type Error = MemoryError;

  async fn list_items(&self) -> Result<Vec<Item>, MemoryError> {
    let state = self.lock()?;
    Ok(state.items.values().map(|row| state.join(row)).collect())
  }

  async fn get_item(&self, id: i64) -> Result<Option<Item>, MemoryError> {
    let state = self.lock()?;
    Ok(state.items.get(&id).map(|row| state.join(row)))
  }

  async fn create_item(&self, input: NewItem) -> Result<Item, MemoryError> {
    let mut state = self.lock()?;
    if !state.categories.contains_key(&input.category_id) {
      return Err(MemoryError::UnknownCategory(input.category_id));
    }

    state.next_item_id += 1;
    let now = Utc::now();
    let row = ItemRow {
      id:            state.next_item_id,
      name:          input.name,
      category_id:   input.category_id,
      price:         input.price,
      purchase_date: input.purchase_date,
      created_at:    now,
      updated_at:    now,
    };
    let item = state.join(&row);
    state.items.insert(row.id, row);
    Ok(item)
  }

  async fn update_item(&self, id: i64, input: NewItem) -> Result<Option<Item>, MemoryError> {
    let mut state = self.lock()?;
    if !state.items.contains_key(&id) {
      return Ok(None);
    }
    if !state.categories.contains_key(&input.category_id) {
      return Err(MemoryError::UnknownCategory(input.category_id));
    }

    let Some(row) = state.items.get_mut(&id) else {
      return Ok(None);
    };
    row.name = input.name;
    row.category_id = input.category_id;
    row.price = input.price;
    row.purchase_date = input.purchase_date;
    row.updated_at = Utc::now();
    let row = row.clone();
    Ok(Some(state.join(&row)))
  }

  async fn delete_item(&self, id: i64) -> Result<bool, MemoryError> {
    Ok(self.lock()?.items.remove(&id).is_some())
  }

  async fn search_items<'a>(
    &'a self,
    pattern: &'a SearchPattern,
  ) -> Result<Vec<Item>, MemoryError> {
    let state = self.lock()?;
    Ok(
      state
        .items
        .values()
        .filter(|row| pattern.matches(&row.name))
        .map(|row| state.join(row))
        .collect(),
    )
  }

  async fn items_older_than(
    &self,
    days: i64,
    today: NaiveDate,
  ) -> Result<Vec<Item>, MemoryError> {
    let state = self.lock()?;
    let mut rows: Vec<&ItemRow> = state
      .items
      .values()
      .filter(|row| (today - row.purchase_date).num_days() > days)
      .collect();
    rows.sort_by_key(|row| (row.purchase_date, row.id));
    Ok(rows.into_iter().map(|row| state.join(row)).collect())
  }
}
