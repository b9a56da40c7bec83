use std::sync::Arc;

use crate::{
  Error, Result,
  category::{Category, NewCategory},
  store::CategoryStore,
  validation::{validate_id, validate_not_empty},
};

/// Category operations.
pub struct CategoryService<C> {
  store: Arc<C>,
}

impl<C> Clone for CategoryService<C> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<C: CategoryStore> CategoryService<C> {
  pub fn new(store: Arc<C>) -> Self { Self { store } }

  pub async fn get_all(&self) -> Result<Vec<Category>> {
    self.store.list_categories().await.map_err(Error::store)
  }

  pub async fn get_by_id(&self, id: i64) -> Result<Category> {
    validate_id(id)?;
    self
      .store
      .get_category(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CategoryNotFound(id))
  }

  pub async fn create(&self, name: &str, description: &str) -> Result<Category> {
    let name = name.trim();
    validate_not_empty(name, "Category name")?;
    self.ensure_name_free(name, None).await?;

    let category = self
      .store
      .create_category(NewCategory::new(name, description.trim()))
      .await
      .map_err(Error::store)?;

    tracing::info!(category_id = category.id, name = %category.name, "category created");
    Ok(category)
  }

  /// Rename or re-describe a category. A category may keep its own name.
  pub async fn update(&self, id: i64, name: &str, description: &str) -> Result<Category> {
    validate_id(id)?;
    let name = name.trim();
    validate_not_empty(name, "Category name")?;
    self.ensure_name_free(name, Some(id)).await?;

    let category = self
      .store
      .update_category(id, NewCategory::new(name, description.trim()))
      .await
      .map_err(Error::store)?
      .ok_or(Error::CategoryNotFound(id))?;

    tracing::info!(category_id = id, name = %category.name, "category updated");
    Ok(category)
  }

  /// Whether items still reference the category is left to the store.
  pub async fn delete(&self, id: i64) -> Result<()> {
    validate_id(id)?;
    if !self.store.delete_category(id).await.map_err(Error::store)? {
      return Err(Error::CategoryNotFound(id));
    }

    tracing::info!(category_id = id, "category deleted");
    Ok(())
  }

  async fn ensure_name_free(&self, name: &str, exclude_id: Option<i64>) -> Result<()> {
    let taken = self
      .store
      .category_name_exists(name, exclude_id)
      .await
      .map_err(Error::store)?;
    if taken {
      tracing::warn!(name, "duplicate category name rejected");
      return Err(Error::DuplicateCategoryName(name.to_owned()));
    }
    Ok(())
  }
}
