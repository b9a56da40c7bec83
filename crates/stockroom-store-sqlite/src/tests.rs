//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use stockroom_core::{
  category::NewCategory,
  item::NewItem,
  store::{CategoryStore, ItemStore, SearchPattern},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn new_item(name: &str, category_id: i64, purchase_date: NaiveDate) -> NewItem {
  NewItem {
    name: name.into(),
    category_id,
    price: 1_500_000.0,
    purchase_date,
  }
}

// ─── Categories ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_category() {
  let s = store().await;

  let cat = s
    .create_category(NewCategory::new("Elektronik", "Peralatan elektronik"))
    .await
    .unwrap();
  assert!(cat.id > 0);

  let fetched = s.get_category(cat.id).await.unwrap().unwrap();
  assert_eq!(fetched, cat);
}

#[tokio::test]
async fn get_category_missing_returns_none() {
  let s = store().await;
  assert!(s.get_category(12).await.unwrap().is_none());
}

#[tokio::test]
async fn list_categories_in_id_order() {
  let s = store().await;
  s.create_category(NewCategory::new("Furniture", "")).await.unwrap();
  s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();

  let all = s.list_categories().await.unwrap();
  let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, ["Furniture", "Elektronik"]);
}

#[tokio::test]
async fn duplicate_category_name_is_rejected_by_schema() {
  let s = store().await;
  s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();

  let err = s
    .create_category(NewCategory::new("Elektronik", "again"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NameTaken(ref n) if n == "Elektronik"));
}

#[tokio::test]
async fn name_exists_honours_exclusion() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();

  assert!(s.category_name_exists("Elektronik", None).await.unwrap());
  assert!(!s.category_name_exists("Elektronik", Some(cat.id)).await.unwrap());
  assert!(!s.category_name_exists("elektronik", None).await.unwrap());
  assert!(!s.category_name_exists("Furniture", None).await.unwrap());
}

#[tokio::test]
async fn update_category_reports_missing_rows() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Old", "old")).await.unwrap();

  let updated = s
    .update_category(cat.id, NewCategory::new("New", "new"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.name, "New");
  assert_eq!(updated.description, "new");
  assert_eq!(updated.created_at, cat.created_at);
  assert!(updated.updated_at >= cat.updated_at);

  let missing = s
    .update_category(999, NewCategory::new("X", ""))
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn delete_category() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Temp", "")).await.unwrap();

  assert!(s.delete_category(cat.id).await.unwrap());
  assert!(!s.delete_category(cat.id).await.unwrap());
}

#[tokio::test]
async fn delete_category_with_items_is_restricted() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();
  s.create_item(new_item("Laptop", cat.id, date(2024, 1, 1))).await.unwrap();

  let err = s.delete_category(cat.id).await.unwrap_err();
  assert!(matches!(err, Error::CategoryInUse(id) if id == cat.id));
  assert!(s.get_category(cat.id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_category_after_its_items_are_gone() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();
  let item = s.create_item(new_item("Laptop", cat.id, date(2024, 1, 1))).await.unwrap();

  assert!(matches!(s.delete_category(cat.id).await, Err(Error::CategoryInUse(_))));
  assert!(s.delete_item(item.id).await.unwrap());
  assert!(s.delete_category(cat.id).await.unwrap());
}

#[tokio::test]
async fn update_item_into_unknown_category_is_rejected() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();
  let item = s.create_item(new_item("Laptop", cat.id, date(2024, 1, 1))).await.unwrap();

  let err = s
    .update_item(item.id, new_item("Laptop", 404, date(2024, 1, 1)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UnknownCategory(404)));
  assert_eq!(s.get_item(item.id).await.unwrap().unwrap(), item);
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_item_returns_joined_row() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();

  let item = s
    .create_item(new_item("Laptop", cat.id, date(2024, 2, 29)))
    .await
    .unwrap();
  assert_eq!(item.category_name, "Elektronik");
  assert_eq!(item.purchase_date, date(2024, 2, 29));
  assert_eq!(item.price, 1_500_000.0);

  let fetched = s.get_item(item.id).await.unwrap().unwrap();
  assert_eq!(fetched, item);
}

#[tokio::test]
async fn create_item_with_unknown_category_is_rejected() {
  let s = store().await;
  let err = s
    .create_item(new_item("Laptop", 404, date(2024, 1, 1)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UnknownCategory(404)));
}

#[tokio::test]
async fn update_and_delete_item() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();
  let other = s.create_category(NewCategory::new("Furniture", "")).await.unwrap();
  let item = s
    .create_item(new_item("Chair", cat.id, date(2024, 1, 1)))
    .await
    .unwrap();

  let mut input = new_item("Office Chair", other.id, date(2024, 3, 1));
  input.price = 900_000.0;
  let updated = s.update_item(item.id, input).await.unwrap().unwrap();
  assert_eq!(updated.name, "Office Chair");
  assert_eq!(updated.category_name, "Furniture");
  assert_eq!(updated.price, 900_000.0);
  assert_eq!(updated.purchase_date, date(2024, 3, 1));

  assert!(
    s.update_item(999, new_item("X", cat.id, date(2024, 1, 1)))
      .await
      .unwrap()
      .is_none()
  );

  assert!(s.delete_item(item.id).await.unwrap());
  assert!(!s.delete_item(item.id).await.unwrap());
  assert!(s.get_item(item.id).await.unwrap().is_none());
}

#[tokio::test]
async fn search_matches_substring_ignoring_case() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();
  for name in ["Laptop Dell", "Gaming LAPTOP", "Monitor", "Lap_top stand", "KURSI ÉLITE"] {
    s.create_item(new_item(name, cat.id, date(2024, 1, 1))).await.unwrap();
  }

  let found = s.search_items(&SearchPattern::contains("Laptop")).await.unwrap();
  let names: Vec<_> = found.iter().map(|i| i.name.as_str()).collect();
  assert_eq!(names, ["Laptop Dell", "Gaming LAPTOP"]);

  // `_` is literal, not a single-character wildcard.
  let found = s.search_items(&SearchPattern::contains("lap_")).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].name, "Lap_top stand");

  // Case folding is not limited to ASCII.
  let found = s.search_items(&SearchPattern::contains("élite")).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].name, "KURSI ÉLITE");

  let none = s.search_items(&SearchPattern::contains("printer")).await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn items_older_than_is_strict_and_oldest_first() {
  let s = store().await;
  let cat = s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();
  let today = date(2025, 6, 1);

  // 100, 101, 10 and 500 days before `today`.
  s.create_item(new_item("Boundary", cat.id, date(2025, 2, 21))).await.unwrap();
  s.create_item(new_item("JustOver", cat.id, date(2025, 2, 20))).await.unwrap();
  s.create_item(new_item("Fresh", cat.id, date(2025, 5, 22))).await.unwrap();
  s.create_item(new_item("Ancient", cat.id, date(2024, 1, 18))).await.unwrap();

  let due = s.items_older_than(100, today).await.unwrap();
  let names: Vec<_> = due.iter().map(|i| i.name.as_str()).collect();
  assert_eq!(names, ["Ancient", "JustOver"]);
}

#[tokio::test]
async fn open_on_disk_persists_across_connections() {
  let dir = std::env::temp_dir().join(format!("stockroom-test-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("inventory.db");
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create_category(NewCategory::new("Elektronik", "")).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let all = s.list_categories().await.unwrap();
  assert_eq!(all.len(), 1);

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}
