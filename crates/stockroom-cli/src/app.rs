//! Command dispatch: one [`Command`] → one service call → rendered output.

use std::{io::Write, sync::Arc};

use anyhow::Result;
use chrono::{DateTime, Utc};
use stockroom_core::{
  service::{CategoryService, ItemService},
  store::{CategoryStore, ItemStore},
};

use crate::{
  cli::{CategoryCommand, Command, ItemCommand, ReportCommand},
  render::{self, Format},
};

/// The services wired to a single store.
pub struct App<S> {
  categories: CategoryService<S>,
  items:      ItemService<S, S>,
  format:     Format,
}

impl<S> App<S>
where
  S: CategoryStore + ItemStore,
{
  pub fn new(store: Arc<S>, format: Format) -> Self {
    Self {
      categories: CategoryService::new(Arc::clone(&store)),
      items: ItemService::new(Arc::clone(&store), store),
      format,
    }
  }

  /// Run `command`, writing its result to `out`. `as_of` is the evaluation
  /// instant for day counts and depreciation.
  pub async fn run(
    &self,
    command: Command,
    as_of: DateTime<Utc>,
    out: &mut impl Write,
  ) -> Result<()> {
    match command {
      Command::Category(cmd) => self.category(cmd, out).await,
      Command::Item(cmd) => self.item(cmd, as_of, out).await,
      Command::Report(cmd) => self.report(cmd, as_of, out).await,
    }
  }

  async fn category(&self, cmd: CategoryCommand, out: &mut impl Write) -> Result<()> {
    let f = self.format;
    match cmd {
      CategoryCommand::List => {
        render::categories(out, f, &self.categories.get_all().await?)?;
      }
      CategoryCommand::Get { id } => {
        render::category(out, f, &self.categories.get_by_id(id).await?)?;
      }
      CategoryCommand::Create { name, description } => {
        let created = self.categories.create(&name, &description).await?;
        self.confirm(out, &created, format!("Category created with ID {}", created.id))?;
      }
      CategoryCommand::Update { id, name, description } => {
        let updated = self.categories.update(id, &name, &description).await?;
        self.confirm(out, &updated, format!("Category {id} updated"))?;
      }
      CategoryCommand::Delete { id } => {
        self.categories.delete(id).await?;
        self.confirm(out, &serde_json::json!({ "deleted": id }), format!("Category {id} deleted"))?;
      }
    }
    Ok(())
  }

  async fn item(
    &self,
    cmd: ItemCommand,
    as_of: DateTime<Utc>,
    out: &mut impl Write,
  ) -> Result<()> {
    let f = self.format;
    match cmd {
      ItemCommand::List => {
        render::items(out, f, &self.items.get_all().await?, as_of)?;
      }
      ItemCommand::Get { id } => {
        render::item(out, f, &self.items.get_by_id(id).await?, as_of)?;
      }
      ItemCommand::Create { fields } => {
        let created = self
          .items
          .create(&fields.name, fields.category, fields.price, fields.date)
          .await?;
        self.confirm(out, &created, format!("Item created with ID {}", created.id))?;
      }
      ItemCommand::Update { id, fields } => {
        let updated = self
          .items
          .update(id, &fields.name, fields.category, fields.price, fields.date)
          .await?;
        self.confirm(out, &updated, format!("Item {id} updated"))?;
      }
      ItemCommand::Delete { id } => {
        self.items.delete(id).await?;
        self.confirm(out, &serde_json::json!({ "deleted": id }), format!("Item {id} deleted"))?;
      }
      ItemCommand::Search { keyword } => {
        let found = self.items.search(&keyword).await?;
        if f == Format::Table && found.is_empty() {
          writeln!(out, "No items found matching '{}'", keyword.trim())?;
        } else {
          render::items(out, f, &found, as_of)?;
        }
      }
      ItemCommand::Replacement => {
        let due = self.items.items_need_replacement(Some(as_of)).await?;
        render::replacement(out, f, &due, as_of)?;
      }
    }
    Ok(())
  }

  async fn report(
    &self,
    cmd: ReportCommand,
    as_of: DateTime<Utc>,
    out: &mut impl Write,
  ) -> Result<()> {
    let f = self.format;
    match cmd {
      ReportCommand::Total => {
        render::total(out, f, &self.items.total_investment(Some(as_of)).await?)?;
      }
      ReportCommand::Item { id } => {
        render::snapshot(out, f, &self.items.item_depreciation(id, Some(as_of)).await?)?;
      }
      ReportCommand::Items => {
        render::snapshots(out, f, &self.items.depreciation_report(Some(as_of)).await?)?;
      }
    }
    Ok(())
  }

  /// Acknowledge a write: the record as JSON, or a one-line message.
  fn confirm(
    &self,
    out: &mut impl Write,
    record: &impl serde::Serialize,
    message: String,
  ) -> Result<()> {
    match self.format {
      Format::Json => {
        serde_json::to_writer_pretty(&mut *out, record)?;
        writeln!(out)?;
      }
      Format::Table => writeln!(out, "✓ {message}")?,
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, NaiveDate, TimeZone};
  use stockroom_core::{Error, memory::MemoryStore};

  use super::*;
  use crate::cli::ItemFields;

  fn as_of() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap() }

  fn days_ago(days: i64) -> NaiveDate { as_of().date_naive() - Duration::days(days) }

  async fn run(app: &App<MemoryStore>, command: Command) -> Result<String> {
    let mut buf = Vec::new();
    app.run(command, as_of(), &mut buf).await?;
    Ok(String::from_utf8(buf)?)
  }

  fn create_category(name: &str) -> Command {
    Command::Category(CategoryCommand::Create {
      name:        name.into(),
      description: String::new(),
    })
  }

  fn create_item(name: &str, category: i64, price: f64, date: NaiveDate) -> Command {
    Command::Item(ItemCommand::Create {
      fields: ItemFields { name: name.into(), category, price, date },
    })
  }

  #[tokio::test]
  async fn create_then_list() {
    let app = App::new(Arc::new(MemoryStore::new()), Format::Table);

    let out = run(&app, create_category("Elektronik")).await.unwrap();
    assert_eq!(out, "✓ Category created with ID 1\n");

    let out = run(&app, create_item("Laptop", 1, 15_000_000.0, days_ago(120)))
      .await
      .unwrap();
    assert_eq!(out, "✓ Item created with ID 1\n");

    let out = run(&app, Command::Item(ItemCommand::List)).await.unwrap();
    assert!(out.contains("Laptop"));
    assert!(out.contains("Elektronik"));
    assert!(out.contains("Rp 15.000.000,00"));
    assert!(out.contains("120 days"));
  }

  #[tokio::test]
  async fn service_errors_surface_unchanged() {
    let app = App::new(Arc::new(MemoryStore::new()), Format::Table);

    let err = run(&app, create_item("Chair", 999, 100.0, days_ago(0)))
      .await
      .unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::CategoryNotFound(999))));

    run(&app, create_category("Elektronik")).await.unwrap();
    let err = run(&app, create_category("Elektronik")).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::DuplicateCategoryName(_))));
  }

  #[tokio::test]
  async fn replacement_report_lists_old_items() {
    let app = App::new(Arc::new(MemoryStore::new()), Format::Table);
    run(&app, create_category("Furniture")).await.unwrap();
    run(&app, create_item("Desk", 1, 2_000_000.0, days_ago(365))).await.unwrap();
    run(&app, create_item("Lamp", 1, 150_000.0, days_ago(30))).await.unwrap();

    let out = run(&app, Command::Item(ItemCommand::Replacement)).await.unwrap();
    assert!(out.contains("Desk"));
    assert!(!out.contains("Lamp"));
    assert!(out.contains("Total: 1 item(s) need replacement"));
  }

  #[tokio::test]
  async fn empty_search_result_is_a_message() {
    let app = App::new(Arc::new(MemoryStore::new()), Format::Table);
    let out = run(&app, Command::Item(ItemCommand::Search { keyword: " printer ".into() }))
      .await
      .unwrap();
    assert_eq!(out, "No items found matching 'printer'\n");
  }

  #[tokio::test]
  async fn json_depreciation_report() {
    let app = App::new(Arc::new(MemoryStore::new()), Format::Json);
    run(&app, create_category("Elektronik")).await.unwrap();
    run(&app, create_item("Laptop", 1, 10_000_000.0, days_ago(365))).await.unwrap();

    let out = run(&app, Command::Report(ReportCommand::Item { id: 1 })).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["name"], "Laptop");
    assert_eq!(value["days_used"], 365);
    let current = value["current_value"].as_f64().unwrap();
    assert!((current - 8_000_000.0).abs() < 1e-3);

    let out = run(&app, Command::Report(ReportCommand::Total)).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["item_count"], 1);
    assert_eq!(value["total_original"], 10_000_000.0);
  }

  #[tokio::test]
  async fn total_with_no_items() {
    let app = App::new(Arc::new(MemoryStore::new()), Format::Table);
    let out = run(&app, Command::Report(ReportCommand::Total)).await.unwrap();
    assert!(out.contains("Original Investment    : Rp 0,00"));
    assert!(out.contains("Depreciation           : 0.00%"));
  }
}
