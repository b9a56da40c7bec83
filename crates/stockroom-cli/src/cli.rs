//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
  name = "stockroom",
  version,
  about = "Office inventory with declining-balance depreciation reports"
)]
pub struct Cli {
  /// Path to a TOML config file (store_path, log_level).
  #[arg(short, long, value_name = "FILE", default_value = "stockroom.toml")]
  pub config: PathBuf,

  /// SQLite database file; overrides the config file and environment.
  #[arg(long, value_name = "PATH")]
  pub store: Option<PathBuf>,

  /// Print results as JSON instead of tables.
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Manage item categories.
  #[command(subcommand)]
  Category(CategoryCommand),

  /// Manage inventory items.
  #[command(subcommand)]
  Item(ItemCommand),

  /// Investment and depreciation reports.
  #[command(subcommand)]
  Report(ReportCommand),
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
  /// List all categories.
  List,
  /// Show one category.
  Get {
    #[arg(short, long, allow_hyphen_values = true)]
    id: i64,
  },
  /// Add a category.
  Create {
    #[arg(short, long)]
    name:        String,
    #[arg(short, long, default_value = "")]
    description: String,
  },
  /// Rename or re-describe a category.
  Update {
    #[arg(short, long, allow_hyphen_values = true)]
    id:          i64,
    #[arg(short, long)]
    name:        String,
    #[arg(short, long, default_value = "")]
    description: String,
  },
  /// Remove a category that no item uses.
  Delete {
    #[arg(short, long, allow_hyphen_values = true)]
    id: i64,
  },
}

/// Fields shared by `item create` and `item update`.
#[derive(clap::Args, Debug)]
pub struct ItemFields {
  #[arg(short, long)]
  pub name:     String,
  /// Category id.
  #[arg(short, long, allow_hyphen_values = true)]
  pub category: i64,
  #[arg(short, long, allow_hyphen_values = true)]
  pub price:    f64,
  /// Purchase date (YYYY-MM-DD).
  #[arg(short, long, value_name = "YYYY-MM-DD")]
  pub date:     NaiveDate,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
  /// List all items.
  List,
  /// Show one item.
  Get {
    #[arg(short, long, allow_hyphen_values = true)]
    id: i64,
  },
  /// Add an item.
  Create {
    #[command(flatten)]
    fields: ItemFields,
  },
  /// Replace an item's fields.
  Update {
    #[arg(short, long, allow_hyphen_values = true)]
    id:     i64,
    #[command(flatten)]
    fields: ItemFields,
  },
  /// Remove an item.
  Delete {
    #[arg(short, long, allow_hyphen_values = true)]
    id: i64,
  },
  /// Find items whose name contains a keyword (case-insensitive).
  Search {
    #[arg(short, long)]
    keyword: String,
  },
  /// List items older than 100 days, oldest first.
  Replacement,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
  /// Total original value, current value, and depreciation.
  Total,
  /// Depreciation detail for one item.
  Item {
    #[arg(short, long, allow_hyphen_values = true)]
    id: i64,
  },
  /// Depreciation of every item.
  Items,
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn command_definition_is_valid() { Cli::command().debug_assert(); }

  #[test]
  fn parses_item_create() {
    let cli = Cli::try_parse_from([
      "stockroom", "item", "create", "-n", "Laptop", "-c", "1", "-p", "15000000", "-d",
      "2024-01-15",
    ])
    .unwrap();

    let Command::Item(ItemCommand::Create { fields }) = cli.command else {
      panic!("expected item create");
    };
    assert_eq!(fields.name, "Laptop");
    assert_eq!(fields.category, 1);
    assert_eq!(fields.price, 15_000_000.0);
    assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
  }

  #[test]
  fn negative_values_reach_the_service() {
    let cli = Cli::try_parse_from([
      "stockroom", "item", "create", "-n", "Chair", "-c", "1", "-p", "-5", "-d", "2024-01-15",
    ])
    .unwrap();
    let Command::Item(ItemCommand::Create { fields }) = cli.command else {
      panic!("expected item create");
    };
    assert_eq!(fields.price, -5.0);
  }

  #[test]
  fn rejects_malformed_dates() {
    let result = Cli::try_parse_from([
      "stockroom", "item", "create", "-n", "Chair", "-c", "1", "-p", "5", "-d", "15/01/2024",
    ]);
    assert!(result.is_err());
  }

  #[test]
  fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["stockroom", "report", "total", "--json"]).unwrap();
    assert!(cli.json);
  }
}
