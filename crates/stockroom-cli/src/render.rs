//! Console output: aligned tables, detail blocks, and JSON.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;
use stockroom_core::{
  category::Category,
  depreciation::{self, DepreciationSnapshot, InvestmentSummary, REPLACEMENT_THRESHOLD_DAYS},
  item::Item,
};

const DATE: &str = "%Y-%m-%d";
const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  Table,
  Json,
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// Left-aligned columns separated by three spaces.
struct Table {
  rows: Vec<Vec<String>>,
}

impl Table {
  fn new(headers: &[&str]) -> Self {
    let header = headers.iter().map(|h| h.to_string()).collect();
    let rule = headers.iter().map(|_| "---".to_string()).collect();
    Self { rows: vec![header, rule] }
  }

  fn row(&mut self, cells: Vec<String>) { self.rows.push(cells); }

  fn write(&self, out: &mut impl Write) -> io::Result<()> {
    let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
      .map(|c| {
        self
          .rows
          .iter()
          .filter_map(|r| r.get(c))
          .map(|cell| cell.chars().count())
          .max()
          .unwrap_or(0)
      })
      .collect();

    for row in &self.rows {
      let mut line = String::new();
      for (c, cell) in row.iter().enumerate() {
        if c + 1 == row.len() {
          line.push_str(cell);
        } else {
          line.push_str(&format!("{cell:<width$}   ", width = widths[c]));
        }
      }
      writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
  }
}

// ─── Money ───────────────────────────────────────────────────────────────────

/// `1234567.891` → `Rp 1.234.567,89`.
pub fn format_currency(value: f64) -> String {
  let cents = (value.abs() * 100.0).round() as u64;
  let (whole, frac) = (cents / 100, cents % 100);

  let digits = whole.to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, d) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push('.');
    }
    grouped.push(d);
  }

  let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
  format!("{sign}Rp {grouped},{frac:02}")
}

fn json(out: &mut impl Write, value: &impl Serialize) -> io::Result<()> {
  serde_json::to_writer_pretty(&mut *out, value)?;
  writeln!(out)
}

// ─── Categories ──────────────────────────────────────────────────────────────

pub fn categories(out: &mut impl Write, format: Format, list: &[Category]) -> io::Result<()> {
  if format == Format::Json {
    return json(out, &list);
  }
  if list.is_empty() {
    return writeln!(out, "No categories found.");
  }

  let mut table = Table::new(&["ID", "Name", "Description", "Created"]);
  for c in list {
    table.row(vec![
      c.id.to_string(),
      c.name.clone(),
      c.description.clone(),
      c.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ]);
  }
  table.write(out)
}

pub fn category(out: &mut impl Write, format: Format, c: &Category) -> io::Result<()> {
  if format == Format::Json {
    return json(out, c);
  }
  writeln!(out, "=== Category ===")?;
  writeln!(out, "ID          : {}", c.id)?;
  writeln!(out, "Name        : {}", c.name)?;
  writeln!(out, "Description : {}", c.description)?;
  writeln!(out, "Created     : {}", c.created_at.format(DATE_TIME))?;
  writeln!(out, "Updated     : {}", c.updated_at.format(DATE_TIME))
}

// ─── Items ───────────────────────────────────────────────────────────────────

pub fn items(
  out: &mut impl Write,
  format: Format,
  list: &[Item],
  as_of: DateTime<Utc>,
) -> io::Result<()> {
  if format == Format::Json {
    return json(out, &list);
  }
  if list.is_empty() {
    return writeln!(out, "No items found.");
  }

  let mut table = Table::new(&["ID", "Name", "Category", "Price", "Purchased", "Days Used"]);
  for i in list {
    table.row(vec![
      i.id.to_string(),
      i.name.clone(),
      i.category_name.clone(),
      format_currency(i.price),
      i.purchase_date.format(DATE).to_string(),
      format!("{} days", depreciation::days_used(i.purchase_date, as_of)),
    ]);
  }
  table.write(out)
}

pub fn item(out: &mut impl Write, format: Format, i: &Item, as_of: DateTime<Utc>) -> io::Result<()> {
  if format == Format::Json {
    return json(out, i);
  }
  writeln!(out, "=== Item ===")?;
  writeln!(out, "ID         : {}", i.id)?;
  writeln!(out, "Name       : {}", i.name)?;
  writeln!(out, "Category   : {} (ID: {})", i.category_name, i.category_id)?;
  writeln!(out, "Price      : {}", format_currency(i.price))?;
  writeln!(out, "Purchased  : {}", i.purchase_date.format(DATE))?;
  writeln!(
    out,
    "Days Used  : {} days",
    depreciation::days_used(i.purchase_date, as_of)
  )?;
  writeln!(out, "Created    : {}", i.created_at.format(DATE_TIME))?;
  writeln!(out, "Updated    : {}", i.updated_at.format(DATE_TIME))
}

pub fn replacement(
  out: &mut impl Write,
  format: Format,
  list: &[Item],
  as_of: DateTime<Utc>,
) -> io::Result<()> {
  if format == Format::Json {
    return json(out, &list);
  }
  if list.is_empty() {
    return writeln!(
      out,
      "No items need replacement (> {REPLACEMENT_THRESHOLD_DAYS} days)."
    );
  }

  writeln!(out, "=== Items Due for Replacement (> {REPLACEMENT_THRESHOLD_DAYS} days) ===")?;
  writeln!(out)?;
  items(out, format, list, as_of)?;
  writeln!(out)?;
  writeln!(out, "Total: {} item(s) need replacement", list.len())
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TotalView<'a> {
  #[serde(flatten)]
  summary:                 &'a InvestmentSummary,
  total_depreciation:      f64,
  depreciation_percentage: f64,
}

pub fn total(out: &mut impl Write, format: Format, summary: &InvestmentSummary) -> io::Result<()> {
  if format == Format::Json {
    return json(out, &TotalView {
      summary,
      total_depreciation: summary.total_depreciation(),
      depreciation_percentage: summary.depreciation_percentage(),
    });
  }
  writeln!(out, "=== Total Investment ===")?;
  writeln!(out, "Items                  : {}", summary.item_count)?;
  writeln!(out, "Original Investment    : {}", format_currency(summary.total_original))?;
  writeln!(out, "Current Value          : {}", format_currency(summary.total_current))?;
  writeln!(out, "Total Depreciation     : {}", format_currency(summary.total_depreciation()))?;
  writeln!(out, "Depreciation           : {:.2}%", summary.depreciation_percentage())?;
  writeln!(out)?;
  writeln!(
    out,
    "Method: declining balance, {:.0}% per year",
    depreciation::DEPRECIATION_RATE * 100.0
  )
}

pub fn snapshot(out: &mut impl Write, format: Format, s: &DepreciationSnapshot) -> io::Result<()> {
  if format == Format::Json {
    return json(out, s);
  }
  writeln!(out, "=== Item Depreciation ===")?;
  writeln!(out, "ID                : {}", s.item.id)?;
  writeln!(out, "Name              : {}", s.item.name)?;
  writeln!(out, "Category          : {}", s.item.category_name)?;
  writeln!(out, "Original Price    : {}", format_currency(s.item.price))?;
  writeln!(out, "Purchased         : {}", s.item.purchase_date.format(DATE))?;
  writeln!(out, "Days Used         : {} days ({:.2} years)", s.days_used, s.years_used())?;
  writeln!(out, "Rate              : {:.0}% per year", s.depreciation_rate * 100.0)?;
  writeln!(out, "Current Value     : {}", format_currency(s.current_value))?;
  writeln!(out, "Depreciation      : {}", format_currency(s.depreciation_value))?;
  writeln!(out, "Depreciation %    : {:.2}%", s.depreciation_percentage())?;
  writeln!(out)?;
  writeln!(out, "Formula: current value = price × (1 - rate)^years")
}

pub fn snapshots(
  out: &mut impl Write,
  format: Format,
  list: &[DepreciationSnapshot],
) -> io::Result<()> {
  if format == Format::Json {
    return json(out, &list);
  }
  if list.is_empty() {
    return writeln!(out, "No items found.");
  }

  let mut table = Table::new(&[
    "ID", "Name", "Original Price", "Current Value", "Depreciation", "Days Used",
  ]);
  for s in list {
    table.row(vec![
      s.item.id.to_string(),
      s.item.name.clone(),
      format_currency(s.item.price),
      format_currency(s.current_value),
      format_currency(s.depreciation_value),
      format!("{} days", s.days_used),
    ]);
  }
  table.write(out)
}
