//! Input rules shared by the services.
//!
//! Trimming is the caller's job; these only inspect what they are given.

use crate::{Error, Result};

pub fn validate_not_empty(value: &str, field_name: &str) -> Result<()> {
  if value.is_empty() {
    return Err(Error::validation(format!("{field_name} cannot be empty")));
  }
  Ok(())
}

pub fn validate_id(id: i64) -> Result<()> {
  if id <= 0 {
    return Err(Error::validation("ID must be greater than 0"));
  }
  Ok(())
}

/// Zero is invalid, as are NaN and the infinities.
pub fn validate_price(price: f64) -> Result<()> {
  if !price.is_finite() || price <= 0.0 {
    return Err(Error::validation("price must be greater than 0"));
  }
  Ok(())
}
