//! Services: validation, cross-entity checks, and depreciation aggregation on
//! top of the store traits.
//!
//! Each service holds its stores behind an [`std::sync::Arc`] so one backend
//! instance can serve both.

mod category;
mod item;

pub use category::CategoryService;
pub use item::ItemService;
