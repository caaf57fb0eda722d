//! Bookmaker metadata: stake limits and the static catalog.

pub mod catalog;
pub mod limits;

pub use catalog::{BookmakerCatalog, BookmakerProfile};
pub use limits::BookmakerLimits;
