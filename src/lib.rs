//! Accident Dashboard Library
//!
//! Loads a CSV export of a traffic-accident attribute table and computes the
//! descriptive aggregations behind an accident analytics dashboard:
//! - calendar derivation (year, month name, day name) from `Accident Date`
//! - year and severity filtering
//! - per-dimension frequency tables and monthly series
//! - summary metrics (accidents, casualties, vehicles, districts)
//! - CSV/JSON export and markdown console previews

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod dimension;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod reports;
pub mod session;
pub mod types;
pub mod util;

pub use config::DashboardConfig;
pub use error::{Error, Result};
pub use filter::{filter_records, FilterSelection};
pub use loader::{load_dataset, Dataset, LoadReport};
pub use reports::{build_dashboard, Dashboard};
pub use session::Session;
pub use types::{AccidentRecord, Column};
