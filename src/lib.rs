pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::{ConnectivityStatus, JdeClient};
pub use config::OrderEntryConfig;
pub use core::engine::{OrderEntryEngine, PreparedOrder};
pub use core::parser::parse;
pub use domain::document::SalesOrderDocument;
pub use utils::error::{OrderEntryError, Result};
