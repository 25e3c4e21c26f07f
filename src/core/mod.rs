pub mod builder;
pub mod engine;
pub mod parser;

pub use crate::domain::model::{NormalizedOrder, Order};
pub use crate::domain::ports::{Clock, CredentialPrompt, OrderSubmitter, RecordSource};
pub use crate::utils::error::Result;
