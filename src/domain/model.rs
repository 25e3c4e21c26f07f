use serde::{Deserialize, Serialize};

use crate::domain::manual_entry::ManualEntryForm;

/// Header fields read from `B`, `T` and `L` segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub bol_number: Option<String>,
    pub trailer_number: Option<String>,
    /// Informational only; never used to size the order.
    pub declared_line_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_number: Option<String>,
    pub quantity: Option<i64>,
    pub po_number: Option<String>,
}

impl LineItem {
    pub fn with_item_number(item_number: impl Into<String>) -> Self {
        Self {
            item_number: Some(item_number.into()),
            ..Self::default()
        }
    }

    pub fn has_any_field(&self) -> bool {
        self.item_number.is_some() || self.quantity.is_some() || self.po_number.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub header: OrderHeader,
    pub items: Vec<LineItem>,
}

/// An item that survived normalization: trimmed, non-empty item number, positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub item_number: String,
    pub quantity: i64,
    pub po_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    MissingItemNumber,
    NonPositiveQuantity,
}

/// An item removed during normalization, with its position in the caller's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedItem {
    pub position: usize,
    pub item: LineItem,
    pub reason: DropReason,
}

/// Derived copy of an [`Order`] with header defaults applied and invalid items removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedOrder {
    pub bol_number: String,
    pub trailer_number: String,
    pub declared_line_count: i64,
    pub lines: Vec<OrderLine>,
    pub dropped: Vec<DroppedItem>,
}

/// What the record source hands to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturedRecord {
    Scan(String),
    Manual(ManualEntryForm),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Fixed values stamped on every order, taken from the `[defaults]` config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderDefaults {
    /// Sent verbatim; the remote business unit field is space padded.
    pub business_unit: String,
    pub order_type: String,
    pub unit_of_measure: String,
    pub unit_cost: serde_json::Number,
    pub address_number_1: String,
    pub address_number_2: String,
}

/// Parsed body of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResponse {
    pub http_status: u16,
    pub orchestrator_status: String,
    pub body: serde_json::Value,
}
