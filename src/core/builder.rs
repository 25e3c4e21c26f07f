use crate::domain::document::*;
use crate::domain::model::{
    DropReason, DroppedItem, NormalizedOrder, Order, OrderDefaults, OrderLine,
};
use crate::domain::ports::Clock;
use crate::utils::error::{OrderEntryError, Result};
use chrono::{DateTime, Utc};

/// Dates shared by the header and every row of one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStamp {
    /// `YYYYMMDD`
    pub current_date: String,
    /// `YYYY-MM-DD:HH:MM:SS`, whole seconds.
    pub timestamp: String,
}

impl RenderStamp {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            current_date: now.format("%Y%m%d").to_string(),
            timestamp: now.format("%Y-%m-%d:%H:%M:%S").to_string(),
        }
    }
}

/// Apply header defaults and keep only items with an item number and a positive
/// quantity. The caller's order is left untouched.
pub fn normalize(order: &Order) -> NormalizedOrder {
    let mut lines = Vec::with_capacity(order.items.len());
    let mut dropped = Vec::new();

    for (position, item) in order.items.iter().enumerate() {
        let item_number = item.item_number.as_deref().unwrap_or("").trim();
        let quantity = item.quantity.unwrap_or(0);

        let reason = if item_number.is_empty() {
            Some(DropReason::MissingItemNumber)
        } else if quantity <= 0 {
            Some(DropReason::NonPositiveQuantity)
        } else {
            None
        };

        match reason {
            Some(reason) => dropped.push(DroppedItem {
                position,
                item: item.clone(),
                reason,
            }),
            None => lines.push(OrderLine {
                item_number: item_number.to_string(),
                quantity,
                po_number: item.po_number.as_deref().unwrap_or("").trim().to_string(),
            }),
        }
    }

    NormalizedOrder {
        bol_number: order.header.bol_number.clone().unwrap_or_default(),
        trailer_number: order.header.trailer_number.clone().unwrap_or_default(),
        declared_line_count: order.header.declared_line_count.unwrap_or(0),
        lines,
        dropped,
    }
}

/// True when the label declared a line count that the surviving items don't match.
/// A missing or unparseable count (0) never mismatches.
pub fn declared_count_mismatch(order: &NormalizedOrder) -> bool {
    order.declared_line_count > 0 && order.declared_line_count != order.lines.len() as i64
}

/// Random 16 character lowercase hex token. The remote side only uses it for tracing.
pub fn generate_rid() -> String {
    format!("{:016x}", rand::random::<u64>())
}

fn render_row(
    line: &OrderLine,
    row_index: usize,
    defaults: &OrderDefaults,
    stamp: &RenderStamp,
) -> GridRow {
    GridRow {
        requested_date: FieldValue::new(TITLE_REQUESTED_DATE, stamp.current_date.clone()),
        unit_of_measure: FieldValue::new(TITLE_UNIT_OF_MEASURE, defaults.unit_of_measure.clone()),
        quantity: FieldValue::new(TITLE_QUANTITY, line.quantity),
        customer_po: FieldValue::new(TITLE_CUSTOMER_PO, line.po_number.clone()),
        unit_cost: FieldValue::new(TITLE_UNIT_COST, defaults.unit_cost.clone()),
        item_number: FieldValue::new(TITLE_ITEM_NUMBER, line.item_number.clone()),
        row_index,
    }
}

/// Render an already normalized order. Deterministic for a given `stamp` and `rid`.
pub fn render(
    order: &NormalizedOrder,
    defaults: &OrderDefaults,
    stamp: &RenderStamp,
    rid: String,
) -> SalesOrderDocument {
    let rowset: Vec<GridRow> = order
        .lines
        .iter()
        .enumerate()
        .map(|(index, line)| render_row(line, index, defaults, stamp))
        .collect();
    let records = rowset.len();

    let data = FormData {
        business_unit: FieldValue::new(TITLE_BUSINESS_UNIT, defaults.business_unit.clone()),
        order_type: FieldValue::new(TITLE_ORDER_TYPE, defaults.order_type.clone()),
        order_date: FieldValue::new(TITLE_ORDER_DATE, stamp.current_date.clone()),
        document_number: FieldValue::new(TITLE_DOCUMENT_NUMBER, order.bol_number.clone()),
        address_number_1: FieldValue::new(TITLE_ADDRESS_NUMBER, defaults.address_number_1.clone()),
        address_number_2: FieldValue::new(TITLE_ADDRESS_NUMBER, defaults.address_number_2.clone()),
        grid_data: GridData {
            id: GRID_ID,
            full_grid_id: GRID_ID.to_string(),
            columns: GridColumns::default(),
            rowset,
            summary: GridSummary {
                records,
                more_records: false,
            },
        },
    };

    SalesOrderDocument {
        service_request: ServiceRequest {
            forms: vec![FormEnvelope {
                form: SalesOrderForm {
                    title: FORM_TITLE.to_string(),
                    data,
                    errors: Vec::new(),
                    warnings: Vec::new(),
                },
                stack_id: STACK_ID,
                state_id: STATE_ID,
                rid,
                current_app: CURRENT_APP.to_string(),
                time_stamp: stamp.timestamp.clone(),
                sys_errors: Vec::new(),
            }],
        },
    }
}

/// Normalize, validate and render `order`. Fails when no item survives normalization.
pub fn build(
    order: &Order,
    defaults: &OrderDefaults,
    clock: &dyn Clock,
) -> Result<SalesOrderDocument> {
    let normalized = normalize(order);

    for dropped in &normalized.dropped {
        tracing::warn!(
            "⚠️ Dropping item at position {} ({:?}): {:?}",
            dropped.position,
            dropped.reason,
            dropped.item
        );
    }

    if normalized.lines.is_empty() {
        return Err(OrderEntryError::ValidationError {
            message: format!(
                "no valid line items ({} dropped)",
                normalized.dropped.len()
            ),
        });
    }

    if declared_count_mismatch(&normalized) {
        tracing::warn!(
            "⚠️ Label declares {} line(s) but {} item(s) will be submitted",
            normalized.declared_line_count,
            normalized.lines.len()
        );
    }

    let stamp = RenderStamp::at(clock.now());
    let document = render(&normalized, defaults, &stamp, generate_rid());
    tracing::debug!(
        "Rendered order document with {} row(s) at {}",
        normalized.lines.len(),
        stamp.timestamp
    );

    Ok(document)
}
