//! Wire shape of the "EnterSalesOrders" orchestration request.
//!
//! Every `rename` below is a fixed identifier of the remote P4210 form and has to be
//! reproduced byte for byte; serialization order follows declaration order.

use serde::{Deserialize, Serialize};

pub const FORM_TITLE: &str = "Sales Order Detail Revisions";
pub const CURRENT_APP: &str = "P4210_W4210A_DETPCA01";
pub const STACK_ID: u32 = 21;
pub const STATE_ID: u32 = 1;
pub const GRID_ID: u32 = 1;

pub const TITLE_BUSINESS_UNIT: &str = "Business Unit";
pub const TITLE_ORDER_TYPE: &str = "Order Type";
pub const TITLE_ORDER_DATE: &str = "Date - Order/Transaction";
pub const TITLE_DOCUMENT_NUMBER: &str = "Document (Order No, Invoice, etc.)";
pub const TITLE_ADDRESS_NUMBER: &str = "Long Address Number";

pub const TITLE_REQUESTED_DATE: &str = "Requested Date";
pub const TITLE_UNIT_OF_MEASURE: &str = "UoM";
pub const TITLE_QUANTITY: &str = "Quantity Ordered";
pub const TITLE_CUSTOMER_PO: &str = "Customer PO";
pub const TITLE_UNIT_COST: &str = "Purchase Order Unit Cost";
pub const TITLE_ITEM_NUMBER: &str = "Item Number";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue<T> {
    pub title: String,
    pub value: T,
}

impl<T> FieldValue<T> {
    pub fn new(title: &str, value: T) -> Self {
        Self {
            title: title.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrderDocument {
    #[serde(rename = "ServiceRequest1")]
    pub service_request: ServiceRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub forms: Vec<FormEnvelope>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormEnvelope {
    #[serde(rename = "fs_P4210_W4210A")]
    pub form: SalesOrderForm,
    #[serde(rename = "stackId")]
    pub stack_id: u32,
    #[serde(rename = "stateId")]
    pub state_id: u32,
    pub rid: String,
    #[serde(rename = "currentApp")]
    pub current_app: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(rename = "sysErrors")]
    pub sys_errors: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrderForm {
    pub title: String,
    pub data: FormData,
    pub errors: Vec<serde_json::Value>,
    pub warnings: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(rename = "z_MCU_11")]
    pub business_unit: FieldValue<String>,
    #[serde(rename = "z_DCTO_21")]
    pub order_type: FieldValue<String>,
    #[serde(rename = "z_TRDJ_748")]
    pub order_date: FieldValue<String>,
    #[serde(rename = "z_DOCO_757")]
    pub document_number: FieldValue<String>,
    #[serde(rename = "z_ALKY_800")]
    pub address_number_1: FieldValue<String>,
    #[serde(rename = "z_ALKY_802")]
    pub address_number_2: FieldValue<String>,
    #[serde(rename = "gridData")]
    pub grid_data: GridData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridData {
    pub id: u32,
    #[serde(rename = "fullGridId")]
    pub full_grid_id: String,
    pub columns: GridColumns,
    pub rowset: Vec<GridRow>,
    pub summary: GridSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridColumns {
    #[serde(rename = "z_DRQJ_165")]
    pub requested_date: String,
    #[serde(rename = "z_UOM_52")]
    pub unit_of_measure: String,
    #[serde(rename = "z_UORG_53")]
    pub quantity: String,
    #[serde(rename = "z_VR01_608")]
    pub customer_po: String,
    #[serde(rename = "z_UNCS_836")]
    pub unit_cost: String,
    #[serde(rename = "z_UITM_89")]
    pub item_number: String,
}

impl Default for GridColumns {
    fn default() -> Self {
        Self {
            requested_date: TITLE_REQUESTED_DATE.to_string(),
            unit_of_measure: TITLE_UNIT_OF_MEASURE.to_string(),
            quantity: TITLE_QUANTITY.to_string(),
            customer_po: TITLE_CUSTOMER_PO.to_string(),
            unit_cost: TITLE_UNIT_COST.to_string(),
            item_number: TITLE_ITEM_NUMBER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    #[serde(rename = "z_DRQJ_165")]
    pub requested_date: FieldValue<String>,
    #[serde(rename = "z_UOM_52")]
    pub unit_of_measure: FieldValue<String>,
    #[serde(rename = "z_UORG_53")]
    pub quantity: FieldValue<i64>,
    #[serde(rename = "z_VR01_608")]
    pub customer_po: FieldValue<String>,
    #[serde(rename = "z_UNCS_836")]
    pub unit_cost: FieldValue<serde_json::Number>,
    #[serde(rename = "z_UITM_89")]
    pub item_number: FieldValue<String>,
    #[serde(rename = "rowIndex")]
    pub row_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub records: usize,
    #[serde(rename = "moreRecords")]
    pub more_records: bool,
}

impl SalesOrderDocument {
    /// The single form envelope every rendered document carries.
    pub fn envelope(&self) -> Option<&FormEnvelope> {
        self.service_request.forms.first()
    }

    pub fn rid(&self) -> Option<&str> {
        self.envelope().map(|envelope| envelope.rid.as_str())
    }

    pub fn rows(&self) -> &[GridRow] {
        self.envelope()
            .map(|envelope| envelope.form.data.grid_data.rowset.as_slice())
            .unwrap_or(&[])
    }

    /// Copy with the request id blanked, for comparing two renders of the same order.
    pub fn without_rid(&self) -> Self {
        let mut copy = self.clone();
        for envelope in &mut copy.service_request.forms {
            envelope.rid.clear();
        }
        copy
    }
}
