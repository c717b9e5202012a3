use rust_decimal::Decimal;
use serde::Serialize;

use crate::pipeline::enrich::EnrichedRow;
use crate::table::{Record, Table};

/// One line of the transactions detail report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionReportRow {
    #[serde(rename = "DateTime")]
    pub date_time: String,
    #[serde(rename = "Customer_Id")]
    pub customer_id: i64,
    #[serde(rename = "Customer_Name")]
    pub customer_name: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
    #[serde(rename = "City_Name")]
    pub city_name: String,
}

impl Record for TransactionReportRow {
    const COLUMNS: &'static [&'static str] =
        &["DateTime", "Customer_Id", "Customer_Name", "Amount", "City_Name"];
}

impl From<&EnrichedRow> for TransactionReportRow {
    fn from(row: &EnrichedRow) -> Self {
        TransactionReportRow {
            date_time: row.correct_timestamp.clone(),
            customer_id: row.joined.customer_id,
            customer_name: row.joined.name.clone(),
            amount: row.correct_amount,
            city_name: row.city.clone(),
        }
    }
}

/// Selects and renames the report columns, one output row per input row.
pub fn project(enriched: &Table<EnrichedRow>) -> Vec<TransactionReportRow> {
    enriched.iter().map(TransactionReportRow::from).collect()
}
