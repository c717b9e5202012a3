use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::fetch::{HttpClient, fetch_bytes};

/// A raw transaction as published by the transactions endpoint, e.g.
/// `{"customerId": 3, "timestamp": 1539767520453, "amount": 5612.32,
///   "latitude": -1.970579, "longitude": 30.104429}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub customer_id: i64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Decoded from the literal JSON number, never through `f64`.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub latitude: f64,
    pub longitude: f64,
}

/// Decodes a JSON array of transactions.
pub fn parse_transactions(bytes: &[u8]) -> Result<Vec<Transaction>> {
    serde_json::from_slice(bytes).map_err(|e| PipelineError::parse("transactions", e))
}

#[tracing::instrument(skip(client))]
pub async fn fetch_transactions<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Vec<Transaction>> {
    let bytes = fetch_bytes(client, url).await?;
    let transactions = parse_transactions(&bytes)?;
    info!(count = transactions.len(), "Transactions fetched");
    Ok(transactions)
}
