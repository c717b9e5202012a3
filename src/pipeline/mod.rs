//! The join-and-aggregate core.
//!
//! Stages run strictly in sequence, each consuming the previous stage's
//! whole output: [`join`] → [`enrich`] → {[`project`], [`aggregate`]}.

pub mod aggregate;
pub mod enrich;
pub mod join;
pub mod report;

pub use aggregate::{CityTotals, aggregate};
pub use enrich::{EnrichedRow, enrich, normalize_amount, normalize_timestamp};
pub use join::{JoinedRow, join};
pub use report::{TransactionReportRow, project};

use tracing::{debug, info};

use crate::error::Result;
use crate::geocode::PlaceResolver;
use crate::sources::{Customer, Transaction};
use crate::table::Table;

/// Both output reports of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Reports {
    pub transactions: Vec<TransactionReportRow>,
    pub city_totals: Vec<CityTotals>,
}

/// Runs the whole core over already-fetched data, with local-time timestamps.
#[tracing::instrument(skip_all, fields(transactions = transactions.len(), customers = customers.len()))]
pub fn build_reports<R: PlaceResolver + ?Sized>(
    transactions: &Table<Transaction>,
    customers: &Table<Customer>,
    resolver: &R,
) -> Result<Reports> {
    let joined = join(transactions, customers);
    debug!(columns = ?joined.columns(), "Joined table");
    for row in joined.iter().take(5) {
        debug!(?row, "Joined row");
    }

    let enriched = enrich(joined, resolver)?;
    debug!(columns = ?enriched.columns(), "Enriched table");

    let reports = Reports {
        transactions: project(&enriched),
        city_totals: aggregate(&enriched)?,
    };
    info!(
        transaction_rows = reports.transactions.len(),
        city_rows = reports.city_totals.len(),
        "Reports built"
    );

    Ok(reports)
}
