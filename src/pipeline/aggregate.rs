use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::pipeline::enrich::EnrichedRow;
use crate::table::{Record, Table};

/// Per-city summary line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTotals {
    #[serde(rename = "City_Name")]
    pub city_name: String,
    #[serde(rename = "Total_Transactions")]
    pub total_transactions: usize,
    /// Sum of the raw amounts, before rounding.
    #[serde(rename = "Total_Amount")]
    pub total_amount: Decimal,
    /// Distinct customer *names* seen in the city.
    #[serde(rename = "Unique_Customers")]
    pub unique_customers: usize,
}

impl Record for CityTotals {
    const COLUMNS: &'static [&'static str] = &[
        "City_Name",
        "Total_Transactions",
        "Total_Amount",
        "Unique_Customers",
    ];
}

#[derive(Default)]
struct CityAccumulator<'a> {
    transactions: usize,
    amount: Decimal,
    names: HashSet<&'a str>,
}

/// Groups rows by resolved city, one [`CityTotals`] per city, sorted by name.
///
/// Customers are counted by name, not id: two customers sharing a name in
/// the same city count once. Rows without a matched customer add to the
/// transaction count and amount but not to `unique_customers`.
///
/// # Errors
///
/// Returns [`PipelineError::Parse`] if a city's total exceeds the range of
/// [`Decimal`].
pub fn aggregate(enriched: &Table<EnrichedRow>) -> Result<Vec<CityTotals>> {
    let mut cities: BTreeMap<&str, CityAccumulator<'_>> = BTreeMap::new();

    for row in enriched {
        let acc = cities.entry(row.city.as_str()).or_default();
        acc.transactions += 1;
        acc.amount = acc.amount.checked_add(row.joined.amount).ok_or_else(|| {
            PipelineError::parse(
                "amount",
                format!("total for {} overflows at {}", row.city, row.joined.amount),
            )
        })?;
        if let Some(name) = row.joined.name.as_deref() {
            acc.names.insert(name);
        }
    }

    Ok(cities
        .into_iter()
        .map(|(city, acc)| CityTotals {
            city_name: city.to_string(),
            total_transactions: acc.transactions,
            total_amount: acc.amount,
            unique_customers: acc.names.len(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::join::JoinedRow;
    use crate::pipeline::enrich::normalize_amount;
    use std::str::FromStr;

    fn row(city: &str, id: i64, name: Option<&str>, amount: &str) -> EnrichedRow {
        let amount = Decimal::from_str(amount).unwrap();
        EnrichedRow {
            joined: JoinedRow {
                customer_id: id,
                timestamp: 0,
                amount,
                latitude: 0.0,
                longitude: 0.0,
                id: name.map(|_| id),
                name: name.map(str::to_string),
            },
            city: city.to_string(),
            correct_timestamp: "1970-01-01 00:00:00".into(),
            correct_amount: normalize_amount(amount),
        }
    }

    #[test]
    fn test_aggregate_single_city_totals() {
        let table = Table::from_records(vec![
            row("Kigali", 1, Some("Alice"), "100.00"),
            row("Kigali", 2, Some("Bob"), "200.00"),
        ]);

        let totals = aggregate(&table).unwrap();

        assert_eq!(
            totals,
            vec![CityTotals {
                city_name: "Kigali".into(),
                total_transactions: 2,
                total_amount: Decimal::new(300, 0),
                unique_customers: 2,
            }]
        );
    }

    #[test]
    fn test_aggregate_counts_customers_by_name() {
        let table = Table::from_records(vec![
            row("Kigali", 1, Some("Alice"), "1"),
            row("Kigali", 2, Some("Alice"), "1"),
        ]);

        let totals = aggregate(&table).unwrap();
        assert_eq!(totals[0].unique_customers, 1);
        assert_eq!(totals[0].total_transactions, 2);
    }

    #[test]
    fn test_aggregate_sums_raw_amounts() {
        let table = Table::from_records(vec![
            row("Nairobi", 1, Some("Alice"), "0.005"),
            row("Nairobi", 1, Some("Alice"), "0.005"),
        ]);

        // Rounded per row these would be 0.00 + 0.00.
        assert_eq!(aggregate(&table).unwrap()[0].total_amount, Decimal::from_str("0.010").unwrap());
    }

    #[test]
    fn test_aggregate_unmatched_name_not_counted() {
        let table = Table::from_records(vec![
            row("Johannesburg", 9, None, "5"),
            row("Johannesburg", 3, Some("Carol"), "5"),
        ]);

        let totals = aggregate(&table).unwrap();
        assert_eq!(totals[0].total_transactions, 2);
        assert_eq!(totals[0].unique_customers, 1);
    }

    #[test]
    fn test_aggregate_one_row_per_city_sorted() {
        let table = Table::from_records(vec![
            row("Nairobi", 2, Some("Bob"), "1"),
            row("Johannesburg", 3, Some("Carol"), "1"),
            row("Kigali", 1, Some("Alice"), "1"),
            row("Nairobi", 1, Some("Alice"), "1"),
        ]);

        let totals = aggregate(&table).unwrap();
        let cities: Vec<&str> = totals.iter().map(|t| t.city_name.as_str()).collect();
        assert_eq!(cities, vec!["Johannesburg", "Kigali", "Nairobi"]);
        assert_eq!(totals.iter().map(|t| t.total_transactions).sum::<usize>(), 4);
        assert_eq!(totals[2].unique_customers, 2);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&Table::from_records(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_aggregate_total_overflow_is_error() {
        let max = Decimal::MAX.to_string();
        let table = Table::from_records(vec![
            row("Kigali", 1, Some("Alice"), &max),
            row("Kigali", 1, Some("Alice"), &max),
        ]);

        let err = aggregate(&table).unwrap_err();
        assert!(matches!(err, PipelineError::Parse { what: "amount", .. }));
    }
}
