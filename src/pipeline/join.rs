use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::sources::{Customer, Transaction};
use crate::table::{Record, Table};

/// A transaction with the owning customer's columns attached.
///
/// `id` and `name` are `None` when no customer matched `customer_id`.
/// `name` is also `None` for a matched customer with an empty name.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub customer_id: i64,
    pub timestamp: i64,
    pub amount: Decimal,
    pub latitude: f64,
    pub longitude: f64,
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Record for JoinedRow {
    const COLUMNS: &'static [&'static str] = &[
        "customerId",
        "timestamp",
        "amount",
        "latitude",
        "longitude",
        "id",
        "name",
    ];
}

/// Left outer join of transactions to customers on `customerId == id`.
///
/// Output has exactly one row per transaction, in transaction order. When
/// several customers share an id the first one listed wins.
pub fn join(transactions: &Table<Transaction>, customers: &Table<Customer>) -> Table<JoinedRow> {
    let mut by_id: HashMap<i64, &Customer> = HashMap::with_capacity(customers.len());
    for customer in customers {
        by_id.entry(customer.id).or_insert(customer);
    }

    let rows: Vec<JoinedRow> = transactions
        .iter()
        .map(|tx| {
            let customer = by_id.get(&tx.customer_id);
            JoinedRow {
                customer_id: tx.customer_id,
                timestamp: tx.timestamp,
                amount: tx.amount,
                latitude: tx.latitude,
                longitude: tx.longitude,
                id: customer.map(|c| c.id),
                name: customer.and_then(|c| c.name.clone()),
            }
        })
        .collect();

    let unmatched = rows.iter().filter(|r| r.id.is_none()).count();
    debug!(rows = rows.len(), unmatched, "Transactions joined to customers");

    Table::from_records(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(customer_id: i64, amount: i64) -> Transaction {
        Transaction {
            customer_id,
            timestamp: 1539767520453,
            amount: Decimal::from(amount),
            latitude: -1.970579,
            longitude: 30.104429,
        }
    }

    fn customer(id: i64, name: &str) -> Customer {
        Customer {
            id,
            name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_join_preserves_cardinality_and_order() {
        let transactions = Table::from_records(vec![tx(3, 1), tx(1, 2), tx(3, 3), tx(2, 4)]);
        let customers = Table::from_records(vec![customer(1, "Alice"), customer(3, "Carol")]);

        let joined = join(&transactions, &customers);

        assert_eq!(joined.len(), transactions.len());
        let amounts: Vec<Decimal> = joined.iter().map(|r| r.amount).collect();
        assert_eq!(
            amounts,
            vec![1, 2, 3, 4].into_iter().map(Decimal::from).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_join_unmatched_customer_has_no_name() {
        let transactions = Table::from_records(vec![tx(9, 10)]);
        let customers = Table::from_records(vec![customer(1, "Alice")]);

        let joined = join(&transactions, &customers);
        let row = &joined.rows()[0];

        assert_eq!(row.customer_id, 9);
        assert_eq!(row.id, None);
        assert_eq!(row.name, None);
    }

    #[test]
    fn test_join_attaches_customer_columns() {
        let transactions = Table::from_records(vec![tx(1, 10)]);
        let customers = Table::from_records(vec![customer(1, "Alice")]);

        let row = join(&transactions, &customers).into_rows().remove(0);
        assert_eq!(row.id, Some(1));
        assert_eq!(row.name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_join_nameless_customer_keeps_id() {
        let transactions = Table::from_records(vec![tx(4, 10)]);
        let customers = Table::from_records(vec![Customer { id: 4, name: None }]);

        let row = join(&transactions, &customers).into_rows().remove(0);
        assert_eq!(row.id, Some(4));
        assert_eq!(row.name, None);
    }

    #[test]
    fn test_join_duplicate_customer_ids_do_not_multiply_rows() {
        let transactions = Table::from_records(vec![tx(1, 10), tx(1, 20)]);
        let customers = Table::from_records(vec![customer(1, "Alice"), customer(1, "Alicia")]);

        let joined = join(&transactions, &customers);
        assert_eq!(joined.len(), 2);
        assert!(joined.iter().all(|r| r.name.as_deref() == Some("Alice")));
    }

    #[test]
    fn test_join_empty_inputs() {
        let joined = join(&Table::from_records(vec![]), &Table::from_records(vec![]));
        assert!(joined.is_empty());
        assert_eq!(joined.columns().len(), 7);
    }
}
