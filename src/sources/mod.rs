//! Source readers for the two upstream datasets.
//!
//! Transactions arrive as a JSON array, customers as an XML document. Both
//! are decoded into typed records; a missing or mistyped required field is a
//! [`PipelineError::Parse`](crate::error::PipelineError::Parse).

pub mod customers;
pub mod transactions;

pub use customers::{Customer, fetch_customers, parse_customers};
pub use transactions::{Transaction, fetch_transactions, parse_transactions};
