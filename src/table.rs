//! Typed tables: one row per record, columns fixed by the record type.

use crate::sources::{Customer, Transaction};

/// A record type with a statically known column set.
pub trait Record {
    const COLUMNS: &'static [&'static str];
}

impl Record for Transaction {
    const COLUMNS: &'static [&'static str] =
        &["customerId", "timestamp", "amount", "latitude", "longitude"];
}

impl Record for Customer {
    const COLUMNS: &'static [&'static str] = &["id", "name"];
}

/// Rows of a single record type, in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn from_records(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }
}

impl<R: Record> Table<R> {
    pub fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }
}

impl<R> From<Vec<R>> for Table<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::from_records(rows)
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
