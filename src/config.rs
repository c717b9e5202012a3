//! Fixed endpoints and output locations. The CLI flags default to these.

pub const TRANSACTIONS_URL: &str = "https://df-alpha.bk.rw/interview01/transactions";
pub const CUSTOMERS_URL: &str = "https://df-alpha.bk.rw/interview01/customers";

pub const TRANSACTIONS_REPORT: &str = "transactions.csv";
pub const CITY_TOTALS_REPORT: &str = "city_totals.csv";

pub const DEFAULT_LOG_FILE: &str = "logs/city_ledger.log";
