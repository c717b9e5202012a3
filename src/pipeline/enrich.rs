use std::fmt;

use chrono::{Local, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, trace};

use crate::error::{PipelineError, Result};
use crate::geocode::PlaceResolver;
use crate::pipeline::join::JoinedRow;
use crate::table::{Record, Table};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const AMOUNT_SCALE: u32 = 2;

/// A joined row with its derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub joined: JoinedRow,
    pub city: String,
    /// `YYYY-MM-DD HH:MM:SS` in the zone the row was enriched in.
    pub correct_timestamp: String,
    /// `amount` rounded to exactly two fractional digits.
    pub correct_amount: Decimal,
}

impl Record for EnrichedRow {
    const COLUMNS: &'static [&'static str] = &[
        "customerId",
        "timestamp",
        "amount",
        "latitude",
        "longitude",
        "id",
        "name",
        "city",
        "correct_timestamp",
        "correct_amount",
    ];
}

/// Rounds half-to-even to two decimal places and pins the scale at two, so
/// `98711` becomes `98711.00`.
pub fn normalize_amount(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(AMOUNT_SCALE);
    rounded
}

/// Renders epoch milliseconds as wall-clock time in `tz`.
pub fn format_timestamp<Tz>(millis: i64, tz: &Tz) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let datetime = tz
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| PipelineError::parse("timestamp", format!("{millis} ms is out of range")))?;
    Ok(datetime.format(TIMESTAMP_FORMAT).to_string())
}

/// Renders epoch milliseconds in the process-local time zone.
pub fn normalize_timestamp(millis: i64) -> Result<String> {
    format_timestamp(millis, &Local)
}

/// Nearest place name for a coordinate pair; no match aborts the run.
pub fn resolve_city<R: PlaceResolver + ?Sized>(
    resolver: &R,
    latitude: f64,
    longitude: f64,
) -> Result<String> {
    resolver
        .resolve(latitude, longitude)
        .map(|place| place.name)
        .ok_or(PipelineError::Resolution {
            latitude,
            longitude,
        })
}

/// Adds city, timestamp and amount columns to every row, using local time.
pub fn enrich<R: PlaceResolver + ?Sized>(
    joined: Table<JoinedRow>,
    resolver: &R,
) -> Result<Table<EnrichedRow>> {
    enrich_in(joined, resolver, &Local)
}

/// Same as [`enrich`] with timestamps rendered in `tz`.
#[tracing::instrument(skip_all, fields(rows = joined.len()))]
pub fn enrich_in<R, Tz>(joined: Table<JoinedRow>, resolver: &R, tz: &Tz) -> Result<Table<EnrichedRow>>
where
    R: PlaceResolver + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let rows = joined
        .into_rows()
        .into_iter()
        .map(|row| {
            let city = resolve_city(resolver, row.latitude, row.longitude)?;
            let correct_timestamp = format_timestamp(row.timestamp, tz)?;
            let correct_amount = normalize_amount(row.amount);
            trace!(%city, %correct_timestamp, %correct_amount, "Row enriched");

            Ok(EnrichedRow {
                joined: row,
                city,
                correct_timestamp,
                correct_amount,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(rows = rows.len(), "Rows enriched");
    Ok(Table::from_records(rows))
}
