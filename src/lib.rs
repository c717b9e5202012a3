pub mod config;
pub mod error;
pub mod fetch;
pub mod geocode;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod table;
