//! Reverse geocoding: coordinates to the nearest known place.
//!
//! [`PlaceResolver`] is the seam the enricher depends on. [`GeoNames`] is
//! the default, backed by the GeoNames `cities1000` dataset. [`Gazetteer`]
//! resolves against a GeoNames-style CSV supplied at start-up.

mod gazetteer;
mod geonames;

pub use gazetteer::Gazetteer;
pub use geonames::GeoNames;

/// A named place with its reference coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub admin1: String,
    pub admin2: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolves a coordinate pair to the single nearest place, if any.
pub trait PlaceResolver {
    fn resolve(&self, latitude: f64, longitude: f64) -> Option<Place>;
}
