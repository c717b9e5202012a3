use reverse_geocoder::ReverseGeocoder;
use tracing::debug;

use super::{Place, PlaceResolver};

/// Resolver over the GeoNames `cities1000` dataset bundled with the
/// `reverse_geocoder` crate, searched through a k-d tree.
pub struct GeoNames {
    geocoder: ReverseGeocoder,
}

impl GeoNames {
    /// Builds the k-d tree over the bundled dataset.
    pub fn new() -> Self {
        let geocoder = ReverseGeocoder::new();
        debug!("GeoNames index built");
        Self { geocoder }
    }
}

impl Default for GeoNames {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceResolver for GeoNames {
    fn resolve(&self, latitude: f64, longitude: f64) -> Option<Place> {
        let found = self.geocoder.search((latitude, longitude));
        let record = found.record;

        Some(Place {
            name: record.name.clone(),
            admin1: record.admin1.clone(),
            admin2: record.admin2.clone(),
            country_code: record.cc.clone(),
            latitude: record.lat,
            longitude: record.lon,
        })
    }
}
