use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::{Place, PlaceResolver};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// One line of a `lat,lon,name,admin1,admin2,cc` place list (the layout used
/// by GeoNames-derived reverse geocoding datasets).
#[derive(Debug, Deserialize)]
struct PlaceRow {
    lat: f64,
    lon: f64,
    name: String,
    #[serde(default)]
    admin1: String,
    #[serde(default)]
    admin2: String,
    #[serde(default)]
    cc: String,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Place {
            name: row.name,
            admin1: row.admin1,
            admin2: row.admin2,
            country_code: row.cc,
            latitude: row.lat,
            longitude: row.lon,
        }
    }
}

/// Nearest-place lookup over a place list loaded from CSV.
///
/// Lookup is a linear scan by great-circle distance; use [`GeoNames`] for
/// the full `cities1000` dataset.
///
/// [`GeoNames`]: super::GeoNames
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    places: Vec<Place>,
}

impl Gazetteer {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Loads a place list from a CSV file with a `lat,lon,name,...` header.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open gazetteer {}", path.display()))?;
        let gazetteer = Self::from_reader(file)
            .with_context(|| format!("failed to read gazetteer {}", path.display()))?;
        debug!(path = %path.display(), places = gazetteer.len(), "Gazetteer loaded");
        Ok(gazetteer)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut places = Vec::new();

        for result in rdr.deserialize() {
            let row: PlaceRow = result?;
            places.push(row.into());
        }

        Ok(Self { places })
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl PlaceResolver for Gazetteer {
    fn resolve(&self, latitude: f64, longitude: f64) -> Option<Place> {
        self.places
            .iter()
            .map(|p| (haversine_km(latitude, longitude, p.latitude, p.longitude), p))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, p)| p.clone())
    }
}

/// Great-circle distance in kilometres between two points given in degrees.
pub(crate) fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, latitude: f64, longitude: f64) -> Place {
        Place {
            name: name.to_string(),
            admin1: String::new(),
            admin2: String::new(),
            country_code: String::new(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_km(-1.95, 30.06, -1.95, 30.06), 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Nairobi to Mombasa is roughly 440 km as the crow flies.
        let d = haversine_km(-1.28333, 36.81667, -4.05466, 39.66359);
        assert!((430.0..450.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_resolve_picks_nearest() {
        let gazetteer = Gazetteer::new(vec![
            place("Far", 10.0, 10.0),
            place("Near", -1.9, 30.1),
        ]);
        let found = gazetteer.resolve(-1.97, 30.10).unwrap();
        assert_eq!(found.name, "Near");
    }

    #[test]
    fn test_resolve_empty_gazetteer() {
        assert!(Gazetteer::default().resolve(0.0, 0.0).is_none());
    }

    #[test]
    fn test_world_cities_resolve_sample_clusters() {
        let csv = include_str!("../../tests/fixtures/places.csv");
        let gazetteer = Gazetteer::from_reader(csv.as_bytes()).unwrap();
        assert!(!gazetteer.is_empty());

        assert_eq!(gazetteer.resolve(-1.970579, 30.104429).unwrap().name, "Kigali");
        assert_eq!(gazetteer.resolve(-1.292066, 36.821945).unwrap().name, "Nairobi");
        assert_eq!(
            gazetteer.resolve(-26.204103, 28.047304).unwrap().name,
            "Johannesburg"
        );
    }

    #[test]
    fn test_from_reader_geonames_layout() {
        let csv = "lat,lon,name,admin1,admin2,cc\n\
                   -1.94995,30.05885,Kigali,Kigali,,RW\n";
        let gazetteer = Gazetteer::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(gazetteer.len(), 1);
        let kigali = gazetteer.resolve(-1.9, 30.0).unwrap();
        assert_eq!(kigali.country_code, "RW");
        assert_eq!(kigali.admin2, "");
    }

    #[test]
    fn test_from_reader_rejects_bad_coordinates() {
        let csv = "lat,lon,name\nnorth,30.0,Nowhere\n";
        assert!(Gazetteer::from_reader(csv.as_bytes()).is_err());
    }
}
