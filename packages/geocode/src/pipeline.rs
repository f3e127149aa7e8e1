//! The per-record geocoding pipeline.
//!
//! Wires parsing, reference matching, interpolation, and the area
//! fallback into a single `BusinessRecord -> GeocodedRecord` step. This
//! is where the fallback policy lives: the interpolator itself never
//! invents a position.

use barrio_map_geo_models::{BusinessRecord, GeoPoint, GeocodedRecord, PrecisionTier};
use rand::Rng;

use crate::calibration::Calibration;
use crate::interpolate::Interpolator;

/// Method label for reference-point matches.
pub const METHOD_REFERENCE: &str = "reference_point";
/// Method label for street-axis interpolation.
pub const METHOD_INTERPOLATION: &str = "interpolacion_ejes_viales";
/// Method label for the centroid-plus-jitter fallback.
pub const METHOD_FALLBACK: &str = "fallback_centroid_jitter";

/// Alphabet for generated record ids.
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
/// Length of the random suffix on generated record ids.
const ID_SUFFIX_LEN: usize = 9;

/// Geocodes business records against one neighborhood calibration.
pub struct Geocoder {
    interpolator: Interpolator,
}

impl Geocoder {
    /// Builds a geocoder from a calibration.
    #[must_use]
    pub fn new(calibration: Calibration) -> Self {
        Self {
            interpolator: Interpolator::new(calibration),
        }
    }

    /// Geocodes a single business record.
    ///
    /// Resolution order: verified reference point, street-axis
    /// interpolation, then the centroid-plus-jitter area fallback.
    /// The jitter is drawn fresh from `rng` per record so unresolved
    /// businesses never share an exact position.
    pub fn geocode<R: Rng>(&self, record: &BusinessRecord, rng: &mut R) -> GeocodedRecord {
        let raw_address = record.address().to_string();
        let parsed = barrio_map_address::parse(&raw_address);

        let (point, tier, method) = match parsed.as_ref() {
            Some(p) => {
                if let Some(point) = self.interpolator.match_reference(p) {
                    (point, PrecisionTier::Exact, METHOD_REFERENCE)
                } else if let Some(result) = self.interpolator.interpolate(p) {
                    (result.point, result.tier, METHOD_INTERPOLATION)
                } else {
                    (
                        self.fallback_point(rng),
                        PrecisionTier::AreaFallback,
                        METHOD_FALLBACK,
                    )
                }
            }
            None => (
                self.fallback_point(rng),
                PrecisionTier::AreaFallback,
                METHOD_FALLBACK,
            ),
        };

        GeocodedRecord {
            id: record
                .id
                .clone()
                .unwrap_or_else(|| generate_record_id(rng)),
            name: record.display_name().to_string(),
            raw_address,
            parsed_address: parsed,
            point,
            precision_tier: tier,
            method: method.to_string(),
            phone: record.telefono.clone(),
            category: record.category().map(str::to_string),
        }
    }

    /// Geocodes an ordered collection of records, logging a tier
    /// breakdown at the end.
    pub fn geocode_all<R: Rng>(
        &self,
        records: &[BusinessRecord],
        rng: &mut R,
    ) -> Vec<GeocodedRecord> {
        let geocoded: Vec<GeocodedRecord> =
            records.iter().map(|r| self.geocode(r, rng)).collect();

        let mut interpolated = 0_usize;
        let mut approximate = 0_usize;
        let mut exact = 0_usize;
        let mut fallback = 0_usize;
        for record in &geocoded {
            match record.precision_tier {
                PrecisionTier::Exact => exact += 1,
                PrecisionTier::Interpolated => interpolated += 1,
                PrecisionTier::Approximate => approximate += 1,
                PrecisionTier::AreaFallback => fallback += 1,
            }
        }
        log::info!(
            "Geocoded {} records: {exact} exact, {interpolated} interpolated, \
             {approximate} approximate, {fallback} area-fallback",
            geocoded.len()
        );

        geocoded
    }

    /// The neighborhood centroid perturbed by bounded uniform jitter.
    fn fallback_point<R: Rng>(&self, rng: &mut R) -> GeoPoint {
        let cal = self.interpolator.calibration();
        GeoPoint {
            latitude: cal.centroid.latitude
                + rng.gen_range(-cal.jitter.latitude..=cal.jitter.latitude),
            longitude: cal.centroid.longitude
                + rng.gen_range(-cal.jitter.longitude..=cal.jitter.longitude),
        }
    }
}

/// Generates a record id like `neg_k4f9x02qa` for inventory rows that
/// arrive without one.
fn generate_record_id<R: Rng>(rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("neg_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn geocoder() -> Geocoder {
        Geocoder::new(Calibration::barrio_san_jose())
    }

    fn business(direccion: &str) -> BusinessRecord {
        BusinessRecord {
            id: Some("neg_test00001".to_string()),
            nombre: Some("Tienda Test".to_string()),
            direccion: Some(direccion.to_string()),
            ..BusinessRecord::default()
        }
    }

    #[test]
    fn interpolates_parseable_address() {
        let mut rng = StdRng::seed_from_u64(7);
        let record = geocoder().geocode(&business("CL 19 27-40"), &mut rng);
        assert_eq!(record.precision_tier, PrecisionTier::Interpolated);
        assert_eq!(record.method, METHOD_INTERPOLATION);
        assert!((record.point.latitude - 4.5358).abs() < 1e-9);
        assert!((record.point.longitude - (-75.6765)).abs() < 1e-9);
    }

    #[test]
    fn reference_address_resolves_exactly() {
        let mut rng = StdRng::seed_from_u64(7);
        let record = geocoder().geocode(&business("Calle 19 # 27-40"), &mut rng);
        assert_eq!(record.precision_tier, PrecisionTier::Exact);
        assert_eq!(record.method, METHOD_REFERENCE);
        assert!((record.point.latitude - 4.5358).abs() < 1e-9);
    }

    #[test]
    fn empty_address_falls_back_within_jitter_window() {
        let geocoder = geocoder();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let record = geocoder.geocode(&business(""), &mut rng);
            assert_eq!(record.precision_tier, PrecisionTier::AreaFallback);
            assert_eq!(record.method, METHOD_FALLBACK);
            assert!((record.point.latitude - 4.5360).abs() <= 0.005);
            assert!((record.point.longitude - (-75.6775)).abs() <= 0.004);
        }
    }

    #[test]
    fn fallback_points_are_not_reused() {
        let geocoder = geocoder();
        let mut rng = StdRng::seed_from_u64(42);
        let a = geocoder.geocode(&business(""), &mut rng);
        let b = geocoder.geocode(&business(""), &mut rng);
        assert_ne!(a.point, b.point);
    }

    #[test]
    fn out_of_range_address_falls_back() {
        let mut rng = StdRng::seed_from_u64(9);
        let record = geocoder().geocode(&business("CL 50 24-65"), &mut rng);
        assert_eq!(record.precision_tier, PrecisionTier::AreaFallback);
        assert!(record.parsed_address.is_some());
    }

    #[test]
    fn generates_id_when_missing() {
        let mut rng = StdRng::seed_from_u64(3);
        let record = BusinessRecord {
            nombre: Some("Sin id".to_string()),
            direccion: Some("CL 20 24-65".to_string()),
            ..BusinessRecord::default()
        };
        let geocoded = geocoder().geocode(&record, &mut rng);
        assert!(geocoded.id.starts_with("neg_"));
        assert_eq!(geocoded.id.len(), 4 + ID_SUFFIX_LEN);
    }

    #[test]
    fn passes_through_phone_and_category() {
        let mut rng = StdRng::seed_from_u64(3);
        let record = BusinessRecord {
            id: Some("neg_1".to_string()),
            nombre: Some("Panadería".to_string()),
            direccion: Some("CL 20 24-65".to_string()),
            telefono: Some("3101234567".to_string()),
            actividad_economica: Some("Panadería".to_string()),
            ..BusinessRecord::default()
        };
        let geocoded = geocoder().geocode(&record, &mut rng);
        assert_eq!(geocoded.phone.as_deref(), Some("3101234567"));
        assert_eq!(geocoded.category.as_deref(), Some("Panadería"));
    }
}
