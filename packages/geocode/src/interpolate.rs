//! Street-axis coordinate interpolation.
//!
//! Maps a parsed address to coordinates along the calibrated calle and
//! carrera axes. Pure: same parsed address plus same calibration always
//! yields the same point. The area fallback for unresolvable records is
//! deliberately *not* here; it lives in the record pipeline, so this
//! component never invents a position.

use barrio_map_geo_models::{GeoPoint, ParsedAddress, PrecisionTier, WayType};

use crate::calibration::Calibration;

/// An interpolation result with its precision tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolated {
    /// The interpolated coordinates.
    pub point: GeoPoint,
    /// [`PrecisionTier::Interpolated`] when the cross-way number was
    /// used, [`PrecisionTier::Approximate`] when only the primary
    /// number was.
    pub tier: PrecisionTier,
}

/// The coordinate interpolator for one neighborhood calibration.
pub struct Interpolator {
    calibration: Calibration,
    /// Normalized reference addresses paired with their coordinates.
    reference_index: Vec<(String, GeoPoint)>,
}

impl Interpolator {
    /// Builds an interpolator, indexing reference points that carry a
    /// known address.
    #[must_use]
    pub fn new(calibration: Calibration) -> Self {
        let reference_index = calibration
            .reference_points
            .iter()
            .filter_map(|r| {
                r.address.as_deref().map(|addr| {
                    (
                        addr.trim().to_uppercase(),
                        GeoPoint {
                            latitude: r.latitude,
                            longitude: r.longitude,
                        },
                    )
                })
            })
            .collect();

        Self {
            calibration,
            reference_index,
        }
    }

    /// The calibration this interpolator was built from.
    #[must_use]
    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Looks up a verified reference point whose address normalizes to
    /// the same string as the parsed address.
    #[must_use]
    pub fn match_reference(&self, parsed: &ParsedAddress) -> Option<GeoPoint> {
        self.reference_index
            .iter()
            .find(|(addr, _)| *addr == parsed.raw)
            .map(|&(_, point)| point)
    }

    /// Interpolates coordinates for a parsed address.
    ///
    /// Returns `None` when the primary number falls outside the
    /// neighborhood's numbered-way interval; out-of-range addresses
    /// are rejected rather than extrapolated, so businesses clearly
    /// outside the neighborhood are not geocoded as if inside it.
    /// Within the interval, numbers beyond the calibrated block range
    /// clamp to the nearest axis endpoint.
    #[must_use]
    pub fn interpolate(&self, parsed: &ParsedAddress) -> Option<Interpolated> {
        let cal = &self.calibration;
        let n = parsed.primary_number;

        if n < cal.primary_low || n > cal.primary_high {
            return None;
        }

        let (primary_axis, cross_axis) = match parsed.primary_way {
            WayType::Calle => (&cal.calle, &cal.carrera),
            WayType::Carrera => (&cal.carrera, &cal.calle),
        };

        let primary_coord = primary_axis.position(n);

        // The cross coordinate only counts as "interpolated" when the
        // cross number is actually usable (present and on-axis).
        let (cross_coord, used_cross) = match parsed.secondary_number {
            Some(s) if cross_axis.in_range(s) => (cross_axis.position(s), true),
            _ => (primary_axis.default_cross_coord, false),
        };

        let point = match parsed.primary_way {
            WayType::Calle => GeoPoint {
                latitude: primary_coord,
                longitude: cross_coord,
            },
            WayType::Carrera => GeoPoint {
                latitude: cross_coord,
                longitude: primary_coord,
            },
        };

        Some(Interpolated {
            point,
            tier: if used_cross {
                PrecisionTier::Interpolated
            } else {
                PrecisionTier::Approximate
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpolator() -> Interpolator {
        Interpolator::new(Calibration::barrio_san_jose())
    }

    fn parsed(way: WayType, primary: u32, secondary: Option<u32>) -> ParsedAddress {
        ParsedAddress {
            primary_way: way,
            primary_number: primary,
            secondary_way: None,
            secondary_number: secondary,
            plate_number: None,
            raw: String::new(),
        }
    }

    #[test]
    fn rejects_number_above_neighborhood_range() {
        let result = interpolator().interpolate(&parsed(WayType::Calle, 50, Some(20)));
        assert_eq!(result, None);
    }

    #[test]
    fn rejects_number_below_neighborhood_range() {
        let result = interpolator().interpolate(&parsed(WayType::Carrera, 14, None));
        assert_eq!(result, None);
    }

    #[test]
    fn clamps_below_block_range_to_low_endpoint() {
        // Calle 16 is inside the neighborhood interval but below the
        // calibrated block range [19, 30], so it must land on the low
        // endpoint's latitude, not an extrapolated one.
        let interp = interpolator();
        let result = interp
            .interpolate(&parsed(WayType::Calle, 16, None))
            .expect("in range");
        assert!((result.point.latitude - interp.calibration().calle.coord_at_low).abs() < 1e-12);
    }

    #[test]
    fn clamps_above_block_range_to_high_endpoint() {
        let interp = interpolator();
        let result = interp
            .interpolate(&parsed(WayType::Calle, 33, None))
            .expect("in range");
        assert!((result.point.latitude - interp.calibration().calle.coord_at_high).abs() < 1e-12);
    }

    #[test]
    fn tags_interpolated_when_cross_number_used() {
        let result = interpolator()
            .interpolate(&parsed(WayType::Calle, 20, Some(23)))
            .expect("in range");
        assert_eq!(result.tier, PrecisionTier::Interpolated);
    }

    #[test]
    fn tags_approximate_without_cross_number() {
        let result = interpolator()
            .interpolate(&parsed(WayType::Calle, 20, None))
            .expect("in range");
        assert_eq!(result.tier, PrecisionTier::Approximate);
    }

    #[test]
    fn off_axis_cross_number_falls_back_to_default() {
        // Carrera 40 is off the carrera block range; the longitude must
        // come from the calle axis default and the tier must degrade.
        let interp = interpolator();
        let result = interp
            .interpolate(&parsed(WayType::Calle, 20, Some(40)))
            .expect("in range");
        assert_eq!(result.tier, PrecisionTier::Approximate);
        assert!(
            (result.point.longitude - interp.calibration().calle.default_cross_coord).abs()
                < 1e-12
        );
    }

    #[test]
    fn carrera_addresses_interpolate_longitude() {
        let interp = interpolator();
        let result = interp
            .interpolate(&parsed(WayType::Carrera, 23, Some(20)))
            .expect("in range");
        assert_eq!(result.tier, PrecisionTier::Interpolated);
        let cal = interp.calibration();
        // Carrera 23 is halfway along [19, 27].
        let expected_lon = f64::midpoint(cal.carrera.coord_at_low, cal.carrera.coord_at_high);
        assert!((result.point.longitude - expected_lon).abs() < 1e-9);
    }

    #[test]
    fn block_19_27_lands_on_verified_location() {
        // "CL 19 27-40" is the verified Fundanza block: calle 19 at the
        // low latitude endpoint, carrera 27 at the west longitude
        // endpoint.
        let parsed = barrio_map_address::parse("CL 19 27-40").expect("parses");
        let result = interpolator().interpolate(&parsed).expect("in range");
        assert_eq!(result.tier, PrecisionTier::Interpolated);
        assert!((result.point.latitude - 4.5358).abs() < 1e-9);
        assert!((result.point.longitude - (-75.6765)).abs() < 1e-9);
    }

    #[test]
    fn matches_reference_by_normalized_address() {
        let interp = interpolator();
        let parsed = barrio_map_address::parse("calle 19 # 27-40").expect("parses");
        let point = interp.match_reference(&parsed).expect("reference match");
        assert!((point.latitude - 4.5358).abs() < 1e-9);
        assert!((point.longitude - (-75.6765)).abs() < 1e-9);
    }

    #[test]
    fn no_reference_match_for_other_addresses() {
        let interp = interpolator();
        let parsed = barrio_map_address::parse("CL 20 24-65").expect("parses");
        assert_eq!(interp.match_reference(&parsed), None);
    }
}
