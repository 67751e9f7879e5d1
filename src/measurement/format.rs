/// Feet in one meter.
pub const FEET_PER_METER: f64 = 3.280_84;

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1_609.344;

/// Renders a distance with metric and imperial units.
///
/// Below 1000 m: whole meters and feet. Otherwise kilometers and miles to
/// two decimals.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.0} m ({:.0} ft)", meters * FEET_PER_METER)
    } else {
        format!("{:.2} km ({:.2} mi)", meters / 1000.0, meters / METERS_PER_MILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_distances_use_meters_and_feet() {
        assert_eq!(format_distance(0.0), "0 m (0 ft)");
        assert_eq!(format_distance(100.0), "100 m (328 ft)");
        assert_eq!(format_distance(999.4), "999 m (3279 ft)");
    }

    #[test]
    fn long_distances_use_kilometers_and_miles() {
        assert_eq!(format_distance(1000.0), "1.00 km (0.62 mi)");
        assert_eq!(format_distance(1111.95), "1.11 km (0.69 mi)");
        assert_eq!(format_distance(16_093.44), "16.09 km (10.00 mi)");
    }
}
