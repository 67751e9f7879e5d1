use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::geometry::{Drawing, DrawingId, DrawingKind, MeasurementUnit, Position};

/// A drawing as exchanged with the store.
///
/// `coordinates` is itself a JSON document: one `[lng, lat]` pair for a
/// waypoint, an array of pairs otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DrawingId>,
    #[serde(rename = "type")]
    pub kind: DrawingKind,
    pub name: String,
    pub coordinates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_unit: Option<MeasurementUnit>,
}

impl DrawingRecord {
    /// Encodes a drawing.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::InvalidCoordinates`] if a waypoint does
    /// not have exactly one point.
    pub fn from_drawing(drawing: &Drawing) -> Result<Self, PersistenceError> {
        let coordinates = encode_coordinates(drawing.kind, &drawing.points)?;
        Ok(Self {
            id: drawing.id.clone(),
            kind: drawing.kind,
            name: drawing.name.clone(),
            coordinates,
            measurement_value: drawing.measurement_value.map(|v| v.to_string()),
            measurement_unit: drawing.measurement_unit,
        })
    }

    /// Decodes the record back into a drawing.
    ///
    /// # Errors
    ///
    /// Returns an error if `coordinates` is not valid JSON of the expected
    /// shape, holds out-of-range or too few points, or if
    /// `measurementValue` is not a number.
    pub fn to_drawing(&self) -> Result<Drawing, PersistenceError> {
        let points = decode_coordinates(self.kind, &self.coordinates)?;
        let measurement_value = self
            .measurement_value
            .as_deref()
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .map_err(|_| PersistenceError::InvalidMeasurement(v.to_owned()))
            })
            .transpose()?;
        Ok(Drawing {
            id: self.id.clone(),
            kind: self.kind,
            points,
            name: self.name.clone(),
            measurement_value,
            measurement_unit: self.measurement_unit,
        })
    }
}

fn encode_coordinates(kind: DrawingKind, points: &[Position]) -> Result<String, PersistenceError> {
    let pairs: Vec<[f64; 2]> = points.iter().map(Position::lng_lat).collect();
    let json = match (kind, pairs.as_slice()) {
        (DrawingKind::Waypoint, [pair]) => serde_json::to_string(pair)?,
        (DrawingKind::Waypoint, _) => {
            return Err(PersistenceError::InvalidCoordinates(format!(
                "waypoint has {} points",
                pairs.len()
            )))
        }
        _ => serde_json::to_string(&pairs)?,
    };
    Ok(json)
}

fn decode_coordinates(kind: DrawingKind, json: &str) -> Result<Vec<Position>, PersistenceError> {
    let pairs: Vec<[f64; 2]> = if kind == DrawingKind::Waypoint {
        vec![serde_json::from_str(json)?]
    } else {
        serde_json::from_str(json)?
    };
    if pairs.len() < kind.min_points() {
        return Err(PersistenceError::InvalidCoordinates(format!(
            "{kind:?} needs {} points, has {}",
            kind.min_points(),
            pairs.len()
        )));
    }
    pairs.into_iter().map(checked_position).collect()
}

/// Converts a `[lng, lat]` pair, rejecting values off the globe.
pub(super) fn checked_position([longitude, latitude]: [f64; 2]) -> Result<Position, PersistenceError> {
    if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
        return Err(PersistenceError::InvalidCoordinates(format!(
            "[{longitude}, {latitude}] is off the globe"
        )));
    }
    Ok(Position::new(longitude, latitude))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn waypoint_encodes_single_pair() {
        let d = Drawing::new(DrawingKind::Waypoint, vec![Position::new(-110.76, 43.48)]);
        let r = DrawingRecord::from_drawing(&d).unwrap();
        assert_eq!(r.coordinates, "[-110.76,43.48]");
        assert!(r.measurement_value.is_none());

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["type"], "waypoint");
        assert!(json.get("id").is_none());
        assert_eq!(r.to_drawing().unwrap(), d);
    }

    #[test]
    fn line_carries_measurement_as_string() {
        let d = Drawing::new(
            DrawingKind::Line,
            vec![Position::new(0.0, 0.0), Position::new(0.0, 0.01)],
        );
        let r = DrawingRecord::from_drawing(&d).unwrap();
        assert_eq!(r.coordinates, "[[0.0,0.0],[0.0,0.01]]");
        assert_eq!(r.measurement_value.as_deref(), Some("1.11"));

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["measurementUnit"], "kilometers");
        assert_eq!(json["measurementValue"], "1.11");
    }

    #[test]
    fn decodes_store_payload() {
        let json = r#"{
            "id": "d-17",
            "type": "polygon",
            "name": "Meadow",
            "coordinates": "[[0,0],[0.01,0],[0.01,0.01]]",
            "measurementValue": " 61.96 ",
            "measurementUnit": "hectares"
        }"#;
        let r: DrawingRecord = serde_json::from_str(json).unwrap();
        let d = r.to_drawing().unwrap();
        assert_eq!(d.id, Some(DrawingId("d-17".into())));
        assert_eq!(d.points.len(), 3);
        assert_eq!(d.measurement_value, Some(61.96));
        assert_eq!(d.measurement_unit, Some(MeasurementUnit::Hectares));
    }

    #[test]
    fn rejects_bad_payloads() {
        let mut r = DrawingRecord {
            id: None,
            kind: DrawingKind::Line,
            name: "x".into(),
            coordinates: "[[0,0]]".into(),
            measurement_value: None,
            measurement_unit: None,
        };
        assert!(matches!(r.to_drawing(), Err(PersistenceError::InvalidCoordinates(_))));

        r.coordinates = "[[0,0],[200,0]]".into();
        assert!(matches!(r.to_drawing(), Err(PersistenceError::InvalidCoordinates(_))));

        r.coordinates = "not json".into();
        assert!(matches!(r.to_drawing(), Err(PersistenceError::Json(_))));

        r.coordinates = "[[0,0],[1,0]]".into();
        r.measurement_value = Some("far".into());
        assert!(matches!(r.to_drawing(), Err(PersistenceError::InvalidMeasurement(_))));
    }
}
