use crate::constants::COORDINATE_PRECISION;
use crate::error::EditorError;
use serde::{Deserialize, Serialize};

/// Rounds a coordinate component to the fixed editing precision
#[must_use]
pub fn round_coordinate(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_PRECISION);
    (value * factor).round() / factor
}

#[must_use]
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// A geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Correction points share the position shape and carry no label
pub type CorrectionPoint = LatLng;

impl LatLng {
    /// Validate user input and round it to the editing precision
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinate` if either component is out of range or not finite
    pub fn new(lat: f64, lng: f64) -> Result<Self, EditorError> {
        if !is_valid_coordinate(lat, lng) {
            return Err(EditorError::InvalidCoordinate { lat, lng });
        }
        Ok(Self {
            lat: round_coordinate(lat),
            lng: round_coordinate(lng),
        })
    }

    /// Check range without rounding; used for positions loaded from documents
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinate` if either component is out of range or not finite
    pub fn validated(self) -> Result<Self, EditorError> {
        if is_valid_coordinate(self.lat, self.lng) {
            Ok(self)
        } else {
            Err(EditorError::InvalidCoordinate { lat: self.lat, lng: self.lng })
        }
    }

    /// `[lng, lat]` order used by GeoJSON and routing services
    #[must_use]
    pub const fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    #[must_use]
    pub const fn from_lng_lat([lng, lat]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl TryFrom<(f64, f64)> for LatLng {
    type Error = EditorError;

    fn try_from((lat, lng): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lat, lng)
    }
}

/// Serialize an optional path as `[[lat, lng], ...]`
pub(crate) mod lat_lng_pairs {
    use super::LatLng;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(path: &Option<Vec<LatLng>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match path {
            Some(points) => serializer.collect_seq(points.iter().map(|p| [p.lat, p.lng])),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<LatLng>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = Option::<Vec<[f64; 2]>>::deserialize(deserializer)?;
        Ok(pairs.map(|pairs| pairs.into_iter().map(|[lat, lng]| LatLng { lat, lng }).collect()))
    }
}
