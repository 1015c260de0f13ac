use super::LatLng;
use crate::error::EditorError;
use serde::{Deserialize, Serialize};

/// A named stop of a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(alias = "nombre")]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Station {
    /// # Errors
    ///
    /// Returns `EmptyName` if the trimmed name is empty
    pub fn new(name: &str, position: LatLng) -> Result<Self, EditorError> {
        Self::check_name(name)?;
        let name = name.trim();
        Ok(Self {
            name: name.to_string(),
            lat: position.lat,
            lng: position.lng,
        })
    }

    /// # Errors
    ///
    /// Returns `EmptyName` if the trimmed name is empty
    pub fn check_name(name: &str) -> Result<(), EditorError> {
        if name.trim().is_empty() {
            return Err(EditorError::EmptyName);
        }
        Ok(())
    }

    #[must_use]
    pub const fn position(&self) -> LatLng {
        LatLng { lat: self.lat, lng: self.lng }
    }

    pub fn set_position(&mut self, position: LatLng) {
        self.lat = position.lat;
        self.lng = position.lng;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_name() {
        let station = Station::new("  Plaza  ", LatLng { lat: 14.6, lng: -90.5 }).expect("valid station");
        assert_eq!(station.name, "Plaza");
        assert_eq!(station.position(), LatLng { lat: 14.6, lng: -90.5 });
    }

    #[test]
    fn test_new_rejects_blank_name() {
        let result = Station::new("   ", LatLng { lat: 0.0, lng: 0.0 });
        assert_eq!(result, Err(EditorError::EmptyName));
    }

    #[test]
    fn test_check_name_matches_constructor() {
        assert_eq!(Station::check_name(" \t "), Err(EditorError::EmptyName));
        assert_eq!(Station::check_name(" Parque "), Ok(()));
    }

    #[test]
    fn test_deserializes_legacy_key() {
        let station: Station = serde_json::from_str(r#"{"nombre":"Trébol","lat":14.6,"lng":-90.5}"#)
            .expect("legacy station should parse");
        assert_eq!(station.name, "Trébol");
    }
}
