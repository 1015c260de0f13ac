use super::coordinate::lat_lng_pairs;
use super::{CorrectionPoint, LatLng, Station};
use crate::constants::MIN_LINE_STATIONS;
use crate::error::EditorError;
use serde::{Deserialize, Serialize};

/// Deterministic but varied colour for the `seed`-th line
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn generate_line_color(seed: usize) -> String {
    let hue = f64::from(((seed * 137) % 360) as i32);
    let saturation = 65.0 + f64::from(((seed * 97) % 20) as i32); // 65-85%
    let lightness = 45.0 + f64::from(((seed * 53) % 15) as i32); // 45-60%

    let chroma = (1.0 - (2.0 * lightness / 100.0 - 1.0).abs()) * saturation / 100.0;
    let second_component = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let lightness_match = lightness / 100.0 - chroma / 2.0;

    let (red, green, blue) = match hue as u32 {
        0..=59 => (chroma, second_component, 0.0),
        60..=119 => (second_component, chroma, 0.0),
        120..=179 => (0.0, chroma, second_component),
        180..=239 => (0.0, second_component, chroma),
        240..=299 => (second_component, 0.0, chroma),
        _ => (chroma, 0.0, second_component),
    };

    format!("#{:02x}{:02x}{:02x}",
        ((red + lightness_match) * 255.0) as u8,
        ((green + lightness_match) * 255.0) as u8,
        ((blue + lightness_match) * 255.0) as u8
    )
}

/// A named, coloured transit line
///
/// Field order is the export order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(alias = "linea")]
    pub name: String,
    pub color: String,
    #[serde(alias = "ruta")]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub correction_points: Vec<CorrectionPoint>,
    #[serde(default)]
    pub is_circular: bool,
    /// Path returned by the routing service; authoritative for rendering while present
    #[serde(
        default,
        alias = "routedCoordinates",
        with = "lat_lng_pairs",
        skip_serializing_if = "Option::is_none"
    )]
    pub routed_geometry: Option<Vec<LatLng>>,
}

impl Line {
    /// Create an empty draft line
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` if the trimmed name is empty
    pub fn new_draft(name: &str, color: &str) -> Result<Self, EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            color: color.trim().to_string(),
            stations: Vec::new(),
            correction_points: Vec::new(),
            is_circular: false,
            routed_geometry: None,
        })
    }

    /// Append a station
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinate` for an out-of-range point or `EmptyName` for a blank name
    pub fn push_station(&mut self, name: &str, point: (f64, f64)) -> Result<(), EditorError> {
        let station = Station::new(name, LatLng::try_from(point)?)?;
        self.stations.push(station);
        self.routed_geometry = None;
        Ok(())
    }

    /// Remove a station, refusing to go below the minimum station count
    ///
    /// # Errors
    ///
    /// Returns `StationNotFound` for a bad index or `MinimumStations` if the line
    /// would be left with fewer than two stations
    pub fn remove_station(&mut self, index: usize) -> Result<Station, EditorError> {
        if index >= self.stations.len() {
            return Err(EditorError::StationNotFound(index));
        }
        if self.stations.len() <= MIN_LINE_STATIONS {
            return Err(EditorError::MinimumStations { minimum: MIN_LINE_STATIONS });
        }
        let removed = self.stations.remove(index);
        self.routed_geometry = None;
        Ok(removed)
    }

    /// Reposition a station
    ///
    /// # Errors
    ///
    /// Returns `StationNotFound` for a bad index or `InvalidCoordinate` for an out-of-range point
    pub fn move_station(&mut self, index: usize, point: (f64, f64)) -> Result<(), EditorError> {
        let position = LatLng::try_from(point)?;
        let station = self.stations.get_mut(index).ok_or(EditorError::StationNotFound(index))?;
        station.set_position(position);
        self.routed_geometry = None;
        Ok(())
    }

    /// Append a correction point. Routed geometry is kept; correction points
    /// only bias the next routing request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinate` for an out-of-range point
    pub fn push_correction_point(&mut self, point: (f64, f64)) -> Result<(), EditorError> {
        self.correction_points.push(LatLng::try_from(point)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CorrectionPointNotFound` for a bad index
    pub fn remove_correction_point(&mut self, index: usize) -> Result<CorrectionPoint, EditorError> {
        if index >= self.correction_points.len() {
            return Err(EditorError::CorrectionPointNotFound(index));
        }
        Ok(self.correction_points.remove(index))
    }

    /// Closing or opening the loop changes the routed waypoints, so cached geometry is dropped
    pub fn set_circular(&mut self, is_circular: bool) {
        if self.is_circular != is_circular {
            self.is_circular = is_circular;
            self.routed_geometry = None;
        }
    }

    pub fn set_routed_geometry(&mut self, geometry: Option<Vec<LatLng>>) {
        self.routed_geometry = geometry.filter(|points| !points.is_empty());
    }

    #[must_use]
    pub fn station_positions(&self) -> Vec<LatLng> {
        self.stations.iter().map(Station::position).collect()
    }

    /// Stations joined by straight segments, closed back to the first station when circular
    #[must_use]
    pub fn straight_path(&self) -> Vec<LatLng> {
        let mut path = self.station_positions();
        if self.is_circular && path.len() >= 2 {
            if let Some(first) = path.first().copied() {
                path.push(first);
            }
        }
        path
    }

    /// Path to render: routed geometry when present, otherwise the straight path
    #[must_use]
    pub fn display_path(&self) -> Vec<LatLng> {
        match &self.routed_geometry {
            Some(points) => points.clone(),
            None => self.straight_path(),
        }
    }

    /// Waypoints for a routing request: stations, optionally followed by correction points
    #[must_use]
    pub fn routing_waypoints(&self, include_correction_points: bool) -> Vec<LatLng> {
        let mut points = self.station_positions();
        if include_correction_points {
            points.extend(self.correction_points.iter().copied());
        }
        points
    }

    /// Range-check every stored position
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinate` for the first out-of-range position
    pub fn validate_positions(&self) -> Result<(), EditorError> {
        self.stations
            .iter()
            .map(Station::position)
            .chain(self.correction_points.iter().copied())
            .chain(self.routed_geometry.iter().flatten().copied())
            .try_for_each(|p| p.validated().map(|_| ()))
    }
}
