use crate::constants::{MIN_LINE_STATIONS, OPENROUTESERVICE_BASE_URL, OSRM_BASE_URL};
use crate::error::{EditorError, ParseError};
use crate::models::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl TravelMode {
    pub const ALL: [Self; 3] = [Self::Driving, Self::Walking, Self::Cycling];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == value)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Driving => "En vehículo",
            Self::Walking => "A pie",
            Self::Cycling => "En bicicleta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoutingProvider {
    /// Public OSRM demo server, no key required
    #[default]
    #[serde(rename = "osrm")]
    Osrm,
    #[serde(rename = "openrouteservice")]
    OpenRouteService,
}

impl RoutingProvider {
    /// Profile token understood by the provider for a travel mode
    #[must_use]
    pub const fn profile(self, mode: TravelMode) -> &'static str {
        match (self, mode) {
            (Self::Osrm, TravelMode::Driving) => "driving",
            (Self::Osrm, TravelMode::Walking) => "walking",
            (Self::Osrm, TravelMode::Cycling) => "cycling",
            (Self::OpenRouteService, TravelMode::Driving) => "driving-car",
            (Self::OpenRouteService, TravelMode::Walking) => "foot-walking",
            (Self::OpenRouteService, TravelMode::Cycling) => "cycling-regular",
        }
    }

    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Osrm => OSRM_BASE_URL,
            Self::OpenRouteService => OPENROUTESERVICE_BASE_URL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutingConfig {
    pub provider: RoutingProvider,
    pub base_url: String,
    /// Only used by OpenRouteService
    pub api_key: String,
    /// Ask OpenRouteService to keep public transport off highways
    pub avoid_highways: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            provider: RoutingProvider::Osrm,
            base_url: OSRM_BASE_URL.to_string(),
            api_key: String::new(),
            avoid_highways: true,
        }
    }
}

impl RoutingConfig {
    fn base_url(&self) -> &str {
        let base = self.base_url.trim();
        if base.is_empty() {
            self.provider.default_base_url()
        } else {
            base.trim_end_matches('/')
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct OpenRouteServiceOptions {
    avoid_features: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
struct OpenRouteServiceBody {
    coordinates: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OpenRouteServiceOptions>,
}

/// One routing attempt: ordered waypoints and a travel mode
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingRequest {
    pub waypoints: Vec<LatLng>,
    pub mode: TravelMode,
}

impl RoutingRequest {
    /// Circular requests end back at the first waypoint
    #[must_use]
    pub fn new(mut waypoints: Vec<LatLng>, mode: TravelMode, is_circular: bool) -> Self {
        if is_circular && waypoints.len() >= MIN_LINE_STATIONS {
            if let Some(first) = waypoints.first().copied() {
                waypoints.push(first);
            }
        }
        Self { waypoints, mode }
    }

    #[must_use]
    pub fn is_routable(&self) -> bool {
        self.waypoints.len() >= MIN_LINE_STATIONS
    }

    #[must_use]
    pub fn osrm_url(&self, config: &RoutingConfig) -> String {
        let coordinates = self
            .waypoints
            .iter()
            .map(|p| format!("{},{}", p.lng, p.lat))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/route/v1/{}/{coordinates}?geometries=geojson&overview=full",
            config.base_url(),
            RoutingProvider::Osrm.profile(self.mode)
        )
    }

    #[must_use]
    pub fn openrouteservice_url(&self, config: &RoutingConfig) -> String {
        format!(
            "{}/v2/directions/{}/geojson",
            config.base_url(),
            RoutingProvider::OpenRouteService.profile(self.mode)
        )
    }

    fn openrouteservice_body(&self, config: &RoutingConfig) -> OpenRouteServiceBody {
        OpenRouteServiceBody {
            coordinates: self.waypoints.iter().map(|p| p.to_lng_lat()).collect(),
            options: config.avoid_highways.then(|| OpenRouteServiceOptions {
                avoid_features: vec!["highways"],
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LineStringGeometry {
    /// `[lng, lat]` or `[lng, lat, elevation]`
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: LineStringGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonFeature {
    geometry: LineStringGeometry,
}

#[derive(Debug, Deserialize)]
struct GeoJsonFeatureCollection {
    #[serde(default)]
    features: Vec<GeoJsonFeature>,
}

fn invalid_response(reason: impl std::fmt::Display) -> EditorError {
    EditorError::Parse(ParseError::Json(format!("respuesta de ruteo inválida: {reason}")))
}

fn geometry_to_path(geometry: LineStringGeometry) -> Result<Vec<LatLng>, EditorError> {
    let path = geometry
        .coordinates
        .into_iter()
        .map(|coordinate| match coordinate.as_slice() {
            [lng, lat, ..] => LatLng::from_lng_lat([*lng, *lat]).validated(),
            _ => Err(invalid_response("coordenada incompleta")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if path.len() < 2 {
        return Err(invalid_response("la ruta no contiene geometría"));
    }
    Ok(path)
}

/// Path from an OSRM `route` response (`routes[0].geometry.coordinates`)
///
/// # Errors
///
/// Returns a parse error for malformed bodies or responses without a route
pub fn parse_osrm_response(body: &str) -> Result<Vec<LatLng>, EditorError> {
    let response: OsrmResponse = serde_json::from_str(body).map_err(invalid_response)?;
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| invalid_response("sin rutas"))?;
    geometry_to_path(route.geometry)
}

/// Path from an OpenRouteService GeoJSON response (`features[0].geometry.coordinates`)
///
/// # Errors
///
/// Returns a parse error for malformed bodies or responses without features
pub fn parse_openrouteservice_response(body: &str) -> Result<Vec<LatLng>, EditorError> {
    let response: GeoJsonFeatureCollection = serde_json::from_str(body).map_err(invalid_response)?;
    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| invalid_response("sin features"))?;
    geometry_to_path(feature.geometry)
}

/// Ask the configured routing service for a path through the request's waypoints.
///
/// Single attempt: no retry, no caching, no timeout.
///
/// # Errors
///
/// Returns `MinimumStations` for fewer than two waypoints, `Network` for transport
/// failures or non-success statuses, and a parse error for unusable bodies
pub async fn fetch_route(config: &RoutingConfig, request: &RoutingRequest) -> Result<Vec<LatLng>, EditorError> {
    if !request.is_routable() {
        return Err(EditorError::MinimumStations { minimum: MIN_LINE_STATIONS });
    }

    let client = reqwest::Client::new();
    let response = match config.provider {
        RoutingProvider::Osrm => client.get(request.osrm_url(config)).send().await,
        RoutingProvider::OpenRouteService => {
            client
                .post(request.openrouteservice_url(config))
                .header("Authorization", config.api_key.as_str())
                .header("Accept", "application/json, application/geo+json")
                .json(&request.openrouteservice_body(config))
                .send()
                .await
        }
    }
    .map_err(|e| EditorError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(EditorError::Network(format!("HTTP {status}")));
    }

    let body = response.text().await.map_err(|e| EditorError::Network(e.to_string()))?;
    match config.provider {
        RoutingProvider::Osrm => parse_osrm_response(&body),
        RoutingProvider::OpenRouteService => parse_openrouteservice_response(&body),
    }
}
