use crate::api::routing::RoutingConfig;
use crate::constants::{
    DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM, FALLBACK_MARKER_COLOR, FALLBACK_PROBLEM_ICON, MAP_REPORTS_CSV_URL,
    MAX_MAP_ZOOM, REPORTS_CSV_URL, REPORTS_PER_PAGE, REPORT_FORM_LOCATION_FIELD, REPORT_FORM_URL,
};
use crate::error::ParseError;
use crate::models::LatLng;
use crate::report_list::SortKey;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStyle {
    pub color: String,
    pub icon: String,
}

impl Default for ProblemStyle {
    fn default() -> Self {
        Self {
            color: FALLBACK_MARKER_COLOR.to_string(),
            icon: FALLBACK_PROBLEM_ICON.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusStyle {
    pub color: String,
    pub bg_color: String,
    /// Position in the workflow, 1 = first
    pub priority: u32,
}

impl Default for StatusStyle {
    fn default() -> Self {
        Self {
            color: "#6b7280".to_string(),
            bg_color: "#f3f4f6".to_string(),
            priority: u32::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapSettings {
    /// `[lat, lng]`
    pub center: [f64; 2],
    pub zoom: f64,
    pub max_zoom: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: [DEFAULT_MAP_CENTER.0, DEFAULT_MAP_CENTER.1],
            zoom: DEFAULT_MAP_ZOOM,
            max_zoom: MAX_MAP_ZOOM,
        }
    }
}

impl MapSettings {
    /// Configured centre, or the compiled default when out of range
    #[must_use]
    pub fn center(&self) -> LatLng {
        let [lat, lng] = self.center;
        LatLng { lat, lng }
            .validated()
            .unwrap_or(LatLng { lat: DEFAULT_MAP_CENTER.0, lng: DEFAULT_MAP_CENTER.1 })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListSettings {
    pub items_per_page: usize,
    pub default_sort: SortKey,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            items_per_page: REPORTS_PER_PAGE,
            default_sort: SortKey::Date,
        }
    }
}

fn problem(color: &str, icon: &str) -> ProblemStyle {
    ProblemStyle {
        color: color.to_string(),
        icon: icon.to_string(),
    }
}

fn status(color: &str, bg_color: &str, priority: u32) -> StatusStyle {
    StatusStyle {
        color: color.to_string(),
        bg_color: bg_color.to_string(),
        priority,
    }
}

fn default_problem_types() -> IndexMap<String, ProblemStyle> {
    [
        ("Bache", problem("#ef4444", "🕳️")),
        ("Fuga de agua", problem("#3b82f6", "💧")),
        ("Alumbrado público", problem("#f59e0b", "💡")),
        ("Basura", problem("#8b5cf6", "🗑️")),
        ("Alcantarilla", problem("#059669", "🚰")),
        ("Semáforo", problem("#dc2626", "🚦")),
        ("Otros", problem("#6b7280", "⚠️")),
    ]
    .into_iter()
    .map(|(name, style)| (name.to_string(), style))
    .collect()
}

fn default_status_types() -> IndexMap<String, StatusStyle> {
    [
        ("Pendiente", status("#f59e0b", "#fef3c7", 1)),
        ("Reportado", status("#3b82f6", "#dbeafe", 2)),
        ("En proceso", status("#8b5cf6", "#e9d5ff", 3)),
        ("Resuelto", status("#16a34a", "#d1fae5", 4)),
        ("Cancelado", status("#6b7280", "#f3f4f6", 5)),
    ]
    .into_iter()
    .map(|(name, style)| (name.to_string(), style))
    .collect()
}

/// Data sources and presentation settings.
///
/// Compiled defaults can be overridden field by field by a JSON document
/// served next to the app; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataConfig {
    pub reports_url: String,
    pub map_reports_url: String,
    pub form_url: String,
    /// Form field that receives the picked `lat,lng`
    pub form_location_field: String,
    pub map: MapSettings,
    /// Declaration order is the order of filter options and legend entries
    pub problem_types: IndexMap<String, ProblemStyle>,
    pub status_types: IndexMap<String, StatusStyle>,
    pub list: ListSettings,
    pub routing: RoutingConfig,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            reports_url: REPORTS_CSV_URL.to_string(),
            map_reports_url: MAP_REPORTS_CSV_URL.to_string(),
            form_url: REPORT_FORM_URL.to_string(),
            form_location_field: REPORT_FORM_LOCATION_FIELD.to_string(),
            map: MapSettings::default(),
            problem_types: default_problem_types(),
            status_types: default_status_types(),
            list: ListSettings::default(),
            routing: RoutingConfig::default(),
        }
    }
}

impl DataConfig {
    /// # Errors
    ///
    /// Returns `Json` if the document is not a valid configuration object
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let mut config: Self = serde_json::from_str(json).map_err(|e| ParseError::Json(e.to_string()))?;
        if config.list.items_per_page == 0 {
            config.list.items_per_page = REPORTS_PER_PAGE;
        }
        Ok(config)
    }

    #[must_use]
    pub fn problem_style(&self, problem_type: &str) -> ProblemStyle {
        self.problem_types.get(problem_type).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn status_style(&self, status: &str) -> StatusStyle {
        self.status_types.get(status).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routing::RoutingProvider;

    #[test]
    fn test_defaults_keep_declaration_order() {
        let config = DataConfig::default();
        let types: Vec<&str> = config.problem_types.keys().map(String::as_str).collect();
        assert_eq!(types.first(), Some(&"Bache"));
        assert_eq!(types.last(), Some(&"Otros"));
        let statuses: Vec<&str> = config.status_types.keys().map(String::as_str).collect();
        assert_eq!(statuses, vec!["Pendiente", "Reportado", "En proceso", "Resuelto", "Cancelado"]);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = DataConfig::from_json(
            r#"{"reportsUrl": "https://example.org/reports.csv", "routing": {"provider": "openrouteservice", "apiKey": "abc"}}"#,
        )
        .expect("valid config");
        assert_eq!(config.reports_url, "https://example.org/reports.csv");
        assert_eq!(config.routing.provider, RoutingProvider::OpenRouteService);
        assert_eq!(config.routing.api_key, "abc");
        assert_eq!(config.problem_types.len(), 7);
        assert_eq!(config.list.items_per_page, 10);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(matches!(DataConfig::from_json("[1, 2]"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_unknown_types_use_fallback_styles() {
        let config = DataConfig::default();
        assert_eq!(config.problem_style("Inundación").icon, "⚠️");
        assert_eq!(config.problem_style("Fuga de agua").color, "#3b82f6");
        assert_eq!(config.status_style("Archivado").bg_color, "#f3f4f6");
    }

    #[test]
    fn test_out_of_range_center_falls_back() {
        let settings = MapSettings { center: [120.0, 0.0], ..MapSettings::default() };
        assert_eq!(settings.center(), LatLng { lat: 14.6349, lng: -90.5069 });
    }
}
