/// Decimal digits kept for every coordinate entered or edited by the user
pub const COORDINATE_PRECISION: i32 = 7;

/// Stations a finalized line must keep when deleting
pub const MIN_LINE_STATIONS: usize = 2;

/// Guatemala City
pub const DEFAULT_MAP_CENTER: (f64, f64) = (14.6349, -90.5069);
pub const DEFAULT_MAP_ZOOM: f64 = 12.0;
pub const MIN_MAP_ZOOM: f64 = 2.0;
pub const MAX_MAP_ZOOM: f64 = 19.0;
/// Zoom used when opening the map focused on a single report
pub const FOCUS_MAP_ZOOM: f64 = 18.0;

pub const DEFAULT_LINE_COLOR: &str = "#3b82f6";

pub const REPORTS_PER_PAGE: usize = 10;
pub const SEARCH_DEBOUNCE_MS: u32 = 300;
pub const TOAST_DURATION_MS: u32 = 3000;

/// Reports older than this many days are high priority
pub const HIGH_PRIORITY_AGE_DAYS: i64 = 7;
/// Reports older than this many days are medium priority
pub const MEDIUM_PRIORITY_AGE_DAYS: i64 = 3;
pub const HIGH_PRIORITY_TYPES: &[&str] = &["Fuga de agua", "Alcantarilla"];

pub const ANONYMOUS_AUTHOR: &str = "Anónimo";
pub const DEFAULT_STATUS: &str = "Pendiente";
pub const FALLBACK_MARKER_COLOR: &str = "#6b7280";
pub const FALLBACK_PROBLEM_ICON: &str = "⚠️";

/// Published spreadsheet feeding the report list
pub const REPORTS_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQsQgn3k99SeflscYBoGEMxOV-VfoG6KjeU11dHUse7n3BNloWofEbK5aYWeCO26RZFSD7x-M33fSTm/pub?gid=397731581&single=true&output=csv";
/// Published spreadsheet feeding the report map
pub const MAP_REPORTS_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTIKh_vys71-FBFCWFW3cSofAEjIhq9CncE2Brk_qzgcKXZ1XSjkYCET-J2YxM47IXbw5szIVz3v2as/pub?gid=47348234&single=true&output=csv";
pub const REPORT_FORM_URL: &str = "https://docs.google.com/forms/d/e/YOUR_FORM_ID/viewform?embedded=true";
/// Form field receiving the picked `lat,lng`
pub const REPORT_FORM_LOCATION_FIELD: &str = "entry.1000000001";

/// Optional runtime override of the compiled data configuration
pub const CONFIG_PATH: &str = "/config.json";

pub const OSRM_BASE_URL: &str = "https://router.project-osrm.org";
pub const OPENROUTESERVICE_BASE_URL: &str = "https://api.openrouteservice.org";

/// OpenStreetMap raster tiles
pub const MAP_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const MAP_ATTRIBUTION: &str = "© OpenStreetMap contributors";
