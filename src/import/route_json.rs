use crate::error::ParseError;
use crate::models::Line;
use serde_json::{Map, Value};

fn has_non_empty_string(entry: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .any(|value| value.as_str().is_some_and(|s| !s.trim().is_empty()))
}

fn has_array(entry: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().filter_map(|key| entry.get(*key)).any(Value::is_array)
}

fn parse_entry(index: usize, entry: Value) -> Result<Line, ParseError> {
    let malformed = |reason: String| ParseError::MalformedEntry { index, reason };

    let Some(fields) = entry.as_object() else {
        return Err(malformed("no es un objeto".to_string()));
    };
    if !has_non_empty_string(fields, &["name", "linea"]) {
        return Err(malformed("falta `name`".to_string()));
    }
    if !has_non_empty_string(fields, &["color"]) {
        return Err(malformed("falta `color`".to_string()));
    }
    if !has_array(fields, &["stations", "ruta"]) {
        return Err(malformed("`stations` debe ser un array".to_string()));
    }

    let line: Line = serde_json::from_value(entry).map_err(|e| malformed(e.to_string()))?;
    line.validate_positions().map_err(|e| malformed(e.to_string()))?;
    Ok(line)
}

/// Parse and validate a whole route collection document
///
/// Nothing is returned unless every entry is valid, so callers can replace
/// their collection only on success.
///
/// # Errors
///
/// Returns `Json` for unparsable text, `NotAnArray` for a non-array document
/// and `MalformedEntry` (1-based index) for the first invalid line
pub fn parse_lines(json: &str) -> Result<Vec<Line>, ParseError> {
    let value: Value = serde_json::from_str(json.trim()).map_err(|e| ParseError::Json(e.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(ParseError::NotAnArray);
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| parse_entry(i + 1, entry))
        .collect()
}

/// Pretty-printed JSON array of lines
///
/// # Errors
///
/// Returns `Json` if serialization fails
pub fn export_lines(lines: &[Line]) -> Result<String, ParseError> {
    serde_json::to_string_pretty(lines).map_err(|e| ParseError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatLng;

    const EXAMPLE: &str = r##"[{"name":"L1","color":"#ff0000","stations":[{"name":"A","lat":14.6,"lng":-90.5},{"name":"B","lat":14.7,"lng":-90.4}],"isCircular":false}]"##;

    #[test]
    fn test_parse_example_document() {
        let lines = parse_lines(EXAMPLE).expect("example should parse");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "L1");
        assert_eq!(lines[0].color, "#ff0000");
        assert_eq!(lines[0].stations.len(), 2);
        assert_eq!(lines[0].stations[1].position(), LatLng { lat: 14.7, lng: -90.4 });
        assert!(!lines[0].is_circular);
        assert!(lines[0].correction_points.is_empty());
    }

    #[test]
    fn test_export_then_parse_round_trips() {
        let lines = parse_lines(EXAMPLE).expect("example should parse");
        let exported = export_lines(&lines).expect("export");
        assert_eq!(parse_lines(&exported).expect("re-import"), lines);
    }

    #[test]
    fn test_round_trip_keeps_routed_geometry_and_correction_points() {
        let json = r##"[{"name":"L2","color":"#00f","stations":[{"name":"A","lat":1.0,"lng":2.0},{"name":"B","lat":1.5,"lng":2.5}],"correctionPoints":[{"lat":1.2,"lng":2.2}],"isCircular":true,"routedGeometry":[[1.0,2.0],[1.1,2.1],[1.5,2.5]]}]"##;
        let lines = parse_lines(json).expect("parses");
        assert_eq!(lines[0].routed_geometry.as_ref().map(Vec::len), Some(3));
        let exported = export_lines(&lines).expect("export");
        assert!(exported.contains("routedGeometry"));
        assert_eq!(parse_lines(&exported).expect("re-import"), lines);
    }

    #[test]
    fn test_accepts_legacy_keys() {
        let json = r##"[{"linea":"Línea 1","color":"#f00","ruta":[{"nombre":"Centro","lat":14.6,"lng":-90.5}],"routedCoordinates":[[14.6,-90.5],[14.61,-90.51]]}]"##;
        let lines = parse_lines(json).expect("legacy document parses");
        assert_eq!(lines[0].name, "Línea 1");
        assert_eq!(lines[0].stations[0].name, "Centro");
        assert!(lines[0].routed_geometry.is_some());
    }

    #[test]
    fn test_preserves_order() {
        let json = r##"[
            {"name":"B","color":"#111","stations":[]},
            {"name":"A","color":"#222","stations":[]},
            {"name":"C","color":"#333","stations":[]}
        ]"##;
        let names: Vec<String> = parse_lines(json).expect("parses").into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_duplicate_names_are_not_rechecked() {
        let json = r##"[{"name":"A","color":"#111","stations":[]},{"name":"A","color":"#222","stations":[]}]"##;
        assert_eq!(parse_lines(json).expect("parses").len(), 2);
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(matches!(parse_lines("[{"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_rejects_non_array() {
        assert_eq!(parse_lines(r#"{"name":"L1"}"#), Err(ParseError::NotAnArray));
    }

    #[test]
    fn test_reports_index_of_entry_missing_stations() {
        let json = r##"[{"name":"A","color":"#111","stations":[]},{"name":"B","color":"#222"}]"##;
        match parse_lines(json) {
            Err(ParseError::MalformedEntry { index, reason }) => {
                assert_eq!(index, 2);
                assert!(reason.contains("stations"));
            }
            other => panic!("expected malformed entry, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_empty_name_and_color() {
        let missing_name = r##"[{"name":"","color":"#111","stations":[]}]"##;
        assert!(matches!(parse_lines(missing_name), Err(ParseError::MalformedEntry { index: 1, .. })));
        let missing_color = r#"[{"name":"A","stations":[]}]"#;
        assert!(matches!(parse_lines(missing_color), Err(ParseError::MalformedEntry { index: 1, .. })));
    }

    #[test]
    fn test_rejects_out_of_range_station() {
        let json = r##"[{"name":"A","color":"#111","stations":[{"name":"X","lat":99.0,"lng":0.0}]}]"##;
        assert!(matches!(parse_lines(json), Err(ParseError::MalformedEntry { index: 1, .. })));
    }

    #[test]
    fn test_rejects_station_without_coordinates() {
        let json = r##"[{"name":"A","color":"#111","stations":[{"name":"X"}]}]"##;
        assert!(matches!(parse_lines(json), Err(ParseError::MalformedEntry { index: 1, .. })));
    }
}
