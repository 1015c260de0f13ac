use crate::config::DataConfig;
use crate::geometry::MapViewport;
use crate::models::{LatLng, Line, LineTarget, Report, RouteEditor};

const ROUTE_WIDTH: f64 = 6.0;
const DRAFT_ROUTE_WIDTH: f64 = 4.0;
const ROUTE_ALPHA: f64 = 0.8;
const DRAFT_ROUTE_ALPHA: f64 = 0.7;
const PENDING_ROUTE_ALPHA: f64 = 0.5;
const STATION_RADIUS: f64 = 8.0;
const DRAFT_STATION_RADIUS: f64 = 6.0;
const CORRECTION_POINT_RADIUS: f64 = 5.0;
const REPORT_MARKER_RADIUS: f64 = 9.0;
const PICKED_MARKER_RADIUS: f64 = 10.0;
const PICKED_MARKER_COLOR: &str = "#111827";
const MARKER_OUTLINE: &str = "#ffffff";

/// Identifies what a marker stands for, so a click can be routed back to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKey {
    Station { target: LineTarget, index: usize },
    CorrectionPoint { target: LineTarget, index: usize },
    Report(usize),
    /// Location picked for a new report
    Picked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    Solid,
    /// Dash length and gap in pixels
    Dashed(u8, u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<LatLng>,
    pub color: String,
    pub width: f64,
    pub alpha: f64,
    pub stroke: StrokeStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub key: MarkerKey,
    pub position: LatLng,
    pub fill: String,
    pub outline: String,
    pub radius: f64,
    /// Shown next to the marker
    pub label: Option<String>,
    pub draggable: bool,
}

/// Everything the map canvas draws, in drawing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapScene {
    pub polylines: Vec<Polyline>,
    pub markers: Vec<Marker>,
}

impl MapScene {
    /// Every drawn position, for fitting the viewport
    #[must_use]
    pub fn positions(&self) -> Vec<LatLng> {
        self.polylines
            .iter()
            .flat_map(|p| p.points.iter().copied())
            .chain(self.markers.iter().map(|m| m.position))
            .collect()
    }

    /// Topmost marker under a screen position
    #[must_use]
    pub fn marker_at(&self, viewport: &MapViewport, screen: (f64, f64)) -> Option<&Marker> {
        self.markers.iter().rev().find(|marker| {
            let (x, y) = viewport.to_screen(marker.position);
            (x - screen.0).hypot(y - screen.1) <= marker.radius + 4.0
        })
    }
}

fn line_markers(line: &Line, target: LineTarget, radius: f64, draggable: bool, markers: &mut Vec<Marker>) {
    markers.extend(line.stations.iter().enumerate().map(|(index, station)| Marker {
        key: MarkerKey::Station { target, index },
        position: station.position(),
        fill: line.color.clone(),
        outline: MARKER_OUTLINE.to_string(),
        radius,
        label: Some(station.name.clone()),
        draggable,
    }));
}

fn correction_markers(line: &Line, target: LineTarget, markers: &mut Vec<Marker>) {
    markers.extend(line.correction_points.iter().enumerate().map(|(index, point)| Marker {
        key: MarkerKey::CorrectionPoint { target, index },
        position: *point,
        fill: MARKER_OUTLINE.to_string(),
        outline: line.color.clone(),
        radius: CORRECTION_POINT_RADIUS,
        label: None,
        draggable: false,
    }));
}

/// Finalized lines, then the draft on top. Stations are draggable only on the
/// line being edited; correction points are shown for the active line.
#[must_use]
pub fn route_scene(editor: &RouteEditor) -> MapScene {
    let mut scene = MapScene::default();
    let active = editor.active_target();

    for (index, line) in editor.lines().iter().enumerate() {
        let target = LineTarget::Line(index);
        let is_active = active == Some(target);
        scene.polylines.push(Polyline {
            points: line.display_path(),
            color: line.color.clone(),
            width: ROUTE_WIDTH,
            alpha: ROUTE_ALPHA,
            stroke: StrokeStyle::Solid,
        });
        line_markers(line, target, STATION_RADIUS, is_active, &mut scene.markers);
        if is_active {
            correction_markers(line, target, &mut scene.markers);
        }
    }

    if let Some(draft) = editor.session().draft() {
        let (alpha, stroke) = if editor.routing.use_street_routing {
            (PENDING_ROUTE_ALPHA, StrokeStyle::Dashed(10, 10))
        } else {
            (DRAFT_ROUTE_ALPHA, StrokeStyle::Dashed(5, 5))
        };
        if draft.stations.len() > 1 || draft.routed_geometry.is_some() {
            scene.polylines.push(Polyline {
                points: draft.display_path(),
                color: draft.color.clone(),
                width: DRAFT_ROUTE_WIDTH,
                alpha,
                stroke,
            });
        }
        line_markers(draft, LineTarget::Draft, DRAFT_STATION_RADIUS, true, &mut scene.markers);
        correction_markers(draft, LineTarget::Draft, &mut scene.markers);
    }

    scene
}

/// One coloured marker per report, plus the picked location on top
#[must_use]
pub fn report_scene(reports: &[Report], config: &DataConfig, picked: Option<LatLng>) -> MapScene {
    let mut markers: Vec<Marker> = reports
        .iter()
        .enumerate()
        .map(|(index, report)| Marker {
            key: MarkerKey::Report(index),
            position: report.location,
            fill: config.problem_style(&report.problem_type).color,
            outline: MARKER_OUTLINE.to_string(),
            radius: REPORT_MARKER_RADIUS,
            label: None,
            draggable: false,
        })
        .collect();
    if let Some(position) = picked {
        markers.push(Marker {
            key: MarkerKey::Picked,
            position,
            fill: PICKED_MARKER_COLOR.to_string(),
            outline: MARKER_OUTLINE.to_string(),
            radius: PICKED_MARKER_RADIUS,
            label: Some("Nuevo reporte".to_string()),
            draggable: true,
        });
    }
    MapScene {
        polylines: Vec::new(),
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn editor_with_line() -> RouteEditor {
        let mut editor = RouteEditor::new();
        editor.start_line("L1", "#ff0000").expect("valid line");
        editor.add_station("A", (14.6, -90.5)).expect("valid station");
        editor.add_station("B", (14.7, -90.4)).expect("valid station");
        editor.finish_line().expect("line has stations");
        editor
    }

    #[test]
    fn test_idle_lines_are_read_only() {
        let scene = route_scene(&editor_with_line());
        assert_eq!(scene.polylines.len(), 1);
        assert_eq!(scene.markers.len(), 2);
        assert!(scene.markers.iter().all(|m| !m.draggable));
        assert_eq!(scene.markers[0].label.as_deref(), Some("A"));
    }

    #[test]
    fn test_edited_line_is_draggable() {
        let mut editor = editor_with_line();
        editor.start_editing(0).expect("line exists");
        editor.add_correction_point((14.65, -90.45)).expect("valid point");
        let scene = route_scene(&editor);
        assert_eq!(scene.markers.len(), 3);
        assert!(scene.markers[0].draggable);
        assert_eq!(
            scene.markers[2].key,
            MarkerKey::CorrectionPoint { target: LineTarget::Line(0), index: 0 }
        );
    }

    #[test]
    fn test_draft_is_drawn_dashed_on_top() {
        let mut editor = editor_with_line();
        editor.start_line("L2", "#00ff00").expect("valid line");
        editor.add_station("X", (14.5, -90.6)).expect("valid station");
        let scene = route_scene(&editor);
        // A single draft station has no polyline yet
        assert_eq!(scene.polylines.len(), 1);

        editor.add_station("Y", (14.55, -90.65)).expect("valid station");
        let scene = route_scene(&editor);
        assert_eq!(scene.polylines.len(), 2);
        assert_eq!(scene.polylines[1].stroke, StrokeStyle::Dashed(5, 5));
        assert_eq!(
            scene.markers.last().map(|m| m.key),
            Some(MarkerKey::Station { target: LineTarget::Draft, index: 1 })
        );
    }

    #[test]
    fn test_marker_hit_testing_prefers_topmost() {
        let mut editor = editor_with_line();
        editor.start_line("L2", "#00ff00").expect("valid line");
        editor.add_station("Same place", (14.6, -90.5)).expect("valid station");
        let scene = route_scene(&editor);
        let viewport = MapViewport::new(LatLng { lat: 14.6, lng: -90.5 }, 14.0).with_size(400.0, 300.0);
        let hit = scene.marker_at(&viewport, (200.0, 150.0)).map(|m| m.key);
        assert_eq!(hit, Some(MarkerKey::Station { target: LineTarget::Draft, index: 0 }));
        assert_eq!(scene.marker_at(&viewport, (10.0, 10.0)), None);
    }

    #[test]
    fn test_report_markers_use_problem_colors() {
        let report = Report {
            author: "Ana".to_string(),
            problem_type: "Fuga de agua".to_string(),
            description: String::new(),
            address: String::new(),
            location: LatLng { lat: 14.6, lng: -90.5 },
            date: None,
            raw_date: String::new(),
            status: "Pendiente".to_string(),
            days_since: 0,
            priority: Priority::High,
        };
        let picked = LatLng { lat: 14.61, lng: -90.51 };
        let scene = report_scene(&[report], &DataConfig::default(), Some(picked));
        assert_eq!(scene.markers[0].fill, "#3b82f6");
        assert_eq!(scene.markers[0].key, MarkerKey::Report(0));
        assert_eq!(scene.markers[1].key, MarkerKey::Picked);
        assert!(scene.markers[1].draggable);
    }
}
