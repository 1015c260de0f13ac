use crate::geometry::{distance_to_segment, MapViewport};
use crate::scene::MapScene;

const POLYLINE_CLICK_THRESHOLD: f64 = 6.0;
/// Pointer travel below this many pixels still counts as a click
pub const CLICK_SLOP: f64 = 4.0;

/// Index of the topmost polyline passing within a few pixels of `screen`
#[must_use]
pub fn find_polyline_at_position(scene: &MapScene, viewport: &MapViewport, screen: (f64, f64)) -> Option<usize> {
    scene.polylines.iter().enumerate().rev().find_map(|(index, polyline)| {
        let threshold = POLYLINE_CLICK_THRESHOLD + polyline.width / 2.0;
        let points: Vec<(f64, f64)> = polyline.points.iter().map(|p| viewport.to_screen(*p)).collect();
        points
            .windows(2)
            .any(|segment| distance_to_segment(screen, segment[0], segment[1]) <= threshold)
            .then_some(index)
    })
}

#[must_use]
pub fn is_click(start: (f64, f64), end: (f64, f64)) -> bool {
    (end.0 - start.0).hypot(end.1 - start.1) < CLICK_SLOP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatLng;
    use crate::scene::{Polyline, StrokeStyle};

    fn scene_with_lines() -> MapScene {
        let line = |lng: f64| Polyline {
            points: vec![LatLng { lat: 14.60, lng }, LatLng { lat: 14.62, lng }],
            color: "#ff0000".to_string(),
            width: 6.0,
            alpha: 0.8,
            stroke: StrokeStyle::Solid,
        };
        MapScene {
            polylines: vec![line(-90.50), line(-90.50), line(-90.40)],
            markers: Vec::new(),
        }
    }

    #[test]
    fn test_polyline_hit_prefers_topmost() {
        let scene = scene_with_lines();
        let viewport = MapViewport::new(LatLng { lat: 14.61, lng: -90.50 }, 14.0).with_size(400.0, 300.0);
        assert_eq!(find_polyline_at_position(&scene, &viewport, (202.0, 150.0)), Some(1));
    }

    #[test]
    fn test_polyline_miss() {
        let scene = scene_with_lines();
        let viewport = MapViewport::new(LatLng { lat: 14.61, lng: -90.50 }, 14.0).with_size(400.0, 300.0);
        assert_eq!(find_polyline_at_position(&scene, &viewport, (260.0, 150.0)), None);
    }

    #[test]
    fn test_click_slop() {
        assert!(is_click((10.0, 10.0), (12.0, 11.0)));
        assert!(!is_click((10.0, 10.0), (20.0, 10.0)));
    }
}
