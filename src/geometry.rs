use crate::constants::{MAX_MAP_ZOOM, MIN_MAP_ZOOM};
use crate::models::LatLng;
use std::f64::consts::PI;

/// Pixel size of one Web Mercator tile at zoom 0
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Projects a position to Web Mercator world pixels at the given zoom.
#[must_use]
pub fn project(position: LatLng, zoom: f64) -> (f64, f64) {
    let scale = world_size(zoom);
    let x = (position.lng + 180.0) / 360.0 * scale;
    let sin_lat = position.lat.to_radians().sin().clamp(-0.9999, 0.9999);
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * scale;
    (x, y)
}

/// Inverse of [`project`]. Returns raw `(lat, lng)`; longitude is not wrapped,
/// so points off the visible world come back out of range.
#[must_use]
pub fn unproject((x, y): (f64, f64), zoom: f64) -> (f64, f64) {
    let scale = world_size(zoom);
    let lng = x / scale * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / scale;
    let lat = n.sinh().atan().to_degrees();
    (lat, lng)
}

fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Calculates the minimum distance from a point to a line segment.
#[must_use]
pub fn distance_to_segment(point: (f64, f64), seg_start: (f64, f64), seg_end: (f64, f64)) -> f64 {
    let dx = seg_end.0 - seg_start.0;
    let dy = seg_end.1 - seg_start.1;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        // Degenerate segment
        return (point.0 - seg_start.0).hypot(point.1 - seg_start.1);
    }

    let t = (((point.0 - seg_start.0) * dx + (point.1 - seg_start.1) * dy) / len_sq).clamp(0.0, 1.0);
    let closest_x = seg_start.0 + t * dx;
    let closest_y = seg_start.1 + t * dy;
    (point.0 - closest_x).hypot(point.1 - closest_y)
}

/// Visible map window: a center, a zoom level and the canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl MapViewport {
    #[must_use]
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_MAP_ZOOM, MAX_MAP_ZOOM),
            width: 0.0,
            height: 0.0,
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    fn center_pixel(&self) -> (f64, f64) {
        project(self.center, self.zoom)
    }

    fn set_center_pixel(&mut self, pixel: (f64, f64)) {
        let (lat, lng) = unproject(pixel, self.zoom);
        self.center = LatLng {
            lat: lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT),
            lng: wrap_longitude(lng),
        };
    }

    /// Screen position of a geographic position
    #[must_use]
    pub fn to_screen(&self, position: LatLng) -> (f64, f64) {
        let (px, py) = project(position, self.zoom);
        let (cx, cy) = self.center_pixel();
        (px - cx + self.width / 2.0, py - cy + self.height / 2.0)
    }

    /// Raw `(lat, lng)` under a screen position
    #[must_use]
    pub fn to_lat_lng(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let (cx, cy) = self.center_pixel();
        unproject((cx + x - self.width / 2.0, cy + y - self.height / 2.0), self.zoom)
    }

    /// Moves the map by a screen-space drag delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.center_pixel();
        self.set_center_pixel((cx - dx, cy - dy));
    }

    /// Zooms by `factor`, keeping the position under `anchor` fixed on screen
    pub fn zoom_at(&mut self, factor: f64, anchor: (f64, f64)) {
        if factor <= 0.0 {
            return;
        }
        let (anchor_lat, anchor_lng) = self.to_lat_lng(anchor);
        let anchor_position = LatLng { lat: anchor_lat, lng: anchor_lng };

        self.zoom = (self.zoom + factor.log2()).clamp(MIN_MAP_ZOOM, MAX_MAP_ZOOM);

        let (ax, ay) = project(anchor_position, self.zoom);
        self.set_center_pixel((ax - (anchor.0 - self.width / 2.0), ay - (anchor.1 - self.height / 2.0)));
    }

    /// Centers and zooms so every position fits with `padding` pixels to spare.
    /// No-op for an empty slice or a zero-sized viewport.
    pub fn fit(&mut self, positions: &[LatLng], padding: f64) {
        if positions.is_empty() || self.width <= 0.0 || self.height <= 0.0 {
            return;
        }

        let (min_x, min_y, max_x, max_y) = positions.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), p| {
                let (x, y) = project(*p, 0.0);
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        );

        let span_x = (max_x - min_x).max(f64::EPSILON);
        let span_y = (max_y - min_y).max(f64::EPSILON);
        let usable_w = (self.width - 2.0 * padding).max(1.0);
        let usable_h = (self.height - 2.0 * padding).max(1.0);
        let zoom = (usable_w / span_x).min(usable_h / span_y).log2().floor();

        self.zoom = zoom.clamp(MIN_MAP_ZOOM, MAX_MAP_ZOOM);
        let scale = self.zoom.exp2();
        self.set_center_pixel(((min_x + max_x) / 2.0 * scale, (min_y + max_y) / 2.0 * scale));
    }
}

/// A map tile and where its top-left corner lands on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub z: u32,
    pub x: u32,
    pub y: u32,
    pub screen_x: f64,
    pub screen_y: f64,
    /// Drawn edge length; larger than `TILE_SIZE` between integer zoom levels
    pub size: f64,
}

impl PlacedTile {
    #[must_use]
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

impl MapViewport {
    /// Tiles covering the viewport, wrapping horizontally around the antimeridian
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn visible_tiles(&self) -> Vec<PlacedTile> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec::new();
        }
        let z = self.zoom.floor();
        let size = TILE_SIZE * (self.zoom - z).exp2();
        let tiles_per_side = z.exp2() as i64;

        let (cx, cy) = self.center_pixel();
        let left = cx - self.width / 2.0;
        let top = cy - self.height / 2.0;

        let first_x = (left / size).floor() as i64;
        let last_x = ((left + self.width) / size).floor() as i64;
        let first_y = ((top / size).floor() as i64).max(0);
        let last_y = (((top + self.height) / size).floor() as i64).min(tiles_per_side - 1);

        let mut tiles = Vec::new();
        for ty in first_y..=last_y {
            for tx in first_x..=last_x {
                tiles.push(PlacedTile {
                    z: z as u32,
                    x: tx.rem_euclid(tiles_per_side) as u32,
                    y: ty as u32,
                    screen_x: tx as f64 * size - left,
                    screen_y: ty as f64 * size - top,
                    size,
                });
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn guatemala() -> LatLng {
        LatLng { lat: 14.6349, lng: -90.5069 }
    }

    #[test]
    fn test_project_origin_is_world_center() {
        let (x, y) = project(LatLng { lat: 0.0, lng: 0.0 }, 0.0);
        assert!((x - 128.0).abs() < EPS);
        assert!((y - 128.0).abs() < EPS);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let (x, y) = project(guatemala(), 12.0);
        let (lat, lng) = unproject((x, y), 12.0);
        assert!((lat - 14.6349).abs() < EPS);
        assert!((lng + 90.5069).abs() < EPS);
    }

    #[test]
    fn test_viewport_center_maps_to_screen_center() {
        let viewport = MapViewport::new(guatemala(), 12.0).with_size(800.0, 600.0);
        let (x, y) = viewport.to_screen(guatemala());
        assert!((x - 400.0).abs() < EPS);
        assert!((y - 300.0).abs() < EPS);
    }

    #[test]
    fn test_viewport_screen_to_lat_lng_round_trip() {
        let viewport = MapViewport::new(guatemala(), 14.0).with_size(800.0, 600.0);
        let (lat, lng) = viewport.to_lat_lng((123.0, 456.0));
        let (x, y) = viewport.to_screen(LatLng { lat, lng });
        assert!((x - 123.0).abs() < 1e-6);
        assert!((y - 456.0).abs() < 1e-6);
    }

    #[test]
    fn test_pan_moves_center_against_drag() {
        let mut viewport = MapViewport::new(guatemala(), 12.0).with_size(800.0, 600.0);
        viewport.pan_by(100.0, 0.0);
        assert!(viewport.center.lng < guatemala().lng);
        assert!((viewport.center.lat - guatemala().lat).abs() < EPS);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let mut viewport = MapViewport::new(guatemala(), 12.0).with_size(800.0, 600.0);
        let anchor = (200.0, 150.0);
        let (lat, lng) = viewport.to_lat_lng(anchor);
        viewport.zoom_at(2.0, anchor);
        assert!((viewport.zoom - 13.0).abs() < EPS);
        let (x, y) = viewport.to_screen(LatLng { lat, lng });
        assert!((x - anchor.0).abs() < 1e-4);
        assert!((y - anchor.1).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = MapViewport::new(guatemala(), 19.0).with_size(800.0, 600.0);
        viewport.zoom_at(8.0, (400.0, 300.0));
        assert_eq!(viewport.zoom, MAX_MAP_ZOOM);
    }

    #[test]
    fn test_fit_contains_all_positions() {
        let mut viewport = MapViewport::new(LatLng { lat: 0.0, lng: 0.0 }, 3.0).with_size(800.0, 600.0);
        let positions = [
            LatLng { lat: 14.60, lng: -90.55 },
            LatLng { lat: 14.65, lng: -90.45 },
        ];
        viewport.fit(&positions, 20.0);
        for p in positions {
            let (x, y) = viewport.to_screen(p);
            assert!((0.0..=800.0).contains(&x));
            assert!((0.0..=600.0).contains(&y));
        }
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let viewport = MapViewport::new(LatLng { lat: 0.0, lng: 0.0 }, 2.0).with_size(512.0, 512.0);
        let tiles = viewport.visible_tiles();
        // World is 4x4 tiles at zoom 2; a 512px window centred on the origin spans 2x2 plus edges
        assert!(tiles.iter().all(|t| t.z == 2 && t.x < 4 && t.y < 4));
        assert!(tiles.iter().any(|t| t.screen_x <= 0.0 && t.screen_y <= 0.0));
        assert!(tiles.iter().all(|t| (t.size - 256.0).abs() < EPS));
    }

    #[test]
    fn test_fractional_zoom_scales_tiles() {
        let viewport = MapViewport::new(guatemala(), 12.5).with_size(800.0, 600.0);
        let tiles = viewport.visible_tiles();
        assert!(!tiles.is_empty());
        assert!(tiles.iter().all(|t| t.z == 12));
        assert!((tiles[0].size - 256.0 * 0.5_f64.exp2()).abs() < EPS);
    }

    #[test]
    fn test_tile_url_template() {
        let tile = PlacedTile { z: 3, x: 4, y: 5, screen_x: 0.0, screen_y: 0.0, size: 256.0 };
        assert_eq!(tile.url("https://tile.example.org/{z}/{x}/{y}.png"), "https://tile.example.org/3/4/5.png");
    }

    #[test]
    fn test_distance_to_segment() {
        assert!((distance_to_segment((5.0, 5.0), (0.0, 0.0), (10.0, 0.0)) - 5.0).abs() < EPS);
        assert!((distance_to_segment((-3.0, 4.0), (0.0, 0.0), (10.0, 0.0)) - 5.0).abs() < EPS);
        assert!((distance_to_segment((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)) - 5.0).abs() < EPS);
    }
}
