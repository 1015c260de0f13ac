use crate::constants::{MAP_ATTRIBUTION, MAP_TILE_URL};
use crate::geometry::MapViewport;
use crate::models::LatLng;
use crate::scene::{MapScene, Marker, MarkerKey, Polyline, StrokeStyle};
use leptos::wasm_bindgen::JsValue;
use std::collections::HashMap;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

const CANVAS_BACKGROUND_COLOR: &str = "#e5e7eb";
const MARKER_OUTLINE_WIDTH: f64 = 2.0;
const LABEL_FONT: &str = "12px sans-serif";
const LABEL_COLOR: &str = "#111827";
const LABEL_HALO_COLOR: &str = "rgba(255, 255, 255, 0.9)";
const LABEL_OFFSET: f64 = 4.0;
const ATTRIBUTION_FONT: &str = "11px sans-serif";
const ATTRIBUTION_BACKGROUND: &str = "rgba(255, 255, 255, 0.8)";
const ATTRIBUTION_PADDING: f64 = 4.0;
/// Tile images kept before the cache is dropped and rebuilt
const MAX_CACHED_TILES: usize = 512;

/// Raster tiles by URL. Images still loading are kept so they are requested once.
#[derive(Default)]
pub struct TileCache {
    images: HashMap<String, HtmlImageElement>,
}

impl TileCache {
    /// The tile image if it has finished loading; otherwise starts loading it and
    /// calls `on_load` once it arrives
    fn loaded(&mut self, url: &str, on_load: &js_sys::Function) -> Option<HtmlImageElement> {
        if let Some(image) = self.images.get(url) {
            return (image.complete() && image.natural_width() > 0).then(|| image.clone());
        }
        if self.images.len() >= MAX_CACHED_TILES {
            self.detach();
        }
        match HtmlImageElement::new() {
            Ok(image) => {
                image.set_onload(Some(on_load));
                image.set_src(url);
                self.images.insert(url.to_string(), image);
            }
            Err(e) => leptos::logging::warn!("Failed to create tile image: {e:?}"),
        }
        None
    }

    /// Unhook every pending load callback and forget all tiles. Must run before
    /// the callback passed to [`draw_map`] is dropped.
    pub fn detach(&mut self) {
        for image in self.images.values() {
            image.set_onload(None);
        }
        self.images.clear();
    }
}

fn draw_tiles(ctx: &CanvasRenderingContext2d, viewport: &MapViewport, tiles: &mut TileCache, on_tile_load: &js_sys::Function) {
    for tile in viewport.visible_tiles() {
        let Some(image) = tiles.loaded(&tile.url(MAP_TILE_URL), on_tile_load) else {
            continue;
        };
        // Half a pixel of overlap hides seams between scaled tiles
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            tile.screen_x.floor(),
            tile.screen_y.floor(),
            tile.size.ceil() + 0.5,
            tile.size.ceil() + 0.5,
        );
    }
}

fn set_dash(ctx: &CanvasRenderingContext2d, stroke: StrokeStyle) {
    let dash = match stroke {
        StrokeStyle::Solid => js_sys::Array::new(),
        StrokeStyle::Dashed(length, gap) => js_sys::Array::of2(&JsValue::from(f64::from(length)), &JsValue::from(f64::from(gap))),
    };
    let _ = ctx.set_line_dash(&dash);
}

fn draw_polyline(ctx: &CanvasRenderingContext2d, viewport: &MapViewport, polyline: &Polyline) {
    let mut points = polyline.points.iter().map(|p| viewport.to_screen(*p));
    let Some((x, y)) = points.next() else { return };

    ctx.save();
    ctx.set_global_alpha(polyline.alpha);
    ctx.set_stroke_style_str(&polyline.color);
    ctx.set_line_width(polyline.width);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    set_dash(ctx, polyline.stroke);

    ctx.begin_path();
    ctx.move_to(x, y);
    for (x, y) in points {
        ctx.line_to(x, y);
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_marker(ctx: &CanvasRenderingContext2d, viewport: &MapViewport, marker: &Marker, position: LatLng) {
    let (x, y) = viewport.to_screen(position);

    ctx.begin_path();
    let _ = ctx.arc(x, y, marker.radius, 0.0, std::f64::consts::TAU);
    ctx.set_fill_style_str(&marker.fill);
    ctx.fill();
    ctx.set_stroke_style_str(&marker.outline);
    ctx.set_line_width(MARKER_OUTLINE_WIDTH);
    ctx.stroke();

    if let Some(label) = &marker.label {
        let label_x = x + marker.radius + LABEL_OFFSET;
        ctx.set_font(LABEL_FONT);
        ctx.set_text_baseline("middle");
        ctx.set_line_width(3.0);
        ctx.set_stroke_style_str(LABEL_HALO_COLOR);
        let _ = ctx.stroke_text(label, label_x, y);
        ctx.set_fill_style_str(LABEL_COLOR);
        let _ = ctx.fill_text(label, label_x, y);
    }
}

fn draw_attribution(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_font(ATTRIBUTION_FONT);
    ctx.set_text_baseline("bottom");
    let text_width = ctx.measure_text(MAP_ATTRIBUTION).map_or(160.0, |m| m.width());
    let box_width = text_width + 2.0 * ATTRIBUTION_PADDING;
    let box_height = 16.0;

    ctx.set_fill_style_str(ATTRIBUTION_BACKGROUND);
    ctx.fill_rect(width - box_width, height - box_height, box_width, box_height);
    ctx.set_fill_style_str(LABEL_COLOR);
    let _ = ctx.fill_text(MAP_ATTRIBUTION, width - box_width + ATTRIBUTION_PADDING, height - 2.0);
}

/// Draw the base map and the scene. `dragging` overrides the position of one
/// marker while it is being dragged.
pub fn draw_map(
    ctx: &CanvasRenderingContext2d,
    viewport: &MapViewport,
    scene: &MapScene,
    dragging: Option<(MarkerKey, LatLng)>,
    tiles: &mut TileCache,
    on_tile_load: &js_sys::Function,
) {
    ctx.set_fill_style_str(CANVAS_BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);

    draw_tiles(ctx, viewport, tiles, on_tile_load);

    for polyline in &scene.polylines {
        draw_polyline(ctx, viewport, polyline);
    }

    for marker in &scene.markers {
        let position = match dragging {
            Some((key, position)) if key == marker.key => position,
            _ => marker.position,
        };
        draw_marker(ctx, viewport, marker, position);
    }

    draw_attribution(ctx, viewport.width, viewport.height);
}
