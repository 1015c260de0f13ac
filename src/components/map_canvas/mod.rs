pub mod hit_detection;
pub mod renderer;

use crate::geometry::MapViewport;
use crate::models::LatLng;
use crate::scene::{MapScene, MarkerKey};
use leptos::{
    component, create_effect, create_node_ref, create_signal, html, on_cleanup, view, wasm_bindgen, web_sys, IntoView,
    NodeRef, ReadSignal, Signal, SignalGet, SignalGetUntracked, SignalSet, SignalUpdate, SignalWithUntracked, WriteSignal,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{CanvasRenderingContext2d, MouseEvent, WheelEvent};

const WHEEL_ZOOM_FACTOR: f64 = 1.5;
const FIT_PADDING: f64 = 40.0;

/// Raw `(lat, lng)` under the pointer; callers validate before storing it
pub type MapClickHandler = Rc<dyn Fn((f64, f64))>;
pub type MarkerHandler = Rc<dyn Fn(MarkerKey)>;
pub type MarkerDropHandler = Rc<dyn Fn(MarkerKey, (f64, f64))>;
/// Receives the polyline index; returns `true` when the click was consumed
pub type PolylineHandler = Rc<dyn Fn(usize) -> bool>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Panning { start: (f64, f64), last: (f64, f64) },
    PressedMarker { key: MarkerKey, start: (f64, f64), draggable: bool },
    DraggingMarker { key: MarkerKey },
}

/// Pointer position relative to the canvas, and the viewport sized to it
fn pointer(canvas_ref: NodeRef<html::Canvas>, viewport: ReadSignal<MapViewport>, ev: &MouseEvent) -> Option<((f64, f64), MapViewport)> {
    let canvas = canvas_ref.get_untracked()?;
    let canvas_elem: &web_sys::HtmlCanvasElement = &canvas;
    let rect = canvas_elem.get_bounding_client_rect();
    let position = (f64::from(ev.client_x()) - rect.left(), f64::from(ev.client_y()) - rect.top());
    let sized = viewport
        .get_untracked()
        .with_size(f64::from(canvas_elem.client_width()), f64::from(canvas_elem.client_height()));
    Some((position, sized))
}

fn raw_lat_lng(viewport: &MapViewport, screen: (f64, f64)) -> LatLng {
    let (lat, lng) = viewport.to_lat_lng(screen);
    LatLng { lat, lng }
}

fn setup_render_effect(
    canvas_ref: NodeRef<html::Canvas>,
    scene: Signal<MapScene>,
    viewport: ReadSignal<MapViewport>,
    drag_preview: ReadSignal<Option<(MarkerKey, LatLng)>>,
    redraw: ReadSignal<u32>,
    set_redraw: WriteSignal<u32>,
) {
    let tiles = Rc::new(RefCell::new(renderer::TileCache::default()));

    // One shared callback for every tile image; each load triggers a redraw
    let tile_loaded = Closure::<dyn Fn()>::new(move || {
        let _ = set_redraw.try_update(|n| *n = n.wrapping_add(1));
    });
    let on_tile_load: js_sys::Function = tile_loaded.as_ref().unchecked_ref::<js_sys::Function>().clone();

    {
        let tiles = Rc::clone(&tiles);
        on_cleanup(move || {
            // Images still in flight must not call back into a dropped closure
            tiles.borrow_mut().detach();
            drop(tile_loaded);
        });
    }

    create_effect(move |_| {
        let current_scene = scene.get();
        let current_viewport = viewport.get();
        let dragging = drag_preview.get();
        let _ = redraw.get();

        let Some(canvas) = canvas_ref.get() else { return };

        let canvas_elem: &web_sys::HtmlCanvasElement = &canvas;
        let container_width = canvas_elem.client_width() as u32;
        let container_height = canvas_elem.client_height() as u32;

        if container_width > 0 && container_height > 0 {
            canvas_elem.set_width(container_width);
            canvas_elem.set_height(container_height);
        }

        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            return;
        };

        let sized = current_viewport.with_size(f64::from(container_width), f64::from(container_height));
        renderer::draw_map(&ctx, &sized, &current_scene, dragging, &mut tiles.borrow_mut(), &on_tile_load);
    });
}

fn install_resize_listener(set_redraw: WriteSignal<u32>) {
    let Some(window) = web_sys::window() else { return };
    let handler = Closure::wrap(Box::new(move |_: web_sys::Event| {
        let _ = set_redraw.try_update(|n| *n = n.wrapping_add(1));
    }) as Box<dyn FnMut(_)>);
    let _ = window.add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref());
    on_cleanup(move || {
        let _ = window.remove_event_listener_with_callback("resize", handler.as_ref().unchecked_ref());
    });
}

fn cursor_style(gesture: Gesture, over_marker: bool) -> &'static str {
    match gesture {
        Gesture::Panning { .. } | Gesture::DraggingMarker { .. } => "cursor: grabbing;",
        _ if over_marker => "cursor: pointer;",
        _ => "cursor: crosshair;",
    }
}

/// Slippy map drawn on a canvas: raster tiles, then the scene's polylines and
/// markers. Drag pans, the wheel zooms around the pointer, and draggable
/// markers can be moved.
#[allow(clippy::needless_pass_by_value, clippy::too_many_lines)]
#[component]
#[must_use]
pub fn MapCanvas(
    #[prop(into)] scene: Signal<MapScene>,
    viewport: ReadSignal<MapViewport>,
    set_viewport: WriteSignal<MapViewport>,
    /// Each change fits the viewport to the scene
    #[prop(optional, into)]
    fit_trigger: Option<Signal<u32>>,
    #[prop(optional)] on_click: Option<MapClickHandler>,
    #[prop(optional)] on_marker_click: Option<MarkerHandler>,
    #[prop(optional)] on_marker_drag_end: Option<MarkerDropHandler>,
    #[prop(optional)] on_marker_context: Option<MarkerHandler>,
    #[prop(optional)] on_polyline_click: Option<PolylineHandler>,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let (gesture, set_gesture) = create_signal(Gesture::Idle);
    let (over_marker, set_over_marker) = create_signal(false);
    let (drag_preview, set_drag_preview) = create_signal(None::<(MarkerKey, LatLng)>);
    let (redraw, set_redraw) = create_signal(0u32);

    setup_render_effect(canvas_ref, scene, viewport, drag_preview, redraw, set_redraw);
    install_resize_listener(set_redraw);

    if let Some(fit_trigger) = fit_trigger {
        create_effect(move |_| {
            if fit_trigger.get() == 0 {
                return;
            }
            let positions = scene.get_untracked().positions();
            let Some(canvas) = canvas_ref.get_untracked() else { return };
            let canvas_elem: &web_sys::HtmlCanvasElement = &canvas;
            let (width, height) = (f64::from(canvas_elem.client_width()), f64::from(canvas_elem.client_height()));
            set_viewport.update(|v| {
                *v = v.with_size(width, height);
                v.fit(&positions, FIT_PADDING);
            });
        });
    }

    let handle_mouse_down = move |ev: MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        let Some((position, sized)) = pointer(canvas_ref, viewport, &ev) else { return };
        let next = match scene.with_untracked(|s| s.marker_at(&sized, position).map(|m| (m.key, m.draggable))) {
            Some((key, draggable)) => Gesture::PressedMarker { key, start: position, draggable },
            None => Gesture::Panning { start: position, last: position },
        };
        set_gesture.set(next);
    };

    let handle_mouse_move = move |ev: MouseEvent| {
        let Some((position, sized)) = pointer(canvas_ref, viewport, &ev) else { return };
        match gesture.get_untracked() {
            Gesture::Panning { start, last } => {
                set_viewport.update(|v| v.pan_by(position.0 - last.0, position.1 - last.1));
                set_gesture.set(Gesture::Panning { start, last: position });
            }
            Gesture::PressedMarker { key, start, draggable: true } if !hit_detection::is_click(start, position) => {
                set_gesture.set(Gesture::DraggingMarker { key });
                set_drag_preview.set(Some((key, raw_lat_lng(&sized, position))));
            }
            Gesture::DraggingMarker { key } => {
                set_drag_preview.set(Some((key, raw_lat_lng(&sized, position))));
            }
            Gesture::Idle => {
                let hovering = scene.with_untracked(|s| s.marker_at(&sized, position).is_some());
                if hovering != over_marker.get_untracked() {
                    set_over_marker.set(hovering);
                }
            }
            Gesture::PressedMarker { .. } => {}
        }
    };

    let handle_mouse_up = move |ev: MouseEvent| {
        let current = gesture.get_untracked();
        set_gesture.set(Gesture::Idle);
        let Some((position, sized)) = pointer(canvas_ref, viewport, &ev) else { return };
        match current {
            Gesture::Panning { start, .. } if hit_detection::is_click(start, position) => {
                let consumed = match (&on_polyline_click, hit_detection::find_polyline_at_position(&scene.get_untracked(), &sized, position)) {
                    (Some(handler), Some(index)) => handler(index),
                    _ => false,
                };
                if !consumed {
                    if let Some(handler) = &on_click {
                        handler(sized.to_lat_lng(position));
                    }
                }
            }
            Gesture::PressedMarker { key, .. } => {
                if let Some(handler) = &on_marker_click {
                    handler(key);
                }
            }
            Gesture::DraggingMarker { key } => {
                set_drag_preview.set(None);
                if let Some(handler) = &on_marker_drag_end {
                    handler(key, sized.to_lat_lng(position));
                }
            }
            Gesture::Panning { .. } | Gesture::Idle => {}
        }
    };

    let handle_mouse_leave = move |_ev: MouseEvent| {
        set_gesture.set(Gesture::Idle);
        set_drag_preview.set(None);
        set_over_marker.set(false);
    };

    let handle_context_menu = move |ev: MouseEvent| {
        ev.prevent_default();
        let Some((position, sized)) = pointer(canvas_ref, viewport, &ev) else { return };
        let Some(key) = scene.with_untracked(|s| s.marker_at(&sized, position).map(|m| m.key)) else { return };
        if let Some(handler) = &on_marker_context {
            handler(key);
        }
    };

    let handle_wheel = move |ev: WheelEvent| {
        ev.prevent_default();
        let Some((position, sized)) = pointer(canvas_ref, viewport, &ev) else { return };
        let factor = if ev.delta_y() < 0.0 { WHEEL_ZOOM_FACTOR } else { 1.0 / WHEEL_ZOOM_FACTOR };
        set_viewport.update(|v| {
            *v = sized;
            v.zoom_at(factor, position);
        });
    };

    view! {
        <div class="map-canvas-container">
            <canvas
                node_ref=canvas_ref
                class="map-canvas"
                on:mousedown=handle_mouse_down
                on:mousemove=handle_mouse_move
                on:mouseup=handle_mouse_up
                on:mouseleave=handle_mouse_leave
                on:contextmenu=handle_context_menu
                on:wheel=handle_wheel
                style=move || cursor_style(gesture.get(), over_marker.get())
            />
            <div class="map-zoom-controls">
                <button on:click=move |_| set_viewport.update(|v| v.zoom_at(2.0, (v.width / 2.0, v.height / 2.0)))>"+"</button>
                <button on:click=move |_| set_viewport.update(|v| v.zoom_at(0.5, (v.width / 2.0, v.height / 2.0)))>"−"</button>
            </div>
        </div>
    }
}
