mod creation_controls;
mod edit_controls;
mod json_panel;
mod routing_controls;

use crate::components::map_canvas::MapCanvas;
use crate::components::prompt_dialog::{PromptDialog, PromptKind};
use crate::components::toast::Toaster;
use crate::config::DataConfig;
use crate::error::EditorError;
use crate::geometry::MapViewport;
use crate::models::{LatLng, PointerMode, RouteEditor, Station};
use crate::scene::{route_scene, MarkerKey};
use creation_controls::CreationControls;
use edit_controls::EditControls;
use json_panel::JsonPanel;
use routing_controls::RoutingControls;
use leptos::{
    component, create_memo, create_signal, view, IntoView, Signal, SignalGet, SignalGetUntracked, SignalSet,
    SignalUpdate, SignalWith, SignalWithUntracked, StoredValue, WriteSignal,
};
use std::rc::Rc;

/// Run `edit` against the editor. Failures are reported through the toast;
/// the editor methods leave their state untouched on error.
pub(crate) fn apply_edit<T>(
    set_editor: WriteSignal<RouteEditor>,
    toaster: Toaster,
    edit: impl FnOnce(&mut RouteEditor) -> Result<T, EditorError>,
) -> Option<T> {
    match set_editor.try_update(edit)? {
        Ok(value) => Some(value),
        Err(e) => {
            toaster.show_error(e.to_string());
            None
        }
    }
}

/// Station waiting for a name after a map click
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingStation {
    point: LatLng,
}

/// Transit line editor: a map to draw on plus the control sidebar
#[allow(clippy::needless_pass_by_value, clippy::too_many_lines)]
#[component]
#[must_use]
pub fn RouteEditorView(config: StoredValue<DataConfig>, toaster: Toaster) -> impl IntoView {
    let (editor, set_editor) = create_signal(RouteEditor::new());
    let (viewport, set_viewport) = create_signal(config.with_value(|c| MapViewport::new(c.map.center(), c.map.zoom)));
    let (fit_trigger, set_fit_trigger) = create_signal(0u32);
    let (pending_station, set_pending_station) = create_signal(None::<PendingStation>);
    let (station_name, set_station_name) = create_signal(String::new());
    let (station_to_delete, set_station_to_delete) = create_signal(None::<usize>);

    let scene = create_memo(move |_| editor.with(route_scene));

    let on_click = Rc::new(move |(lat, lng): (f64, f64)| {
        let (active, mode) = editor.with_untracked(|e| (e.active_target().is_some(), e.pointer_mode));
        if !active {
            toaster.show("Inicia una nueva ruta o selecciona una para editar");
            return;
        }
        let point = match LatLng::new(lat, lng) {
            Ok(point) => point,
            Err(e) => {
                toaster.show_error(e.to_string());
                return;
            }
        };
        match mode {
            PointerMode::AddStation => {
                set_station_name.set(String::new());
                set_pending_station.set(Some(PendingStation { point }));
            }
            PointerMode::AddCorrectionPoint => {
                apply_edit(set_editor, toaster, |e| e.add_correction_point((point.lat, point.lng)));
            }
        }
    });

    let on_marker_click = Rc::new(move |key: MarkerKey| {
        let description = editor.with_untracked(|e| match key {
            MarkerKey::Station { target, index } => e.line(target).and_then(|line| {
                line.stations.get(index).map(|s| format!("{} · Línea: {}", s.name, line.name))
            }),
            MarkerKey::CorrectionPoint { index, .. } => Some(format!("Punto de corrección {}", index + 1)),
            MarkerKey::Report(_) | MarkerKey::Picked => None,
        });
        if let Some(description) = description {
            toaster.show(description);
        }
    });

    let on_marker_drag_end = Rc::new(move |key: MarkerKey, point: (f64, f64)| {
        if let MarkerKey::Station { index, .. } = key {
            apply_edit(set_editor, toaster, |e| e.move_station(index, point));
        }
    });

    let on_marker_context = Rc::new(move |key: MarkerKey| {
        let is_active = |target| editor.with_untracked(|e| e.active_target() == Some(target));
        match key {
            MarkerKey::Station { target, index } if is_active(target) => set_station_to_delete.set(Some(index)),
            MarkerKey::CorrectionPoint { target, index } if is_active(target) => {
                apply_edit(set_editor, toaster, |e| e.delete_correction_point(index));
            }
            _ => {}
        }
    });

    // Clicking a finalized line while idle opens it for editing
    let on_polyline_click = Rc::new(move |index: usize| {
        let selectable = editor.with_untracked(|e| e.session().is_idle() && index < e.lines().len());
        if selectable {
            apply_edit(set_editor, toaster, |e| e.start_editing(index));
        }
        selectable
    });

    let confirm_station_name = Rc::new(move || {
        let Some(pending) = pending_station.get_untracked() else { return };
        let name = station_name.get_untracked();
        if apply_edit(set_editor, toaster, |e| e.add_station(&name, (pending.point.lat, pending.point.lng))).is_some() {
            set_pending_station.set(None);
        }
    });

    let station_delete_message = Signal::derive(move || {
        let Some(index) = station_to_delete.get() else { return String::new() };
        editor.with(|e| {
            e.active_line()
                .and_then(|line| line.stations.get(index))
                .map(|s| format!("¿Eliminar la estación \"{}\"?", s.name))
                .unwrap_or_default()
        })
    });

    let confirm_station_delete = Rc::new(move || {
        if let Some(index) = station_to_delete.get_untracked() {
            apply_edit(set_editor, toaster, |e| e.delete_station(index));
        }
        set_station_to_delete.set(None);
    });

    view! {
        <div class="route-editor">
            <aside class="route-sidebar">
                <CreationControls editor=editor set_editor=set_editor toaster=toaster />
                <EditControls editor=editor set_editor=set_editor toaster=toaster />
                <RoutingControls editor=editor set_editor=set_editor config=config toaster=toaster />
                <JsonPanel editor=editor set_editor=set_editor toaster=toaster />
            </aside>

            <div class="map-area">
                <MapCanvas
                    scene=scene
                    viewport=viewport
                    set_viewport=set_viewport
                    fit_trigger=fit_trigger
                    on_click=on_click
                    on_marker_click=on_marker_click
                    on_marker_drag_end=on_marker_drag_end
                    on_marker_context=on_marker_context
                    on_polyline_click=on_polyline_click
                />
                <button
                    class="map-fit-button"
                    title="Ajustar a las rutas"
                    on:click=move |_| set_fit_trigger.update(|n| *n += 1)
                >
                    "⤢"
                </button>
                <div class="map-mode-hint">
                    {move || editor.with(|e| match (e.active_line(), e.pointer_mode) {
                        (None, _) => "Sin ruta activa".to_string(),
                        (Some(line), PointerMode::AddStation) => format!("{}: clic para agregar estación", line.name),
                        (Some(line), PointerMode::AddCorrectionPoint) => format!("{}: clic para agregar punto de corrección", line.name),
                    })}
                </div>
            </div>

            <PromptDialog
                is_open=Signal::derive(move || pending_station.with(Option::is_some))
                title=Signal::derive(|| "Nueva estación".to_string())
                kind=PromptKind::Text {
                    label: "Nombre de la estación:".to_string(),
                    value: station_name,
                    set_value: set_station_name,
                    check: Station::check_name,
                }
                on_confirm=confirm_station_name
                on_cancel=Rc::new(move || set_pending_station.set(None))
            />

            <PromptDialog
                is_open=Signal::derive(move || station_to_delete.with(Option::is_some))
                title=Signal::derive(|| "Eliminar estación".to_string())
                kind=PromptKind::Destructive {
                    message: station_delete_message,
                    confirm_text: "Eliminar".to_string(),
                }
                on_confirm=confirm_station_delete
                on_cancel=Rc::new(move || set_station_to_delete.set(None))
            />
        </div>
    }
}
