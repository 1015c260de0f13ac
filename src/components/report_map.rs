use crate::api::reports::{LoadedReports, ReportSource};
use crate::api::RequestTracker;
use crate::components::map_canvas::MapCanvas;
use crate::components::report_detail::ReportDetail;
use crate::components::report_source::spawn_report_load;
use crate::components::toast::Toaster;
use crate::components::window::Window;
use crate::config::DataConfig;
use crate::geometry::MapViewport;
use crate::models::{LatLng, Report};
use crate::scene::{report_scene, MarkerKey};
use crate::submission::{prefilled_form_url, MapFocus};
use leptos::{
    component, create_memo, create_signal, store_value, view, web_sys, For, IntoView, Signal, SignalGet, SignalSet,
    SignalWith, StoredValue,
};
use std::rc::Rc;

/// Viewport from a `?lat=..&lng=..` link, or the configured default
fn initial_viewport(config: &DataConfig) -> MapViewport {
    let focus = web_sys::window()
        .and_then(|w| w.location().href().ok())
        .and_then(|href| MapFocus::from_href(&href));
    match focus {
        Some(focus) => MapViewport::new(focus.center, focus.zoom),
        None => MapViewport::new(config.map.center(), config.map.zoom.min(config.map.max_zoom)),
    }
}

#[component]
fn Legend(config: StoredValue<DataConfig>) -> impl IntoView {
    let entries: Vec<(String, String, String)> = config.with_value(|c| {
        c.problem_types
            .iter()
            .map(|(name, style)| (name.clone(), style.color.clone(), style.icon.clone()))
            .collect()
    });

    view! {
        <div class="map-legend">
            <h4>"Tipos de problema"</h4>
            <For
                each=move || entries.clone()
                key=|(name, _, _)| name.clone()
                children=move |(name, color, icon)| view! {
                    <div class="legend-item">
                        <span class="legend-dot" style=format!("background-color: {color};")></span>
                        <span class="legend-icon">{icon}</span>
                        <span>{name}</span>
                    </div>
                }
            />
        </div>
    }
}

/// Map of published reports with the embedded submission form
#[allow(clippy::needless_pass_by_value)]
#[component]
#[must_use]
pub fn ReportMap(config: StoredValue<DataConfig>, toaster: Toaster) -> impl IntoView {
    let (loaded, set_loaded) = create_signal(None::<LoadedReports>);
    let (loading, set_loading) = create_signal(false);
    let (viewport, set_viewport) = create_signal(config.with_value(initial_viewport));
    let (picked, set_picked) = create_signal(None::<LatLng>);
    let (selected, set_selected) = create_signal(None::<Report>);
    let (form_open, set_form_open) = create_signal(false);
    let tracker = store_value(RequestTracker::new());

    let reload = move || {
        spawn_report_load(config.with_value(|c| c.map_reports_url.clone()), tracker, set_loaded, set_loading, toaster);
    };
    reload();

    let reports = create_memo(move |_| loaded.with(|l| l.as_ref().map(|l| l.reports.clone()).unwrap_or_default()));
    let scene = Signal::derive(move || {
        reports.with(|r| config.with_value(|c| report_scene(r, c, picked.get())))
    });
    let form_url = Signal::derive(move || config.with_value(|c| prefilled_form_url(c, picked.get())));

    let pick = move |(lat, lng): (f64, f64)| match LatLng::new(lat, lng) {
        Ok(point) => set_picked.set(Some(point)),
        Err(e) => toaster.show_error(e.to_string()),
    };

    let on_click = Rc::new(pick);
    let on_marker_click = Rc::new(move |key: MarkerKey| {
        if let MarkerKey::Report(index) = key {
            set_selected.set(reports.with(|r| r.get(index).cloned()));
        }
    });
    let on_marker_drag_end = Rc::new(move |key: MarkerKey, point: (f64, f64)| {
        if key == MarkerKey::Picked {
            pick(point);
        }
    });

    view! {
        <div class="report-map-page">
            <div class="map-toolbar">
                <button class="btn btn-primary" on:click=move |_| set_form_open.set(true)>
                    "📝 Reportar problema"
                </button>
                <button class="btn" on:click=move |_| reload() disabled=move || loading.get()>
                    "🔄 Actualizar"
                </button>
                <span class="map-status">
                    {move || {
                        if loading.get() {
                            return "Cargando reportes...".to_string();
                        }
                        loaded.with(|l| match l {
                            Some(l) if l.source == ReportSource::Sample => format!("{} reportes (datos de ejemplo)", l.reports.len()),
                            Some(l) => format!("{} reportes", l.reports.len()),
                            None => String::new(),
                        })
                    }}
                </span>
                <span class="map-hint">
                    {move || match picked.get() {
                        Some(p) => format!("Ubicación seleccionada: {}, {}", p.lat, p.lng),
                        None => "Haz clic en el mapa para marcar la ubicación del problema".to_string(),
                    }}
                </span>
            </div>

            <div class="map-area">
                <MapCanvas
                    scene=scene
                    viewport=viewport
                    set_viewport=set_viewport
                    on_click=on_click
                    on_marker_click=on_marker_click
                    on_marker_drag_end=on_marker_drag_end
                />
                <Legend config=config />
            </div>

            <Window
                is_open=form_open
                title=Signal::derive(|| "Reportar un problema".to_string())
                on_close=move || set_form_open.set(false)
                width=640.0
            >
                <div class="report-form">
                    <p class="form-location">
                        {move || match picked.get() {
                            Some(p) => format!("📍 {}, {}", p.lat, p.lng),
                            None => "Sin ubicación: cierra esta ventana y haz clic en el mapa para marcarla".to_string(),
                        }}
                    </p>
                    <button class="btn" on:click=move |_| set_picked.set(None) disabled=move || picked.get().is_none()>
                        "Quitar ubicación"
                    </button>
                    <iframe class="report-form-frame" src=move || form_url.get() title="Formulario de reporte"></iframe>
                </div>
            </Window>

            <ReportDetail
                report=selected
                config=config
                on_close=Rc::new(move || set_selected.set(None))
                toaster=toaster
            />
        </div>
    }
}
