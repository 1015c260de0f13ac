use super::apply_edit;
use crate::api::{fetch_route, TravelMode};
use crate::components::toast::Toaster;
use crate::config::DataConfig;
use crate::models::{RouteEditor, RoutingOutcome};
use leptos::{
    component, create_signal, event_target_checked, event_target_value, spawn_local, view, CollectView, IntoView,
    ReadSignal, SignalGet, SignalSet, SignalUpdate, SignalWith, StoredValue, WriteSignal,
};

/// Street routing preferences and the "apply routing" action for the active line
#[allow(clippy::needless_pass_by_value)]
#[component]
pub fn RoutingControls(
    editor: ReadSignal<RouteEditor>,
    set_editor: WriteSignal<RouteEditor>,
    config: StoredValue<DataConfig>,
    toaster: Toaster,
) -> impl IntoView {
    let (in_flight, set_in_flight) = create_signal(false);

    let use_street_routing = move || editor.with(|e| e.routing.use_street_routing);

    let apply_routing = move |_| {
        let Some(job) = apply_edit(set_editor, toaster, RouteEditor::begin_routing) else { return };
        let routing_config = config.with_value(|c| c.routing.clone());
        set_in_flight.set(true);
        spawn_local(async move {
            let result = fetch_route(&routing_config, &job.request).await;
            let _ = set_in_flight.try_set(false);
            let Some(outcome) = set_editor.try_update(|e| e.complete_routing(&job, result)) else { return };
            match outcome {
                RoutingOutcome::Applied => toaster.show("Ruta por calles aplicada"),
                RoutingOutcome::FellBack(e) if e.is_network() => {
                    toaster.show("Servicio de ruteo no disponible. Se usa la línea directa.");
                }
                RoutingOutcome::FellBack(e) => {
                    toaster.show_error(format!("No se pudo calcular la ruta por calles ({e}). Se usa la línea directa."));
                }
                RoutingOutcome::Superseded => {}
            }
        });
    };

    view! {
        <section class="routing-controls">
            <h3>"Ruteo por calles"</h3>
            <label>
                <input
                    type="checkbox"
                    prop:checked=use_street_routing
                    on:change=move |ev| {
                        let enabled = event_target_checked(&ev);
                        set_editor.update(|e| e.routing.use_street_routing = enabled);
                    }
                />
                " Usar ruteo por calles"
            </label>
            <label>"Modo"</label>
            <select
                disabled=move || !use_street_routing()
                on:change=move |ev| {
                    if let Some(mode) = TravelMode::parse(&event_target_value(&ev)) {
                        set_editor.update(|e| e.routing.mode = mode);
                    }
                }
            >
                {TravelMode::ALL.into_iter().map(|mode| view! {
                    <option value=mode.as_str() selected=move || editor.with(|e| e.routing.mode == mode)>
                        {mode.label()}
                    </option>
                }).collect_view()}
            </select>
            <label>
                <input
                    type="checkbox"
                    prop:checked=move || editor.with(|e| e.routing.include_correction_points)
                    disabled=move || !use_street_routing()
                    on:change=move |ev| {
                        let include = event_target_checked(&ev);
                        set_editor.update(|e| e.routing.include_correction_points = include);
                    }
                />
                " Incluir puntos de corrección"
            </label>
            <button
                class="btn btn-primary"
                on:click=apply_routing
                disabled=move || {
                    in_flight.get() || !editor.with(|e| e.routing.use_street_routing && e.can_apply_routing())
                }
            >
                {move || if in_flight.get() { "Calculando..." } else { "Aplicar ruteo" }}
            </button>
        </section>
    }
}
