use super::apply_edit;
use crate::components::toast::Toaster;
use crate::models::{PointerMode, RouteEditor};
use leptos::{
    component, create_signal, event_target_checked, event_target_value, view, IntoView, ReadSignal, Show,
    SignalGetUntracked, SignalSet, SignalUpdate, SignalWith, SignalWithUntracked, WriteSignal,
};

#[allow(clippy::needless_pass_by_value)]
#[component]
pub fn CreationControls(editor: ReadSignal<RouteEditor>, set_editor: WriteSignal<RouteEditor>, toaster: Toaster) -> impl IntoView {
    let (line_name, set_line_name) = create_signal(String::new());
    let (line_color, set_line_color) = create_signal(editor.with_untracked(RouteEditor::suggested_color));

    let is_creating = move || editor.with(|e| e.session().is_creating());
    let is_editing = move || editor.with(|e| e.session().editing_index().is_some());

    let start = move |_| {
        let name = line_name.get_untracked();
        let color = line_color.get_untracked();
        if apply_edit(set_editor, toaster, |e| e.start_line(&name, &color)).is_some() {
            toaster.show(format!("Haz clic en el mapa para agregar estaciones a \"{}\"", name.trim()));
        }
    };

    let finish = move |_| {
        if apply_edit(set_editor, toaster, RouteEditor::finish_line).is_some() {
            set_line_name.set(String::new());
            set_line_color.set(editor.with_untracked(RouteEditor::suggested_color));
        }
    };

    let cancel = move |_| {
        set_editor.update(|e| {
            e.cancel_line();
        });
    };

    view! {
        <section class="route-controls" class:disabled=is_editing>
            <h3>"Nueva ruta"</h3>
            <label>"Nombre de la línea"</label>
            <input
                type="text"
                placeholder="Ej. Línea 1"
                prop:value=line_name
                on:input=move |ev| set_line_name.set(event_target_value(&ev))
                disabled=is_creating
            />
            <label>"Color"</label>
            <input
                type="color"
                prop:value=line_color
                on:input=move |ev| set_line_color.set(event_target_value(&ev))
                disabled=is_creating
            />
            <div class="button-row">
                <button class="btn btn-primary" on:click=start disabled=is_creating>"Iniciar ruta"</button>
                <button class="btn btn-success" on:click=finish disabled=move || !is_creating()>"Finalizar ruta"</button>
                <button class="btn" on:click=cancel disabled=move || !is_creating()>"Cancelar"</button>
            </div>

            <Show when=move || editor.with(|e| e.active_line().is_some())>
                <div class="current-route-info">
                    {move || editor.with(|e| e.active_line().map(|line| view! {
                        <p>
                            <span class="route-swatch" style=format!("background-color: {};", line.color)></span>
                            <strong>{line.name.clone()}</strong>
                            {format!(" · {} estaciones", line.stations.len())}
                            {(!line.correction_points.is_empty()).then(|| format!(" · {} puntos de corrección", line.correction_points.len()))}
                        </p>
                    }))}
                    <div class="pointer-mode">
                        <label>
                            <input
                                type="radio"
                                name="pointer-mode"
                                prop:checked=move || editor.with(|e| e.pointer_mode == PointerMode::AddStation)
                                on:change=move |_| set_editor.update(|e| e.pointer_mode = PointerMode::AddStation)
                            />
                            " Agregar estaciones"
                        </label>
                        <label>
                            <input
                                type="radio"
                                name="pointer-mode"
                                prop:checked=move || editor.with(|e| e.pointer_mode == PointerMode::AddCorrectionPoint)
                                on:change=move |_| set_editor.update(|e| e.pointer_mode = PointerMode::AddCorrectionPoint)
                            />
                            " Agregar puntos de corrección"
                        </label>
                    </div>
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || editor.with(|e| e.active_line().is_some_and(|l| l.is_circular))
                            on:change=move |ev| {
                                let circular = event_target_checked(&ev);
                                apply_edit(set_editor, toaster, |e| e.set_circular(circular));
                            }
                        />
                        " Ruta circular"
                    </label>
                </div>
            </Show>
        </section>
    }
}
