use crate::components::toast::Toaster;
use crate::models::RouteEditor;
use crate::storage::{copy_to_clipboard, read_file_as_text, routes_export_filename, trigger_download, JSON_MIME};
use crate::time::today;
use leptos::{
    component, create_memo, create_node_ref, create_signal, event_target_value, html, spawn_local, view, web_sys,
    IntoView, ReadSignal, SignalGet, SignalGetUntracked, SignalSet, SignalUpdate, SignalWith, WriteSignal,
};
use leptos::wasm_bindgen::JsCast;

/// Export view of the collection plus JSON import from text or file
#[allow(clippy::needless_pass_by_value)]
#[component]
pub fn JsonPanel(editor: ReadSignal<RouteEditor>, set_editor: WriteSignal<RouteEditor>, toaster: Toaster) -> impl IntoView {
    let (import_text, set_import_text) = create_signal(String::new());
    let file_input_ref = create_node_ref::<html::Input>();

    let export_json = create_memo(move |_| {
        editor.with(|e| {
            e.export_json().unwrap_or_else(|err| {
                leptos::logging::error!("Failed to serialize routes: {err}");
                String::from("[]")
            })
        })
    });

    let copy = move |_| {
        let text = export_json.get_untracked();
        spawn_local(async move {
            match copy_to_clipboard(&text).await {
                Ok(()) => toaster.show("¡Copiado!"),
                Err(e) => toaster.show_error(format!("No se pudo copiar: {e}")),
            }
        });
    };

    let download = move |_| {
        if let Err(e) = trigger_download(&export_json.get_untracked(), &routes_export_filename(today()), JSON_MIME) {
            leptos::logging::error!("Route download failed: {e}");
            toaster.show_error(format!("No se pudo descargar: {e}"));
        }
    };

    let import = move |_| {
        let text = import_text.get_untracked();
        if text.trim().is_empty() {
            toaster.show_error("Por favor, pega el JSON en el área de texto");
            return;
        }
        match set_editor.try_update(|e| e.import_json(&text)) {
            Some(Ok(count)) => {
                set_import_text.set(String::new());
                toaster.show(format!("{count} rutas cargadas"));
            }
            Some(Err(e)) => toaster.show_error(format!("Error al cargar JSON: {e}")),
            None => {}
        }
    };

    let on_file_selected = move |ev: web_sys::Event| {
        let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else { return };
        let Some(file) = input.files().and_then(|files| files.get(0)) else { return };
        if let Err(e) = read_file_as_text(&file, move |text| {
            let _ = set_import_text.try_set(text);
        }) {
            toaster.show_error(format!("No se pudo leer el archivo: {e}"));
        }
        // Allow picking the same file again
        input.set_value("");
    };

    view! {
        <section class="json-panel">
            <h3>"JSON de rutas"</h3>
            <textarea class="json-output" readonly=true prop:value=move || export_json.get()></textarea>
            <div class="button-row">
                <button class="btn btn-primary" on:click=copy>"Copiar JSON"</button>
                <button class="btn" on:click=download>"Descargar"</button>
            </div>

            <h4>"Importar"</h4>
            <textarea
                class="json-input"
                placeholder="Pega aquí el JSON de rutas"
                prop:value=import_text
                on:input=move |ev| set_import_text.set(event_target_value(&ev))
            ></textarea>
            <div class="button-row">
                <button class="btn btn-success" on:click=import>"Cargar JSON"</button>
                <button
                    class="btn"
                    on:click=move |_| {
                        if let Some(input) = file_input_ref.get() {
                            input.click();
                        }
                    }
                >
                    "Cargar desde archivo"
                </button>
                <input
                    type="file"
                    accept=".json,application/json"
                    style="display: none;"
                    node_ref=file_input_ref
                    on:change=on_file_selected
                />
            </div>
        </section>
    }
}
