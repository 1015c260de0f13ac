use super::apply_edit;
use crate::components::prompt_dialog::{PromptDialog, PromptKind};
use crate::components::toast::Toaster;
use crate::models::RouteEditor;
use leptos::{
    component, create_signal, event_target_value, view, CollectView, IntoView, ReadSignal, Show, Signal, SignalGet,
    SignalGetUntracked, SignalSet, SignalUpdate, SignalWith, SignalWithUntracked, WriteSignal,
};
use std::rc::Rc;

/// Line selector, edit mode toggle and deletion, plus the station list of the
/// line being edited
#[allow(clippy::needless_pass_by_value, clippy::too_many_lines)]
#[component]
pub fn EditControls(editor: ReadSignal<RouteEditor>, set_editor: WriteSignal<RouteEditor>, toaster: Toaster) -> impl IntoView {
    let (selected_line, set_selected_line) = create_signal(None::<usize>);
    let (confirm_delete_line, set_confirm_delete_line) = create_signal(false);
    let (confirm_clear_all, set_confirm_clear_all) = create_signal(false);

    let editing_index = move || editor.with(|e| e.session().editing_index());
    let selection = move || selected_line.get().or_else(editing_index);

    let start_editing = move |_| {
        let Some(index) = selection() else {
            toaster.show_error("Por favor, selecciona una ruta para editar");
            return;
        };
        if let Some(Some(discarded)) = apply_edit(set_editor, toaster, |e| e.start_editing(index)) {
            toaster.show(format!("Se descartó la ruta sin terminar \"{}\"", discarded.name));
        }
    };

    let request_delete = move |_| {
        if selection().is_none() {
            toaster.show_error("Por favor, selecciona una ruta para eliminar");
            return;
        }
        set_confirm_delete_line.set(true);
    };

    let delete_message = Signal::derive(move || {
        let Some(index) = selection() else { return String::new() };
        editor.with(|e| {
            e.lines()
                .get(index)
                .map(|line| format!("¿Eliminar la ruta \"{}\"?", line.name))
                .unwrap_or_default()
        })
    });

    let confirm_delete = Rc::new(move || {
        if let Some(index) = selected_line.get_untracked().or_else(|| editor.with_untracked(|e| e.session().editing_index())) {
            if apply_edit(set_editor, toaster, |e| e.delete_line(index)).is_some() {
                set_selected_line.set(None);
            }
        }
        set_confirm_delete_line.set(false);
    });

    let confirm_clear = Rc::new(move || {
        set_editor.update(RouteEditor::clear_all);
        set_selected_line.set(None);
        set_confirm_clear_all.set(false);
    });

    view! {
        <section class="edit-controls">
            <h3>"Rutas guardadas"</h3>
            <Show
                when=move || editor.with(|e| !e.lines().is_empty())
                fallback=|| view! { <p class="empty-hint">"Aún no hay rutas"</p> }
            >
                <select on:change=move |ev| set_selected_line.set(event_target_value(&ev).parse::<usize>().ok())>
                    <option value="" selected=move || selection().is_none()>"Selecciona una ruta para editar"</option>
                    {move || editor.with(|e| {
                        e.lines()
                            .iter()
                            .enumerate()
                            .map(|(index, line)| view! {
                                <option value=index.to_string() selected=move || selection() == Some(index)>
                                    {line.name.clone()}
                                </option>
                            })
                            .collect_view()
                    })}
                </select>
                <div class="button-row">
                    <Show
                        when=move || editing_index().is_some()
                        fallback=move || view! { <button class="btn btn-primary" on:click=start_editing>"Editar ruta"</button> }
                    >
                        <button class="btn" on:click=move |_| {
                            set_editor.update(|e| {
                                e.exit_editing();
                            });
                        }>"Salir de edición"</button>
                    </Show>
                    <button class="btn btn-danger" on:click=request_delete>"Eliminar ruta"</button>
                </div>
            </Show>

            <Show when=move || editing_index().is_some()>
                <p class="edit-hint">"Arrastra las estaciones para moverlas; clic derecho para eliminarlas."</p>
                <ul class="station-list">
                    {move || editor.with(|e| {
                        e.active_line()
                            .map_or_else(Vec::new, |line| {
                                line.stations
                                    .iter()
                                    .enumerate()
                                    .map(|(index, station)| view! {
                                        <li>
                                            <span>{format!("{}. {}", index + 1, station.name)}</span>
                                            <button
                                                class="icon-button"
                                                title="Eliminar estación"
                                                on:click=move |_| {
                                                    apply_edit(set_editor, toaster, |e| e.delete_station(index));
                                                }
                                            >
                                                "×"
                                            </button>
                                        </li>
                                    })
                                    .collect::<Vec<_>>()
                            })
                            .collect_view()
                    })}
                </ul>
            </Show>

            <button
                class="btn btn-danger"
                on:click=move |_| set_confirm_clear_all.set(true)
                disabled=move || editor.with(|e| e.lines().is_empty() && e.session().is_idle())
            >
                "Borrar todo"
            </button>

            <PromptDialog
                is_open=confirm_delete_line
                title=Signal::derive(|| "Eliminar ruta".to_string())
                kind=PromptKind::Destructive { message: delete_message, confirm_text: "Eliminar".to_string() }
                on_confirm=confirm_delete
                on_cancel=Rc::new(move || set_confirm_delete_line.set(false))
            />
            <PromptDialog
                is_open=confirm_clear_all
                title=Signal::derive(|| "Borrar todo".to_string())
                kind=PromptKind::Destructive {
                    message: Signal::derive(|| "¿Estás seguro de que quieres eliminar todas las rutas?".to_string()),
                    confirm_text: "Borrar todo".to_string(),
                }
                on_confirm=confirm_clear
                on_cancel=Rc::new(move || set_confirm_clear_all.set(false))
            />
        </section>
    }
}
