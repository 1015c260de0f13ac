use crate::components::window::Window;
use crate::error::EditorError;
use leptos::{
    component, event_target_value, view, IntoView, ReadSignal, Signal, SignalGet, SignalGetUntracked, SignalSet,
    SignalWith, WriteSignal,
};
use std::rc::Rc;

/// Blocking question asked before an editor action runs
pub enum PromptKind {
    /// Removal that cannot be undone. `message` names what goes away.
    Destructive { message: Signal<String>, confirm_text: String },
    /// Single text field; `check` runs on every keystroke and confirming is
    /// blocked while it fails
    Text {
        label: String,
        value: ReadSignal<String>,
        set_value: WriteSignal<String>,
        check: fn(&str) -> Result<(), EditorError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldState {
    can_confirm: bool,
    /// Hidden while the field is still untouched
    message: Option<String>,
}

fn field_state(value: &str, check: fn(&str) -> Result<(), EditorError>) -> FieldState {
    match check(value) {
        Ok(()) => FieldState { can_confirm: true, message: None },
        Err(e) => FieldState {
            can_confirm: false,
            message: (!value.is_empty()).then(|| e.to_string()),
        },
    }
}

#[allow(clippy::needless_pass_by_value)]
#[component]
pub fn PromptDialog(
    #[prop(into)] is_open: Signal<bool>,
    #[prop(into)] title: Signal<String>,
    kind: PromptKind,
    on_confirm: Rc<dyn Fn()>,
    on_cancel: Rc<dyn Fn()>,
) -> impl IntoView {
    let on_cancel_window = on_cancel.clone();

    let body = match kind {
        PromptKind::Destructive { message, confirm_text } => view! {
            <p class="prompt-message">{move || message.get()}</p>
            <div class="prompt-buttons">
                <button class="btn" on:click=move |_| on_cancel()>"Cancelar"</button>
                <button class="btn btn-danger" on:click=move |_| on_confirm()>{confirm_text}</button>
            </div>
        }
        .into_view(),
        PromptKind::Text { label, value, set_value, check } => {
            let state = Signal::derive(move || value.with(|v| field_state(v, check)));
            let submit = Rc::new(move || {
                if state.get_untracked().can_confirm {
                    on_confirm();
                }
            });
            let submit_enter = submit.clone();
            let on_cancel_escape = on_cancel.clone();

            view! {
                <label class="prompt-label">{label}</label>
                <input
                    type="text"
                    class="prompt-input"
                    class:invalid=move || state.with(|s| s.message.is_some())
                    prop:value=value
                    on:input=move |ev| set_value.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            submit_enter();
                        } else if ev.key() == "Escape" {
                            on_cancel_escape();
                        }
                    }
                    prop:autofocus=true
                />
                <p class="prompt-error">{move || state.with(|s| s.message.clone())}</p>
                <div class="prompt-buttons">
                    <button class="btn" on:click=move |_| on_cancel()>"Cancelar"</button>
                    <button
                        class="btn btn-primary"
                        disabled=move || !state.with(|s| s.can_confirm)
                        on:click=move |_| submit()
                    >
                        "Aceptar"
                    </button>
                </div>
            }
            .into_view()
        }
    };

    view! {
        <Window is_open=is_open title=title on_close=move || on_cancel_window() width=360.0>
            <div class="prompt-dialog">{body}</div>
        </Window>
    }
}
