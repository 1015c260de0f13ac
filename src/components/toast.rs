use crate::constants::TOAST_DURATION_MS;
use crate::debounce::Debouncer;
use leptos::{component, create_signal, store_value, view, IntoView, ReadSignal, SignalGet, SignalSet, SignalUpdate, StoredValue, WriteSignal};

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Toast {
    pub message: String,
    pub visible: bool,
    pub is_error: bool,
}

impl Toast {
    #[must_use]
    pub fn new(message: String) -> Self {
        Self {
            message,
            visible: true,
            is_error: false,
        }
    }

    #[must_use]
    pub fn error(message: String) -> Self {
        Self {
            is_error: true,
            ..Self::new(message)
        }
    }
}

/// Shows a toast and hides it again after a fixed delay. A new message
/// restarts the delay.
#[derive(Clone, Copy)]
pub struct Toaster {
    toast: ReadSignal<Toast>,
    set_toast: WriteSignal<Toast>,
    hide: StoredValue<Debouncer>,
}

impl Toaster {
    #[must_use]
    pub fn new() -> Self {
        let (toast, set_toast) = create_signal(Toast::default());
        Self {
            toast,
            set_toast,
            hide: store_value(Debouncer::new(TOAST_DURATION_MS)),
        }
    }

    #[must_use]
    pub fn toast(&self) -> ReadSignal<Toast> {
        self.toast
    }

    pub fn show(&self, message: impl Into<String>) {
        self.display(Toast::new(message.into()));
    }

    pub fn show_error(&self, message: impl Into<String>) {
        self.display(Toast::error(message.into()));
    }

    fn display(&self, toast: Toast) {
        self.set_toast.set(toast);
        let set_toast = self.set_toast;
        self.hide.with_value(|hide| {
            hide.schedule(move || {
                let _ = set_toast.try_update(|t| t.visible = false);
            });
        });
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
#[must_use]
pub fn ToastNotification(toast: ReadSignal<Toast>) -> impl IntoView {
    view! {
        {move || {
            let t = toast.get();
            if t.visible {
                let class = if t.is_error { "toast toast-visible toast-error" } else { "toast toast-visible" };
                view! {
                    <div class=class>
                        {t.message}
                    </div>
                }.into_view()
            } else {
                view! { <div class="toast"></div> }.into_view()
            }
        }}
    }
}
