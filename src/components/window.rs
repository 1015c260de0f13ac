use leptos::{wasm_bindgen, component, on_cleanup, view, MaybeSignal, Signal, Children, IntoView, store_value, create_signal, SignalSet, SignalGet, create_effect, web_sys, SignalGetUntracked, Show};
use wasm_bindgen::{prelude::*, JsCast};

// Global window z-index counter
static NEXT_Z_INDEX: std::sync::atomic::AtomicU32 = std::sync::atomic::AtomicU32::new(2000);

fn viewport_size() -> (f64, f64) {
    let window = web_sys::window();
    let width = window
        .as_ref()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(1280.0);
    let height = window
        .as_ref()
        .and_then(|w| w.inner_height().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (width, height)
}

/// Centre a window of `size` in the viewport, staggered a little so stacked
/// windows stay distinguishable
fn initial_position(size: (f64, f64)) -> (f64, f64) {
    let (viewport_width, viewport_height) = viewport_size();
    let offset = js_sys::Math::random() * 40.0;
    let x = ((viewport_width - size.0) / 2.0 + offset).max(0.0);
    let y = ((viewport_height - size.1) / 3.0 + offset).max(0.0);
    (x, y)
}

/// Floating, draggable dialog window
#[component]
pub fn Window(
    #[prop(into)] is_open: MaybeSignal<bool>,
    title: Signal<String>,
    on_close: impl Fn() + 'static,
    children: Children,
    #[prop(default = 420.0)] width: f64,
) -> impl IntoView {
    let (position, set_position) = create_signal(initial_position((width, 240.0)));
    let (is_dragging, set_is_dragging) = create_signal(false);
    let (drag_offset, set_drag_offset) = create_signal((0.0, 0.0));
    let (z_index, set_z_index) = create_signal(NEXT_Z_INDEX.fetch_add(1, std::sync::atomic::Ordering::SeqCst));

    let on_close = store_value(on_close);
    let children = store_value(children());

    let bring_to_front = move || {
        set_z_index.set(NEXT_Z_INDEX.fetch_add(1, std::sync::atomic::Ordering::SeqCst));
    };

    create_effect(move |prev_open| {
        let currently_open = is_open.get();
        if currently_open && prev_open != Some(true) {
            bring_to_front();
        }
        currently_open
    });

    let handle_mouse_down = move |ev: web_sys::MouseEvent| {
        bring_to_front();
        set_is_dragging.set(true);
        let (pos_x, pos_y) = position.get_untracked();
        set_drag_offset.set((f64::from(ev.client_x()) - pos_x, f64::from(ev.client_y()) - pos_y));
    };

    // Drag tracking lives on the body so fast moves don't escape the header
    if let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) {
        let move_handler = Closure::wrap(Box::new(move |ev: web_sys::MouseEvent| {
            if is_dragging.try_get_untracked().unwrap_or(false) {
                if let Some((offset_x, offset_y)) = drag_offset.try_get_untracked() {
                    let _ = set_position.try_set((
                        (f64::from(ev.client_x()) - offset_x).max(0.0),
                        (f64::from(ev.client_y()) - offset_y).max(0.0),
                    ));
                }
            }
        }) as Box<dyn FnMut(_)>);

        let up_handler = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let _ = set_is_dragging.try_set(false);
        }) as Box<dyn FnMut(_)>);

        let _ = body.add_event_listener_with_callback("mousemove", move_handler.as_ref().unchecked_ref());
        let _ = body.add_event_listener_with_callback("mouseup", up_handler.as_ref().unchecked_ref());

        on_cleanup(move || {
            let _ = body.remove_event_listener_with_callback("mousemove", move_handler.as_ref().unchecked_ref());
            let _ = body.remove_event_listener_with_callback("mouseup", up_handler.as_ref().unchecked_ref());
        });
    } else {
        leptos::logging::error!("Failed to get document body");
    }

    view! {
        <Show when=move || is_open.get()>
            <div
                class="window-dialog"
                style=move || {
                    let (x, y) = position.get();
                    let z = z_index.get();
                    format!("left: {x}px; top: {y}px; width: {width}px; z-index: {z};")
                }
                on:mousedown=move |_| bring_to_front()
            >
                <div class="window-header" on:mousedown=handle_mouse_down>
                    <h3>{move || title.get()}</h3>
                    <button class="close-button" on:click=move |_| on_close.with_value(|f| f())>"×"</button>
                </div>

                <div class="window-content">
                    {children.with_value(Clone::clone)}
                </div>
            </div>
        </Show>
    }
}
