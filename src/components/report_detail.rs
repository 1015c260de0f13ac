use crate::components::toast::Toaster;
use crate::components::window::Window;
use crate::config::DataConfig;
use crate::models::Report;
use crate::storage::copy_to_clipboard;
use crate::submission::view_on_map_href;
use crate::time::format_report_date;
use leptos::{component, spawn_local, view, IntoView, Signal, SignalGet, SignalWith, StoredValue};
use std::rc::Rc;

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Copy `"lat, lng"`; the text is shown in the toast when the clipboard is unavailable
fn copy_location(report: &Report, toaster: Toaster) {
    let text = report.location_text();
    spawn_local(async move {
        match copy_to_clipboard(&text).await {
            Ok(()) => toaster.show("Ubicación copiada al portapapeles"),
            Err(e) => {
                leptos::logging::warn!("Clipboard write failed: {e}");
                toaster.show(format!("Ubicación: {text}"));
            }
        }
    });
}

#[allow(clippy::needless_pass_by_value)]
#[component]
#[must_use]
pub fn ReportDetail(
    #[prop(into)] report: Signal<Option<Report>>,
    config: StoredValue<DataConfig>,
    on_close: Rc<dyn Fn()>,
    toaster: Toaster,
) -> impl IntoView {
    let title = Signal::derive(move || {
        report.with(|r| r.as_ref().map_or_else(String::new, |r| r.problem_type.clone()))
    });

    view! {
        <Window
            is_open=Signal::derive(move || report.with(Option::is_some))
            title=title
            on_close=move || on_close()
            width=480.0
        >
            {move || report.get().map(|r| {
                let style = config.with_value(|c| c.problem_style(&r.problem_type));
                let status = config.with_value(|c| c.status_style(&r.status));
                let priority = r.priority;
                let map_href = view_on_map_href(r.location);
                let location = if r.address.trim().is_empty() {
                    format!("Coordenadas: {}", r.location_text())
                } else {
                    r.address.clone()
                };
                let for_copy = r.clone();
                view! {
                    <div class="report-detail">
                        <div class="detail-header">
                            <span class="report-type-icon">{style.icon}</span>
                            <span
                                class="status-badge"
                                style=format!("color: {}; background-color: {};", status.color, status.bg_color)
                            >
                                {r.status.clone()}
                            </span>
                        </div>
                        <div class="detail-info">
                            <div class="info-row">
                                <div class="info-label">"Reportado por"</div>
                                <div class="info-value">{r.author.clone()}</div>
                            </div>
                            <div class="info-row">
                                <div class="info-label">"Descripción"</div>
                                <div class="info-value">{or_placeholder(&r.description, "Sin descripción")}</div>
                            </div>
                            <div class="info-row">
                                <div class="info-label">"Dirección"</div>
                                <div class="info-value">{or_placeholder(&r.address, "No disponible")}</div>
                            </div>
                            <div class="info-row">
                                <div class="info-label">"Fecha"</div>
                                <div class="info-value">
                                    {format_report_date(r.date, &r.raw_date)}
                                    <span class="days-ago">{format!(" (Hace {} días)", r.days_since)}</span>
                                </div>
                            </div>
                            <div class="info-row">
                                <div class="info-label">"Ubicación"</div>
                                <div class="info-value">{location}</div>
                            </div>
                            <div class="info-row">
                                <div class="info-label">"Prioridad"</div>
                                <div class=format!("info-value priority-{}", priority.as_str())>{priority.short_label()}</div>
                            </div>
                        </div>
                        <div class="detail-actions">
                            <a class="btn btn-primary" href=map_href target="_blank" rel="noopener">
                                "📍 Ver en Mapa"
                            </a>
                            <button class="btn btn-success" on:click=move |_| copy_location(&for_copy, toaster)>
                                "📋 Copiar Ubicación"
                            </button>
                        </div>
                    </div>
                }
            })}
        </Window>
    }
}
