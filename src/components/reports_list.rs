use crate::api::reports::{LoadedReports, ReportSource};
use crate::api::RequestTracker;
use crate::components::report_detail::ReportDetail;
use crate::components::report_source::spawn_report_load;
use crate::components::toast::Toaster;
use crate::config::DataConfig;
use crate::constants::SEARCH_DEBOUNCE_MS;
use crate::debounce::Debouncer;
use crate::models::Report;
use crate::report_list::{
    export_reports_csv, page_buttons, paginate, query_reports, report_stats, PageButton, ReportFilter, SortKey,
};
use crate::storage::{reports_export_filename, trigger_download, CSV_MIME};
use crate::submission::view_on_map_href;
use crate::time::{format_report_date, today};
use leptos::{
    component, create_memo, create_signal, event_target_value, store_value, view, web_sys, Callback, Callable, CollectView,
    IntoView, Memo, Show, Signal, SignalGet, SignalSet, SignalWith, StoredValue, WriteSignal,
};
use std::rc::Rc;

fn optional_filter(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[component]
fn StatsBar(reports: Memo<Vec<Report>>, config: StoredValue<DataConfig>) -> impl IntoView {
    let stats = create_memo(move |_| {
        reports.with(|r| config.with_value(|c| report_stats(r, c.status_types.keys().map(String::as_str))))
    });

    view! {
        <div class="stats-bar">
            <div class="stat-card">
                <span class="stat-number">{move || stats.with(|s| s.total)}</span>
                <span class="stat-label">"Total"</span>
            </div>
            {move || stats.with(|s| {
                s.by_status
                    .iter()
                    .map(|(status, count)| {
                        let style = config.with_value(|c| c.status_style(status));
                        view! {
                            <div class="stat-card" style=format!("border-color: {};", style.color)>
                                <span class="stat-number" style=format!("color: {};", style.color)>{*count}</span>
                                <span class="stat-label">{status.clone()}</span>
                            </div>
                        }
                    })
                    .collect_view()
            })}
        </div>
    }
}

#[component]
fn ReportCard(report: Report, config: StoredValue<DataConfig>, on_select: Callback<Report>) -> impl IntoView {
    let style = config.with_value(|c| c.problem_style(&report.problem_type));
    let status = config.with_value(|c| c.status_style(&report.status));
    let priority = report.priority;
    let address = if report.address.trim().is_empty() {
        "Ver en mapa".to_string()
    } else {
        report.address.clone()
    };
    let map_href = view_on_map_href(report.location);
    let date = format_report_date(report.date, &report.raw_date);
    let days = format!("{} días", report.days_since);
    let selected = report.clone();

    view! {
        <div class="report-card" on:click=move |_| on_select.call(selected.clone())>
            <div class="report-card-header">
                <div class="report-card-icon">{style.icon}</div>
                <div class="report-card-title-content">
                    <h3 class="report-card-title">{report.problem_type}</h3>
                    <span class=format!("priority-badge priority-badge-{}", priority.as_str())>
                        {priority.badge_label()}
                    </span>
                    <span
                        class="status-badge"
                        style=format!("color: {}; background-color: {};", status.color, status.bg_color)
                    >
                        {report.status}
                    </span>
                </div>
                <span class="report-card-date">{days}</span>
            </div>
            <div class="report-card-grid">
                <div class="report-card-item">
                    <label class="report-card-label">"Reportado por"</label>
                    <p class="report-card-value">{report.author}</p>
                </div>
                <div class="report-card-item">
                    <label class="report-card-label">"Fecha del reporte"</label>
                    <p class="report-card-value">{date}</p>
                </div>
                <div class="report-card-item full-width">
                    <label class="report-card-label">"Ubicación"</label>
                    <p class="report-card-value">{address}</p>
                </div>
            </div>
            <p class="report-card-description">{report.description}</p>
            <div class="report-card-footer">
                <a
                    class="btn btn-map-view"
                    href=map_href
                    target="_blank"
                    rel="noopener"
                    on:click=|ev| ev.stop_propagation()
                >
                    "📍 Ver en Mapa"
                </a>
            </div>
        </div>
    }
}

#[component]
fn Pagination(page: Signal<usize>, total_pages: Signal<usize>, range_label: Signal<String>, set_page: WriteSignal<usize>) -> impl IntoView {
    view! {
        <div class="pagination">
            <Show when=move || { total_pages.get() > 1 }>
                <button disabled=move || { page.get() <= 1 } on:click=move |_| set_page.set(page.get().saturating_sub(1).max(1))>
                    "❮ Anterior"
                </button>
                {move || page_buttons(page.get(), total_pages.get())
                    .into_iter()
                    .map(|button| match button {
                        PageButton::Page(n) => view! {
                            <button class:active=move || page.get() == n on:click=move |_| set_page.set(n)>
                                {n}
                            </button>
                        }.into_view(),
                        PageButton::Ellipsis => view! { <span>"..."</span> }.into_view(),
                    })
                    .collect_view()}
                <button disabled=move || { page.get() >= total_pages.get() } on:click=move |_| set_page.set(page.get() + 1)>
                    "Siguiente ❯"
                </button>
            </Show>
            <div class="pagination-info">{move || range_label.get()}</div>
        </div>
    }
}

/// Searchable, paginated list of reports with statistics and CSV export
#[allow(clippy::needless_pass_by_value, clippy::too_many_lines)]
#[component]
#[must_use]
pub fn ReportsList(config: StoredValue<DataConfig>, toaster: Toaster) -> impl IntoView {
    let (loaded, set_loaded) = create_signal(None::<LoadedReports>);
    let (loading, set_loading) = create_signal(false);
    let (type_filter, set_type_filter) = create_signal(String::new());
    let (status_filter, set_status_filter) = create_signal(String::new());
    let (search_input, set_search_input) = create_signal(String::new());
    let (search, set_search) = create_signal(String::new());
    let (sort_key, set_sort_key) = create_signal(config.with_value(|c| c.list.default_sort));
    let (page, set_page) = create_signal(1usize);
    let (selected, set_selected) = create_signal(None::<Report>);
    let tracker = store_value(RequestTracker::new());
    let search_debounce = store_value(Debouncer::new(SEARCH_DEBOUNCE_MS));
    let per_page = config.with_value(|c| c.list.items_per_page);

    let reload = move || {
        spawn_report_load(config.with_value(|c| c.reports_url.clone()), tracker, set_loaded, set_loading, toaster);
    };
    reload();

    let all_reports = create_memo(move |_| loaded.with(|l| l.as_ref().map(|l| l.reports.clone()).unwrap_or_default()));
    let filter = create_memo(move |_| ReportFilter {
        problem_type: optional_filter(type_filter.get()),
        status: optional_filter(status_filter.get()),
        search: search.get(),
    });
    let filtered = create_memo(move |_| {
        all_reports.with(|reports| filter.with(|f| query_reports(reports, f, sort_key.get())))
    });

    let current_page = Signal::derive(move || filtered.with(|r| paginate(r, page.get(), per_page).page));
    let total_pages = Signal::derive(move || filtered.with(|r| paginate(r, page.get(), per_page).total_pages));
    let range_label = Signal::derive(move || filtered.with(|r| paginate(r, page.get(), per_page).range_label()));
    let page_items = Signal::derive(move || filtered.with(|r| paginate(r, page.get(), per_page).items.to_vec()));

    let on_search_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        set_search_input.set(value.clone());
        search_debounce.with_value(|d| {
            d.schedule(move || {
                let _ = set_search.try_set(value);
                let _ = set_page.try_set(1);
            });
        });
    };

    let export = move |_| {
        let result = filtered.with(|r| export_reports_csv(r))
            .and_then(|csv| trigger_download(&csv, &reports_export_filename(today()), CSV_MIME));
        if let Err(e) = result {
            leptos::logging::error!("CSV export failed: {e}");
            toaster.show_error(format!("No se pudo exportar: {e}"));
        }
    };

    let on_select = Callback::new(move |report: Report| set_selected.set(Some(report)));

    let type_options: Vec<String> = config.with_value(|c| c.problem_types.keys().cloned().collect());
    let status_options: Vec<String> = config.with_value(|c| c.status_types.keys().cloned().collect());

    view! {
        <div class="reports-list-page">
            <StatsBar reports=all_reports config=config />

            <div class="filters">
                <input
                    type="search"
                    class="search-input"
                    placeholder="Buscar por descripción, nombre, tipo o dirección"
                    prop:value=search_input
                    on:input=on_search_input
                />
                <select on:change=move |ev| {
                    set_type_filter.set(event_target_value(&ev));
                    set_page.set(1);
                }>
                    <option value="">"Todos los tipos"</option>
                    {type_options.into_iter().map(|t| view! { <option value=t.clone()>{t}</option> }).collect_view()}
                </select>
                <select on:change=move |ev| {
                    set_status_filter.set(event_target_value(&ev));
                    set_page.set(1);
                }>
                    <option value="">"Todos los estados"</option>
                    {status_options.into_iter().map(|s| view! { <option value=s.clone()>{s}</option> }).collect_view()}
                </select>
                <select on:change=move |ev| {
                    if let Some(key) = SortKey::parse(&event_target_value(&ev)) {
                        set_sort_key.set(key);
                        set_page.set(1);
                    }
                }>
                    {SortKey::ALL.into_iter().map(|key| view! {
                        <option value=key.as_str() selected=move || sort_key.get() == key>{key.label()}</option>
                    }).collect_view()}
                </select>
                <button class="btn" on:click=move |_| reload() disabled=move || loading.get()>"🔄 Actualizar"</button>
                <button class="btn btn-success" on:click=export>"⬇ Exportar CSV"</button>
            </div>

            <Show when=move || loaded.with(|l| l.as_ref().is_some_and(|l| l.source == ReportSource::Sample))>
                <p class="sample-notice">"Mostrando datos de ejemplo"</p>
            </Show>

            <div class="reports-list">
                {move || {
                    if loading.get() && loaded.with(Option::is_none) {
                        return view! { <div class="loading">"Cargando reportes..."</div> }.into_view();
                    }
                    let items = page_items.get();
                    if items.is_empty() {
                        return view! {
                            <div class="empty-state">
                                <h3>"No se encontraron reportes"</h3>
                                <p>"Intenta ajustar los filtros de búsqueda"</p>
                            </div>
                        }.into_view();
                    }
                    items
                        .into_iter()
                        .map(|report| view! { <ReportCard report=report config=config on_select=on_select /> })
                        .collect_view()
                }}
            </div>

            <Pagination page=current_page total_pages=total_pages range_label=range_label set_page=set_page />

            <ReportDetail
                report=selected
                config=config
                on_close=Rc::new(move || set_selected.set(None))
                toaster=toaster
            />
        </div>
    }
}
