use crate::api::config::load_config;
use crate::components::report_map::ReportMap;
use crate::components::reports_list::ReportsList;
use crate::components::route_editor::RouteEditorView;
use crate::components::toast::{ToastNotification, Toaster};
use crate::config::DataConfig;
use leptos::{
    component, create_signal, spawn_local, store_value, view, IntoView, Show, SignalGet, SignalSet, SignalWith,
};
use leptos_meta::{provide_meta_context, Stylesheet, Title};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AppTab {
    #[default]
    Map,
    Reports,
    Routes,
}

impl AppTab {
    const ALL: [AppTab; 3] = [AppTab::Map, AppTab::Reports, AppTab::Routes];

    fn label(self) -> &'static str {
        match self {
            AppTab::Map => "Mapa",
            AppTab::Reports => "Reportes",
            AppTab::Routes => "Rutas",
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let toaster = Toaster::new();
    let (config, set_config) = create_signal(None::<DataConfig>);
    let (active_tab, set_active_tab) = create_signal(AppTab::default());

    spawn_local(async move {
        set_config.set(Some(load_config().await));
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/comunity_map.css"/>
        <Title text="Co-Munity Map"/>

        <div class="app">
            <header class="app-header">
                <h1>"Co-Munity Map"</h1>
                <nav class="tab-bar">
                    {AppTab::ALL.into_iter().map(|tab| view! {
                        <button
                            class="tab-button"
                            class:active=move || active_tab.get() == tab
                            on:click=move |_| set_active_tab.set(tab)
                        >
                            {tab.label()}
                        </button>
                    }).collect::<Vec<_>>()}
                </nav>
            </header>

            <main class="app-content">
                <Show
                    when=move || config.with(Option::is_some)
                    fallback=|| view! { <div class="loading">"Cargando…"</div> }
                >
                    {move || config.get().map(|loaded| {
                        let config = store_value(loaded);
                        match active_tab.get() {
                            AppTab::Map => view! { <ReportMap config=config toaster=toaster /> }.into_view(),
                            AppTab::Reports => view! { <ReportsList config=config toaster=toaster /> }.into_view(),
                            AppTab::Routes => view! { <RouteEditorView config=config toaster=toaster /> }.into_view(),
                        }
                    })}
                </Show>
            </main>

            <ToastNotification toast=toaster.toast() />
        </div>
    }
}
