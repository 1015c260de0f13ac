use crate::api::reports::{load_reports, LoadedReports, ReportSource};
use crate::api::{RequestToken, RequestTracker};
use crate::components::toast::Toaster;
use crate::time::today;
use leptos::{spawn_local, SignalSet, StoredValue, WriteSignal};

/// Store `loaded` unless a newer load began after `token` was issued.
/// Returns whether the result was kept.
fn deliver_if_current(
    tracker: StoredValue<RequestTracker>,
    token: RequestToken,
    loaded: LoadedReports,
    set_reports: WriteSignal<Option<LoadedReports>>,
) -> bool {
    if !tracker.try_with_value(|t| t.is_current(token)).unwrap_or(false) {
        return false;
    }
    set_reports.try_set(Some(loaded)).is_none()
}

/// Fetch reports from `url` into `set_reports`. A reload started before this
/// one finishes makes this one's result stale; stale results are dropped.
pub fn spawn_report_load(
    url: String,
    tracker: StoredValue<RequestTracker>,
    set_reports: WriteSignal<Option<LoadedReports>>,
    set_loading: WriteSignal<bool>,
    toaster: Toaster,
) {
    let Some(token) = tracker.try_update_value(RequestTracker::begin) else { return };
    set_loading.set(true);
    spawn_local(async move {
        let loaded = load_reports(&url, today()).await;
        let from_sample = loaded.source == ReportSource::Sample;
        if !deliver_if_current(tracker, token, loaded, set_reports) {
            return;
        }
        if from_sample {
            toaster.show_error("Error al cargar los reportes. Mostrando datos de ejemplo.");
        }
        let _ = set_loading.try_set(false);
    });
}
