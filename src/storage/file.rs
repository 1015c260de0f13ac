use chrono::NaiveDate;
use leptos::{wasm_bindgen, web_sys};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

pub const CSV_MIME: &str = "text/csv;charset=utf-8";
pub const JSON_MIME: &str = "application/json";

/// `reportes-comunity-YYYY-MM-DD.csv`
#[must_use]
pub fn reports_export_filename(date: NaiveDate) -> String {
    format!("reportes-comunity-{}.csv", date.format("%Y-%m-%d"))
}

/// `rutas-comunity-YYYY-MM-DD.json`
#[must_use]
pub fn routes_export_filename(date: NaiveDate) -> String {
    format!("rutas-comunity-{}.json", date.format("%Y-%m-%d"))
}

/// Trigger a browser download of `text` as a file
///
/// # Errors
/// Returns an error if blob creation, URL generation, or DOM manipulation fails
pub fn trigger_download(text: &str, filename: &str, mime_type: &str) -> Result<(), String> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(text));

    let blob_options = web_sys::BlobPropertyBag::new();
    blob_options.set_type(mime_type);

    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &blob_options)
        .map_err(|_| "Failed to create blob")?;

    let window = web_sys::window().ok_or("No window available")?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Failed to create object URL")?;

    let document = window.document().ok_or("No document available")?;
    let anchor = document
        .create_element("a")
        .map_err(|_| "Failed to create anchor element")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "Failed to cast to anchor element")?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    let _ = web_sys::Url::revoke_object_url(&url);

    Ok(())
}

/// Read a user-picked file as text and hand it to `on_load`
///
/// # Errors
/// Returns an error if the reader cannot be created or started
pub fn read_file_as_text(file: &web_sys::File, on_load: impl FnOnce(String) + 'static) -> Result<(), String> {
    let reader = web_sys::FileReader::new().map_err(|_| "Failed to create FileReader")?;
    let reader_clone = reader.clone();

    let onload = Closure::once(move |_: web_sys::Event| {
        let Some(text) = reader_clone.result().ok().and_then(|result| result.as_string()) else {
            leptos::logging::error!("File contents are not text");
            return;
        };
        on_load(text);
    });

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    reader.read_as_text(file).map_err(|_| "Failed to read file".to_string())
}

/// Write `text` to the system clipboard
///
/// # Errors
/// Returns an error if there is no window or the browser refuses the write
pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window available")?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|_| "Clipboard write rejected".to_string())
}
