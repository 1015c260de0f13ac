mod file;

pub use file::{
    copy_to_clipboard, read_file_as_text, reports_export_filename, routes_export_filename, trigger_download,
    CSV_MIME, JSON_MIME,
};
