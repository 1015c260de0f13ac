#![allow(clippy::needless_pass_by_value)]

pub mod app;
pub mod map_canvas;
pub mod prompt_dialog;
pub mod report_detail;
pub mod report_map;
pub mod report_source;
pub mod reports_list;
pub mod route_editor;
pub mod toast;
pub mod window;
