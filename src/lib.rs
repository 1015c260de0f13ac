#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

mod logging;

pub mod api;
pub mod components;
pub mod config;
pub mod constants;
pub mod data;
pub mod debounce;
pub mod error;
pub mod geometry;
pub mod import;
pub mod models;
pub mod report_list;
pub mod scene;
pub mod storage;
pub mod submission;
pub mod time;

pub use components::app::App;
