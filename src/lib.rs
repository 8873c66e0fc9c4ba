pub mod api;
pub mod barcode;
pub mod config;
pub mod event_handlers;
pub mod session;
pub mod session_display;
pub mod types;
pub mod utils;
