pub mod date_window;
pub mod render;
pub mod swim_service;
