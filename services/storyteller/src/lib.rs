pub mod app;
pub mod config;
pub mod render;
pub mod shell;
pub mod speech;
