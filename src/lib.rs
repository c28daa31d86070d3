pub mod activity;
pub mod animation;
pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod event;
pub mod render;
pub mod timer;
pub mod ui;
