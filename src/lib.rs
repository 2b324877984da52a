pub mod animation;
pub mod basic_rasterizer;
pub mod config;
pub mod rasterizer;
pub mod render;
pub mod scene;
pub mod surface;
pub mod tui;
