pub mod app;
pub mod core;
pub mod overlay;
pub mod render;
pub mod run_effect;
pub mod textures;
