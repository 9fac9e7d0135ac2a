pub mod models;
pub mod prompt_templates;
pub mod render;
pub mod service;

pub use models::*;
pub use render::{RenderedSection, render_report, render_sections};
pub use service::{AppState, build_router, create_app, create_app_state};
