//! Resume studio: build a resume from structured data, render it with one of
//! the visual templates, write a matching cover letter and collect reviews.

pub mod builder;
pub mod cli;
pub mod config;
pub mod cover_letter;
pub mod export;
pub mod pacing;
pub mod photo;
pub mod render;
pub mod reviews;
pub mod storage;
pub mod template_system;
pub mod types;
pub mod utils;
pub mod web;

pub use builder::{BuilderSession, BuilderTab, FunnelError, FunnelStep};
pub use config::{AppConfig, LogFormat};
pub use cover_letter::{generate as generate_cover_letter, CoverLetterError, CoverLetterService};
pub use export::Exporter;
pub use pacing::{PacedTask, Pacer, PacingError};
pub use render::{preview, render, Preview, RenderedResume};
pub use reviews::{ReviewError, ReviewRepository, ReviewService, StoredReviews};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use template_system::{
    Category, CategoryFilter, LayoutKind, TemplateCatalog, TemplateDescriptor, TemplateError,
};
pub use web::start_web_server;
