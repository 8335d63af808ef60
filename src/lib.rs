//! Tripwise - AI-powered travel planner
//!
//! This library asks a hosted text-generation model for travel options
//! between two cities, parses the free-text reply into structured rows,
//! and derives price/time bar charts and a CSV export from them.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod tabulate;
pub mod web;

// Re-export core types for public API
pub use config::AppConfig;
pub use error::PlannerError;
pub use llm::{GeminiClient, TravelOptionsGenerator, build_prompt};
pub use models::{ChartPoint, ChartSeries, TravelOption, TravelQuery, TravelTable};
pub use tabulate::{coerce_numeric, tabulate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;
