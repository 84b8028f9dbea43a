// Backend Application Layer

pub mod commands;
pub mod error;
pub mod importer;
pub mod metrics;
pub mod queries;
pub mod repository;
pub mod state;

pub use error::AppError;
pub use metrics::Metrics;
pub use repository::{ChildRowIds, LeagueRepository};
pub use state::AppState;
