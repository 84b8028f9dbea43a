pub mod context;
pub mod lifecycle;
pub mod telemetry;

pub use context::AppContext;
pub use lifecycle::{build_router_with_layers, run_import, run_standalone};
