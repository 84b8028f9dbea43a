pub mod beyblade_queries;
pub mod inventory_queries;
pub mod match_queries;
pub mod player_queries;
pub mod report_queries;

pub use beyblade_queries::*;
pub use inventory_queries::*;
pub use match_queries::*;
pub use player_queries::*;
pub use report_queries::*;
