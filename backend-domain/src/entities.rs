// Domain entities
pub mod beyblade;
pub mod config;
pub mod import;
pub mod inventory;
pub mod match_record;
pub mod player;
pub mod report;

pub use beyblade::*;
pub use config::*;
pub use import::*;
pub use inventory::*;
pub use match_record::*;
pub use player::*;
pub use report::*;
