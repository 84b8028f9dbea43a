pub mod beyblade_commands;
pub mod import_commands;
pub mod inventory_commands;
pub mod match_commands;
pub mod player_commands;

pub use beyblade_commands::*;
pub use import_commands::*;
pub use inventory_commands::*;
pub use match_commands::*;
pub use player_commands::*;
