// Store and Source Port Traits (Interfaces)
// Define what the league domain needs from infrastructure

pub mod repositories;
pub mod services;

pub use repositories::*;
pub use services::*;
