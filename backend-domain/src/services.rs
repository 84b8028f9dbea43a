// Domain Services
// Pure transformations over league data; none of them touch the store

pub mod csv_export;
pub mod csv_parser;
pub mod normalizer;
pub mod reconcile;
pub mod report;

pub use csv_export::*;
pub use csv_parser::*;
pub use normalizer::*;
pub use reconcile::*;
pub use report::*;
