// Domain value objects
pub mod bey_type;
pub mod event_type;
pub mod identifiers;
pub mod side;
pub mod winner_policy;

pub use bey_type::*;
pub use event_type::*;
pub use identifiers::*;
pub use side::*;
pub use winner_policy::*;
