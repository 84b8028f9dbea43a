pub mod batch_file;
pub mod in_memory_store;
pub mod rest_store;

pub use batch_file::*;
pub use in_memory_store::*;
pub use rest_store::*;
