pub mod file;
pub mod memory;
pub mod types;

pub use file::{JsonFileRegistry, Snapshot};
pub use memory::MemoryRegistry;
pub use types::{LinkRegistry, RegistryError};
