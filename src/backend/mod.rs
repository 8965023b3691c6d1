//! Key-value backends
//!
//! Backends store raw bytes under opaque keys:
//! - `memory`: in-process map, shared between clones
//! - `file`: one JSON file per entry, survives restarts

mod factory;
pub mod file;
pub mod memory;
mod store;

pub use factory::create_backend;
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use store::CacheBackend;
