//! Key-value store abstraction.
//!
//! This module defines the store trait the client reads through and its
//! implementations.

mod consul;
mod memory;
mod traits;

pub use consul::ConsulKvStore;
pub use memory::MemoryStore;
pub use traits::KvStore;
