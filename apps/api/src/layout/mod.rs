// Scoresheet layout engine.
// Pure and synchronous: records in, document model out. No I/O here;
// callers on the async side run it inside tokio::task::spawn_blocking.

pub mod assemble;
pub mod blocks;
pub mod fixed_table;
pub mod page;
pub mod paginator;

// Re-export the public API consumed by the upload pipeline.
pub use assemble::assemble;
