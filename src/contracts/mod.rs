pub mod abi;
pub mod encoding;
pub mod execution;
pub mod handle;
pub mod operations;

// Re-export key types for convenience
pub use abi::*;
pub use execution::*;
pub use operations::*;
