pub mod traits;
pub mod alloy_executor;
#[cfg(test)]
pub mod mock;

pub use traits::*;
pub use alloy_executor::AlloyExecutor;
