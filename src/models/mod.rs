pub mod registration;
pub mod transaction;

pub use registration::*;
pub use transaction::*;
