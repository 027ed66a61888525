pub mod interface_encoder;

pub use interface_encoder::*;
