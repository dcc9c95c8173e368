pub mod chunk;
pub mod label;
pub mod result;

pub use chunk::*;
pub use label::*;
pub use result::*;
