pub mod input;
pub mod output;
pub mod sinks;

pub use input::*;
pub use output::*;
pub use sinks::*;
