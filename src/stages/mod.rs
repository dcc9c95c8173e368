pub mod stage0_segment;
pub mod stage1_window;
pub mod stage2_classify;
pub mod stage3_route;
pub mod stage4_dispatch;

pub use stage0_segment::*;
pub use stage1_window::*;
pub use stage2_classify::*;
pub use stage3_route::*;
pub use stage4_dispatch::*;
