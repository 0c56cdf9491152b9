// Trading decision logic
pub mod threshold;

pub use threshold::{decide, TraderState};
