pub mod text;
pub mod timeout;

pub use text::*;
pub use timeout::bounded;
