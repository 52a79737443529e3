pub mod signal;
pub mod time;

pub use signal::*;
pub use time::*;
