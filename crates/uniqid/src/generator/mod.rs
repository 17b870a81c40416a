mod atomic;
mod cell;
mod mutex;

pub use atomic::*;
pub use cell::*;
pub(crate) use mutex::*;
