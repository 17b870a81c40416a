mod addr;
mod probe;

pub use addr::*;
pub use probe::*;
