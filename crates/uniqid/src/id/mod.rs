mod uniq;

pub use uniq::*;
