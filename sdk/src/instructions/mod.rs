pub mod builder;
pub mod sequence;

pub use builder::*;
pub use sequence::*;
