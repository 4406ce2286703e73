pub mod distance;
pub mod normalize;

pub use distance::*;
pub use normalize::*;
