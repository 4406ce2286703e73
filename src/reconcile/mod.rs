pub mod engine;
pub mod interpolate;
pub mod lemma;
pub mod segments;

pub use engine::*;
pub use interpolate::*;
pub use lemma::*;
pub use segments::*;
