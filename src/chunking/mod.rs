pub mod extract;
pub mod prose;
pub mod temporal;

pub use extract::*;
pub use prose::*;
pub use temporal::*;
