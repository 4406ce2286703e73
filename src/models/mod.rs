pub mod chunk;
pub mod deepgram;
pub mod lemma;
pub mod transcript;

pub use chunk::*;
pub use deepgram::*;
pub use lemma::*;
pub use transcript::*;
