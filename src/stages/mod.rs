pub mod stage1_correct;
pub mod stage2_chunk;
pub mod stage3_lemmatize;
pub mod stage4_render;
pub mod stage_text_align;

pub use stage1_correct::*;
pub use stage2_chunk::*;
pub use stage3_lemmatize::*;
pub use stage4_render::*;
pub use stage_text_align::*;
