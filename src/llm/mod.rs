pub mod client;
pub mod prompts;
pub mod service;
pub mod validation;

pub use client::*;
pub use prompts::*;
pub use service::*;
pub use validation::*;
