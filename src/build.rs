mod accordion;
mod builder;
pub mod dom;
mod highlight;
mod loader;
mod paths;
pub mod pipeline;
mod render;
mod sanitize;
mod scroll;
pub mod source;
mod toc;

pub use builder::{BuildError, BuildResult, Builder};
