mod builder;
mod index;
mod merge;
mod tree;

pub use builder::*;
pub use index::*;
pub use merge::*;
pub use tree::*;
