pub mod artifact;
pub mod book;

pub use artifact::*;
pub use book::*;
