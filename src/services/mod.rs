pub mod evaluation;
pub mod loader;
pub mod mapping;
pub mod matrix;
pub mod popularity;
pub mod recommendation;
