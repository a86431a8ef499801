pub mod color;
pub mod compose;
pub mod layers;
pub mod source;
