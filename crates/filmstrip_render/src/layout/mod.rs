pub mod canvas;
pub mod fit;
pub mod plan;
