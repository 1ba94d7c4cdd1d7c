pub mod engine;
pub mod shapes;
