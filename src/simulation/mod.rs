pub mod display;
pub mod generator;
pub mod input;
