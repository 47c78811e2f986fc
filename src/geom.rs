pub mod plane;
pub mod point;
