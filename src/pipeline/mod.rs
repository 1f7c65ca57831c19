pub mod persistence;
pub mod render;
pub mod session;
