pub mod escape;
pub mod human;
