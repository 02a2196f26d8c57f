pub mod aggregate;
pub mod compare;
pub mod project;
