pub mod ambient;
pub mod shell;
