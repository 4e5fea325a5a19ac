pub mod board;
pub mod command;
pub mod detail;
pub mod filters;
pub mod week;
