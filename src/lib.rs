pub mod error;
pub mod shell;

pub mod core;
pub mod expand;
pub mod input;
pub mod process;
