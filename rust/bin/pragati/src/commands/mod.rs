pub mod config;
pub mod nav;
pub mod session;
pub mod shell;
