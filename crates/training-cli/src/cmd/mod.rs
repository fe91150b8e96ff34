pub mod config;
pub mod contact;
pub mod init;
pub mod pending;
pub mod reason;
pub mod session;
