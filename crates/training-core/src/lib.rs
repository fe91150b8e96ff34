pub mod config;
pub mod contact_course;
pub mod course_pending;
pub mod database;
pub mod duplicate;
pub mod error;
pub mod io;
pub mod matcher;
pub mod paths;
pub mod pending_reason;
pub mod records;
pub mod store;
pub mod types;
pub mod workflow;

pub use error::{Result, TrainingError};
