pub mod catalog;
pub mod config;
pub mod filler;
pub mod mapper;
pub mod submission;
pub mod types;

pub use submission::{FormSubmission, ValidationError};
pub use types::*;
