pub mod dtos;
pub mod handlers;

pub use handlers::{check_content, submit_review};
