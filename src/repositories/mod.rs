pub mod review;

pub use review::{ReviewRepository, ReviewRepositoryTrait};
