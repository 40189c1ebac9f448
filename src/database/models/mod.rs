pub mod review;

pub use review::{CreatedReview, NewReview, Review};
