pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use memory::MemoryReviewStore;
pub use models::review::{CreatedReview, NewReview, Review};
pub use postgres::PgReviewStore;
pub use repository::{ReviewStore, StoreError};
