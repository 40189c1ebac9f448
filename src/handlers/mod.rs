// handlers/mod.rs - review endpoints
//
// Public reads need no token. List-own, create and delete run behind the
// access token middleware, which injects `Caller`.
pub mod reviews;
pub mod status;

pub use status::{not_found, status};
