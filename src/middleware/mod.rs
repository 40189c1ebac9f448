pub mod auth;
pub mod validate;

pub use auth::{access_token_middleware, Caller};
pub use validate::{decode_payload, parse_identifier, validate_path_ids};
