pub mod session;

pub use session::generate_identifier;
pub use session::generate_session_token;
pub use session::hash_session_token;
pub use session::SESSION_TOKEN_BYTES;
