//! Session token issuance
//!
//! Mints LiveKit access tokens that let one identity join one room:
//! - `CredentialRequest` / `SessionMetadata` - wire types
//! - `TokenIssuer` - validates configuration and fields, signs the token
//! - `room_name` - unique room names per session attempt

mod issuer;
mod request;
mod room;

pub use issuer::{IssuedToken, TokenError, TokenIssuer, MISSING_FIELDS_MESSAGE, TOKEN_TTL};
pub use request::{CredentialRequest, Mode, SessionMetadata};
pub use room::{room_name, ROOM_PREFIX};
