use super::request::{CredentialRequest, SessionMetadata};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use livekit_api::access_token::{AccessToken, AccessTokenError, VideoGrants};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Validity window of every issued token
pub const TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

pub const MISSING_FIELDS_MESSAGE: &str = "roomName and userId are required";

#[derive(Debug, Error)]
pub enum TokenError {
    /// A server secret is not configured; fatal for every request
    #[error("{0} is not configured")]
    MissingConfig(&'static str),

    /// The request is missing `roomName` or `userId`
    #[error("roomName and userId are required")]
    MissingField,

    #[error("failed to encode token metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("failed to sign access token: {0}")]
    Signing(#[from] AccessTokenError),
}

impl TokenError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, TokenError::MissingField)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            TokenError::MissingField => StatusCode::BAD_REQUEST,
            TokenError::MissingConfig(_) | TokenError::Metadata(_) | TokenError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// A signed token plus the facts it was issued for
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub identity: String,
    pub room: String,
    pub metadata: SessionMetadata,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Mints LiveKit access tokens scoped to a single room
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    api_key: Option<String>,
    api_secret: Option<String>,
}

impl TokenIssuer {
    pub fn new(api_key: Option<String>, api_secret: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            api_secret: api_secret.filter(|s| !s.is_empty()),
        }
    }

    /// Fails with `MissingConfig` unless both secrets are present
    pub fn credentials(&self) -> Result<(&str, &str), TokenError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(TokenError::MissingConfig("LIVEKIT_API_KEY"))?;
        let secret = self
            .api_secret
            .as_deref()
            .ok_or(TokenError::MissingConfig("LIVEKIT_API_SECRET"))?;
        Ok((key, secret))
    }

    /// Issue a token for `request`.
    ///
    /// Configuration is checked before the request fields.
    pub fn issue(&self, request: &CredentialRequest) -> Result<IssuedToken, TokenError> {
        let (api_key, api_secret) = self.credentials()?;

        let room = required(&request.room_name);
        let identity = required(&request.user_id);
        let (room, identity) = match (room, identity) {
            (Some(room), Some(identity)) => (room, identity),
            _ => {
                warn!("Rejecting token request without roomName/userId");
                return Err(TokenError::MissingField);
            }
        };

        let metadata = SessionMetadata {
            user_id: Some(identity.to_string()),
            mode: request.mode.unwrap_or_default(),
            interview_id: request.interview_id.clone(),
        };
        let metadata_json = serde_json::to_string(&metadata)?;

        let display_name = required(&request.user_name).unwrap_or(identity);

        let issued_at = Utc::now();
        let token = AccessToken::with_api_key(api_key, api_secret)
            .with_identity(identity)
            .with_name(display_name)
            .with_ttl(TOKEN_TTL)
            .with_metadata(&metadata_json)
            .with_grants(VideoGrants {
                room_join: true,
                room: room.to_string(),
                can_publish: true,
                can_subscribe: true,
                ..Default::default()
            })
            .to_jwt()?;

        info!(
            "Issued token for {} in room {} (mode={})",
            identity, room, metadata.mode
        );

        Ok(IssuedToken {
            token,
            identity: identity.to_string(),
            room: room.to_string(),
            metadata,
            issued_at,
            expires_at: issued_at + chrono::Duration::seconds(TOKEN_TTL.as_secs() as i64),
        })
    }
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Mode;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(Some("devkey".to_string()), Some("devsecret-devsecret-devsecret".to_string()))
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let issuer = TokenIssuer::new(None, Some("secret".to_string()));
        let err = issuer.issue(&CredentialRequest::new("r1", "u1")).unwrap_err();

        assert!(matches!(err, TokenError::MissingConfig("LIVEKIT_API_KEY")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_empty_secret_is_config_error() {
        let issuer = TokenIssuer::new(Some("key".to_string()), Some(String::new()));
        let err = issuer.issue(&CredentialRequest::new("r1", "u1")).unwrap_err();

        assert!(matches!(err, TokenError::MissingConfig("LIVEKIT_API_SECRET")));
    }

    #[test]
    fn test_config_checked_before_fields() {
        let issuer = TokenIssuer::new(None, None);
        let err = issuer.issue(&CredentialRequest::default()).unwrap_err();

        assert!(!err.is_client_error());
    }

    #[test]
    fn test_missing_fields_are_client_errors() {
        for req in [
            CredentialRequest::new("", "u1"),
            CredentialRequest::new("r1", ""),
            CredentialRequest::new("  ", "u1"),
            CredentialRequest::default(),
        ] {
            let err = issuer().issue(&req).unwrap_err();
            assert!(err.is_client_error());
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE);
        }
    }

    #[test]
    fn test_mode_defaults_to_create() {
        let issued = issuer().issue(&CredentialRequest::new("r1", "u1")).unwrap();

        assert!(!issued.token.is_empty());
        assert_eq!(issued.metadata.mode, Mode::Create);
        assert_eq!(issued.expires_at - issued.issued_at, chrono::Duration::minutes(30));
    }
}
