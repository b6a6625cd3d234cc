use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a session defines a new interview or conducts an existing one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Create,
    Conduct,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Create => "create",
            Mode::Conduct => "conduct",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Mode::Create),
            "conduct" => Ok(Mode::Conduct),
            other => Err(format!("unknown mode '{}', expected create or conduct", other)),
        }
    }
}

/// Body of `POST /api/livekit/token`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    #[serde(default)]
    pub room_name: Option<String>,

    #[serde(default)]
    pub user_id: Option<String>,

    /// Defaults to `create` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_id: Option<String>,

    /// Display name for the participant (falls back to the user id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl CredentialRequest {
    pub fn new(room_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            room_name: Some(room_name.into()),
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_interview_id(mut self, interview_id: impl Into<String>) -> Self {
        self.interview_id = Some(interview_id.into());
        self
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }
}

/// Metadata payload embedded in every issued token.
///
/// The interview agent reads this back from the room to learn who it is
/// talking to and which flow to run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub interview_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let req: CredentialRequest = serde_json::from_str(
            r#"{"roomName":"r1","userId":"u1","mode":"conduct","interviewId":"i1"}"#,
        )
        .unwrap();

        assert_eq!(req.room_name.as_deref(), Some("r1"));
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert_eq!(req.mode, Some(Mode::Conduct));
        assert_eq!(req.interview_id.as_deref(), Some("i1"));
    }

    #[test]
    fn test_request_fields_are_optional() {
        let req: CredentialRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, CredentialRequest::default());
    }

    #[test]
    fn test_metadata_serializes_null_interview() {
        let meta = SessionMetadata {
            user_id: Some("u1".to_string()),
            mode: Mode::Create,
            interview_id: None,
        };

        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"userId":"u1","mode":"create","interviewId":null}"#);
    }
}
