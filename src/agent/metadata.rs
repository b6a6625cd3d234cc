use crate::token::SessionMetadata;
use serde_json::Value;
use tracing::debug;

/// Pick the session metadata out of room and participant metadata strings.
///
/// Sources are tried in order (room first); the first one holding a
/// non-empty JSON object wins. Unparseable sources are skipped.
pub fn resolve_metadata<'a, I>(sources: I) -> SessionMetadata
where
    I: IntoIterator<Item = &'a str>,
{
    for raw in sources {
        if raw.trim().is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                debug!("Skipping unparseable metadata: {}", e);
                continue;
            }
        };

        let is_populated = value.as_object().is_some_and(|obj| !obj.is_empty());
        if !is_populated {
            continue;
        }

        match serde_json::from_value(value) {
            Ok(metadata) => return metadata,
            Err(e) => debug!("Skipping metadata with unexpected shape: {}", e),
        }
    }

    SessionMetadata::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Mode;

    #[test]
    fn test_room_metadata_wins() {
        let meta = resolve_metadata([
            r#"{"userId":"u1","mode":"conduct","interviewId":"i1"}"#,
            r#"{"userId":"u2"}"#,
        ]);

        assert_eq!(meta.user_id.as_deref(), Some("u1"));
        assert_eq!(meta.mode, Mode::Conduct);
        assert_eq!(meta.interview_id.as_deref(), Some("i1"));
    }

    #[test]
    fn test_skips_empty_and_invalid_sources() {
        let meta = resolve_metadata(["", "{}", "not json", "[1,2]", r#"{"userId":"u3"}"#]);

        assert_eq!(meta.user_id.as_deref(), Some("u3"));
        assert_eq!(meta.mode, Mode::Create);
    }

    #[test]
    fn test_defaults_without_sources() {
        assert_eq!(resolve_metadata(Vec::<&str>::new()), SessionMetadata::default());
    }
}
