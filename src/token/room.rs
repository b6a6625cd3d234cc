use super::request::Mode;
use uuid::Uuid;

pub const ROOM_PREFIX: &str = "prepwise";

/// Generate a room name for one session attempt.
///
/// The random suffix keeps concurrent sessions for the same user or
/// interview in separate rooms.
pub fn room_name(mode: Mode, entity_id: &str) -> String {
    format!("{}-{}-{}-{}", ROOM_PREFIX, mode, entity_id, Uuid::new_v4().simple())
}
