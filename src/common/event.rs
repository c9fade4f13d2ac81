// src/common/event.rs

/// Sentence the sensor emits when a target enters the detection zone.
pub const PRESENCE_ASSERTED: &[u8] = b"$DFHPD,1, , , *";
/// Sentence the sensor emits when the detection zone becomes empty.
pub const PRESENCE_CLEARED: &[u8] = b"$DFHPD,0, , , *";

/// Unsolicited presence notification.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PresenceEvent {
    Asserted,
    Cleared,
}

impl PresenceEvent {
    pub fn is_present(&self) -> bool {
        matches!(self, PresenceEvent::Asserted)
    }
}

/// Decodes a completed line (terminator already stripped).
///
/// Only exact matches count; anything else, including the sensor's other
/// status output, yields `None`.
pub fn parse_event_line(line: &[u8]) -> Option<PresenceEvent> {
    match line {
        PRESENCE_ASSERTED => Some(PresenceEvent::Asserted),
        PRESENCE_CLEARED => Some(PresenceEvent::Cleared),
        _ => None,
    }
}
