/// Opening tag of an event-handler block in a `.bky` document
pub const EVENT_BLOCK_MARKER: &str = r#"<block type="component_event""#;

/// Count event-handler blocks by literal, non-overlapping substring matches
pub fn count_events(content: &str) -> usize {
    content.matches(EVENT_BLOCK_MARKER).count()
}
