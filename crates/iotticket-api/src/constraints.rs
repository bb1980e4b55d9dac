// Field restrictions imposed by the IoT-Ticket API.
//
// Limits are applied when a field is read (accessors and serialized
// payloads), never when it is written. Lengths count chars, so a
// multi-byte code point is never split.

/// Maximum length of names, manufacturers and device types.
pub const MAX_NAME_LENGTH: usize = 100;
/// Maximum length of a device description.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
/// Maximum length of an attribute key or value.
pub const MAX_ATTRIBUTE_LENGTH: usize = 255;
/// Maximum number of attributes on a device.
pub const MAX_NUMBER_OF_ATTRIBUTES: usize = 50;
/// Maximum length of a datanode path.
pub const MAX_PATH_LENGTH: usize = 1000;
/// Maximum number of components in a datanode path.
pub const MAX_PATH_DEPTH: usize = 10;
/// Maximum length of a datanode unit.
pub const MAX_UNIT_LENGTH: usize = 10;
/// Length of a server-assigned device id.
pub const DEVICE_ID_LENGTH: usize = 32;

/// Maximum number of datanodes in a single read request.
pub const MAX_READ_DATANODES: usize = 10;
/// Maximum number of values per datanode in a single read request.
pub const MAX_READ_LIMIT: u32 = 10_000;

/// First `max` chars of `value`, or `value` unchanged when it fits.
pub fn truncate(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// Restrict a slash-separated path to its first [`MAX_PATH_DEPTH`]
/// non-empty components, then to [`MAX_PATH_LENGTH`] chars.
pub fn restrict_path(path: &str) -> String {
    let mut depth = 0;
    let mut kept: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        if !segment.is_empty() {
            depth += 1;
        }
        if depth > MAX_PATH_DEPTH {
            // Cut paths end at their last kept component.
            while kept.last().is_some_and(|s| s.is_empty()) {
                kept.pop();
            }
            break;
        }
        kept.push(segment);
    }
    truncate(&kept.join("/"), MAX_PATH_LENGTH).to_owned()
}

/// Whether `id` has the shape of a server-assigned device id.
pub fn is_device_id(id: &str) -> bool {
    id.len() == DEVICE_ID_LENGTH && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_values() {
        assert_eq!(truncate("sensor", MAX_NAME_LENGTH), "sensor");
        assert_eq!(truncate("", 10), "");
        let exact = "x".repeat(MAX_NAME_LENGTH);
        assert_eq!(truncate(&exact, MAX_NAME_LENGTH), exact);
    }

    #[test]
    fn truncate_cuts_to_exact_length() {
        let long = "a".repeat(MAX_DESCRIPTION_LENGTH + 40);
        let cut = truncate(&long, MAX_DESCRIPTION_LENGTH);
        assert_eq!(cut.chars().count(), MAX_DESCRIPTION_LENGTH);
        assert!(long.starts_with(cut));
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let value = "äöü°C€";
        assert_eq!(truncate(value, 3), "äöü");
        assert_eq!(truncate(value, 6), value);
    }

    #[test]
    fn path_depth_is_limited() {
        let deep: Vec<String> = (1..=12).map(|i| format!("n{i}")).collect();
        let path = format!("/{}", deep.join("/"));
        let restricted = restrict_path(&path);
        assert_eq!(restricted, "/n1/n2/n3/n4/n5/n6/n7/n8/n9/n10");
        assert_eq!(restrict_path("a/b/c/d/e/f/g/h/i/j//k"), "a/b/c/d/e/f/g/h/i/j");
        assert_eq!(restrict_path("a/b/c/d/e/f/g/h/i/j/"), "a/b/c/d/e/f/g/h/i/j/");
    }

    #[test]
    fn shallow_paths_are_unchanged() {
        assert_eq!(restrict_path("/Swift"), "/Swift");
        assert_eq!(restrict_path("engine/temps/"), "engine/temps/");
        assert_eq!(restrict_path(""), "");
    }

    #[test]
    fn path_length_is_limited() {
        let long = format!("/{}", "p".repeat(MAX_PATH_LENGTH + 5));
        assert_eq!(restrict_path(&long).chars().count(), MAX_PATH_LENGTH);
    }

    #[test]
    fn device_id_shape() {
        assert!(is_device_id("4e0f17895ae04c57a6d24baaae08b6b3"));
        assert!(!is_device_id("4e0f17895ae04c57a6d24baaae08b6b"));
        assert!(!is_device_id("4e0f17895ae04c57-6d24baaae08b6b3"));
    }
}
