//! Utility functions.

/// Largest message body the transports accept, in characters.
pub const MESSAGE_LIMIT: usize = 4096;

/// Format a duration in seconds as a compact human string, e.g. `2d 3h 5m`.
pub fn format_duration(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, mins)
    } else if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

/// Split `text` into pieces of at most `limit` characters.
///
/// Breaks at the last newline inside the limit when there is one, so lines
/// stay whole where possible. A `limit` of zero means no splitting.
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    if limit == 0 {
        return if text.is_empty() { Vec::new() } else { vec![text.to_string()] };
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        let hard = rest
            .char_indices()
            .nth(limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let cut = match rest[..hard].rfind('\n') {
            Some(i) if i > 0 => i,
            _ => hard,
        };
        chunks.push(rest[..cut].to_string());
        rest = rest[cut..].trim_start_matches('\n');
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3_660), "1h 1m");
        assert_eq!(format_duration(2 * 86_400 + 3 * 3_600 + 300), "2d 3h 5m");
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_text("abc", 10), vec!["abc"]);
        assert!(chunk_text("", 10).is_empty());
    }

    #[test]
    fn chunks_prefer_line_breaks() {
        let chunks = chunk_text("aaaa\nbbbb\ncccc", 10);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn zero_limit_returns_text_whole() {
        assert_eq!(chunk_text("a\nb", 0), vec!["a\nb"]);
        assert!(chunk_text("", 0).is_empty());
    }

    #[test]
    fn long_lines_are_cut_on_char_boundaries() {
        let text = "بسم".repeat(5);
        let chunks = chunk_text(&text, 4);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
        assert_eq!(chunks.concat(), text);
    }
}
