/// Strip markdown code fences from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) if !rest[..idx].contains(' ') => &rest[idx + 1..],
        _ => rest,
    };
    body.trim_end_matches("```").trim()
}

/// Strip one pair of matching quotes wrapping the whole response.
pub fn strip_wrapping_quotes(response: &str) -> &str {
    let trimmed = response.trim();
    for (open, close) in [('"', '"'), ('\u{201C}', '\u{201D}')] {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|s| s.strip_suffix(close))
        {
            if !inner.contains(open) && !inner.contains(close) {
                return inner.trim();
            }
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\nThe cat sat.\n```"), "The cat sat.");
        assert_eq!(strip_code_blocks("```text\nThe cat sat.\n```"), "The cat sat.");
        assert_eq!(strip_code_blocks("  plain text  "), "plain text");
    }

    #[test]
    fn test_strip_wrapping_quotes() {
        assert_eq!(strip_wrapping_quotes("\"The cat sat.\""), "The cat sat.");
        assert_eq!(strip_wrapping_quotes("\u{201C}The cat sat.\u{201D}"), "The cat sat.");
        assert_eq!(
            strip_wrapping_quotes("\"Stop,\" she said. \"Now.\""),
            "\"Stop,\" she said. \"Now.\""
        );
        assert_eq!(strip_wrapping_quotes("no quotes"), "no quotes");
    }
}
