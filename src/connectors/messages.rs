// src/connectors/messages.rs
use serde::Serialize;

/// Discord-compatible webhook body. Slack and most chat bridges accept the
/// same `content` field.
#[derive(Debug, Serialize)]
pub struct WebhookMessage<'a> {
    pub content: &'a str,
}

/// Splits `text` into parts of at most `max_len` characters, breaking on
/// line boundaries where possible. A single line longer than `max_len` is
/// cut at the character limit.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let mut line_chars: Vec<char> = line.chars().collect();

        while line_chars.len() > max_len {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = line_chars.split_off(max_len);
            parts.push(line_chars.into_iter().collect());
            line_chars = rest;
        }

        let extra = if current.is_empty() {
            line_chars.len()
        } else {
            line_chars.len() + 1
        };
        if current_len + extra > max_len {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current_len += line_chars.len();
        current.extend(line_chars);
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_one_part() {
        assert_eq!(split_message("a\nb", 2000), vec!["a\nb"]);
    }

    #[test]
    fn splits_on_line_boundaries() {
        let parts = split_message("aaaa\nbbbb\ncccc", 9);
        assert_eq!(parts, vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn hard_splits_overlong_line() {
        let parts = split_message("xy\nabcdefgh", 3);
        assert_eq!(parts, vec!["xy", "abc", "def", "gh"]);
        assert!(parts.iter().all(|p| p.chars().count() <= 3));
    }

    #[test]
    fn empty_text_has_no_parts() {
        assert!(split_message("", 10).is_empty());
    }

    #[test]
    fn serializes_content_field() {
        let body = serde_json::to_string(&WebhookMessage { content: "hi" }).unwrap();
        assert_eq!(body, r#"{"content":"hi"}"#);
    }
}
