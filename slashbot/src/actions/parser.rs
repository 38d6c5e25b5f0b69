//! Tokenizes assistant text into an ordered sequence of action tags.
//!
//! Recognizes two forms: self-closing `<tag attr="value" .../>` and paired
//! `<tag attr="value">...</tag>`, where the tag name must be one of the
//! names passed to [`parse_actions`] (anything else is left as plain text).
//! Attribute values are double-quoted with `\"` and `\\` escapes; text
//! inside backtick fences (`` ` `` or ``` ``` ```) is never scanned for tags,
//! so an action tag mentioned in a code sample doesn't get executed.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAction {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub actions: Vec<ParsedAction>,
    pub warnings: Vec<ParseWarning>,
}

/// Scans `text` for action tags whose name appears in `known_tags`.
pub fn parse_actions(text: &str, known_tags: &[&str]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let bytes = text.as_bytes();
    let mut i = 0usize;
    let mut in_fence = false;
    let mut fence_marker: &str = "";

    while i < bytes.len() {
        if !in_fence && text[i..].starts_with("```") {
            in_fence = true;
            fence_marker = "```";
            i += 3;
            continue;
        }
        if in_fence && fence_marker == "```" && text[i..].starts_with("```") {
            in_fence = false;
            i += 3;
            continue;
        }
        if !in_fence && bytes[i] == b'`' {
            in_fence = true;
            fence_marker = "`";
            i += 1;
            continue;
        }
        if in_fence && fence_marker == "`" && bytes[i] == b'`' {
            in_fence = false;
            i += 1;
            continue;
        }
        if in_fence {
            i += 1;
            continue;
        }

        if bytes[i] == b'<' {
            match try_parse_tag(text, i, known_tags) {
                TagAttempt::Parsed(action, end) => {
                    outcome.actions.push(action);
                    i = end;
                    continue;
                }
                TagAttempt::Malformed(snippet) => {
                    outcome.warnings.push(ParseWarning {
                        message: format!("skipped malformed action tag: {snippet}"),
                    });
                    i += 1;
                    continue;
                }
                TagAttempt::NotATag => {
                    i += 1;
                    continue;
                }
            }
        }

        i += 1;
    }

    outcome
}

enum TagAttempt {
    Parsed(ParsedAction, usize),
    Malformed(String),
    NotATag,
}

fn try_parse_tag(text: &str, start: usize, known_tags: &[&str]) -> TagAttempt {
    let rest = &text[start..];
    if !rest.starts_with('<') {
        return TagAttempt::NotATag;
    }

    let Some(name_end) = rest[1..].find(|c: char| c.is_whitespace() || c == '>' || c == '/') else {
        return TagAttempt::NotATag;
    };
    let name = &rest[1..1 + name_end];
    if name.is_empty() || !known_tags.contains(&name) {
        return TagAttempt::NotATag;
    }

    let Some(open_end_rel) = rest.find('>') else {
        return TagAttempt::Malformed(first_line(rest));
    };
    let open_tag = &rest[..=open_end_rel];
    let self_closing = open_tag.trim_end_matches('>').trim_end().ends_with('/');

    let attrs_src = if self_closing {
        &open_tag[1 + name.len()..open_tag.len() - 2]
    } else {
        &open_tag[1 + name.len()..open_tag.len() - 1]
    };
    let Some(attributes) = parse_attributes(attrs_src) else {
        return TagAttempt::Malformed(first_line(open_tag));
    };

    if self_closing {
        return TagAttempt::Parsed(
            ParsedAction {
                tag: name.to_string(),
                attributes,
                body: None,
            },
            start + open_end_rel + 1,
        );
    }

    let close_tag = format!("</{name}>");
    let body_start = start + open_end_rel + 1;
    let Some(close_rel) = text[body_start..].find(&close_tag) else {
        return TagAttempt::Malformed(first_line(open_tag));
    };
    let body = text[body_start..body_start + close_rel].to_string();
    let end = body_start + close_rel + close_tag.len();

    TagAttempt::Parsed(
        ParsedAction {
            tag: name.to_string(),
            attributes,
            body: Some(body),
        },
        end,
    )
}

fn parse_attributes(src: &str) -> Option<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    let mut chars = src.char_indices().peekable();

    loop {
        while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
            chars.next();
        }
        let Some(&(key_start, _)) = chars.peek() else {
            break;
        };
        let key_end = key_start
            + src[key_start..]
                .find(|c: char| c == '=' || c.is_whitespace())
                .unwrap_or(src.len() - key_start);
        let key = src[key_start..key_end].trim();
        if key.is_empty() {
            break;
        }
        while chars.peek().map(|(i, _)| *i < key_end).unwrap_or(false) {
            chars.next();
        }
        while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
            chars.next();
        }
        match chars.peek() {
            Some((_, '=')) => {
                chars.next();
            }
            _ => return None,
        }
        while matches!(chars.peek(), Some((_, c)) if c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            Some((_, '"')) => {}
            _ => return None,
        }
        let mut value = String::new();
        loop {
            match chars.next() {
                Some((_, '\\')) => match chars.next() {
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, c)) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => return None,
                },
                Some((_, '"')) => break,
                Some((_, c)) => value.push(c),
                None => return None,
            }
        }
        attrs.insert(key.to_string(), value);
    }

    Some(attrs)
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or(s).chars().take(120).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS: &[&str] = &["read", "edit", "bash"];

    #[test]
    fn parses_self_closing_tag() {
        let out = parse_actions(r#"before <read path="a.rs"/> after"#, TAGS);
        assert_eq!(out.actions.len(), 1);
        assert_eq!(out.actions[0].tag, "read");
        assert_eq!(out.actions[0].attributes.get("path").unwrap(), "a.rs");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn parses_paired_tag_with_body() {
        let out = parse_actions(r#"<bash timeoutSecs="5">ls -la</bash>"#, TAGS);
        assert_eq!(out.actions.len(), 1);
        assert_eq!(out.actions[0].body.as_deref(), Some("ls -la"));
    }

    #[test]
    fn ignores_tags_inside_backtick_fence() {
        let out = parse_actions("text `<read path=\"a\"/>` more", TAGS);
        assert!(out.actions.is_empty());
    }

    #[test]
    fn ignores_tags_inside_triple_fence() {
        let out = parse_actions("```\n<read path=\"a\"/>\n```", TAGS);
        assert!(out.actions.is_empty());
    }

    #[test]
    fn ignores_unknown_tag_names() {
        let out = parse_actions(r#"<made-up x="1"/>"#, TAGS);
        assert!(out.actions.is_empty());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn handles_escaped_quotes_in_attribute_value() {
        let out = parse_actions(r#"<read path="a \"quoted\" b"/>"#, TAGS);
        assert_eq!(out.actions[0].attributes.get("path").unwrap(), "a \"quoted\" b");
    }

    #[test]
    fn parses_multiple_actions_in_order() {
        let out = parse_actions(r#"<read path="a"/><read path="b"/>"#, TAGS);
        assert_eq!(out.actions.len(), 2);
        assert_eq!(out.actions[0].attributes.get("path").unwrap(), "a");
        assert_eq!(out.actions[1].attributes.get("path").unwrap(), "b");
    }

    #[test]
    fn reports_malformed_unterminated_tag() {
        let out = parse_actions(r#"<read path="a"#, TAGS);
        assert!(out.actions.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }
}
