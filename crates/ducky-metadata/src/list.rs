//! Comma-delimited list values with quoting, as used by `tags` and
//! `dependencies` in `info.ini`
//!
//! A double quote toggles quote state and is dropped from the output; a
//! quote preceded by a backslash does not toggle and both characters stay
//! literal (the backslash is not an escape character, only a toggle
//! suppressor). Commas inside quotes belong to the token. Empty segments
//! are collapsed. An unclosed quote is tolerated: whatever is buffered at
//! end of input is flushed as the final token.

/// Tokenize a raw list value. Returns `None` when the input is empty or
/// contains no tokens, so that absent and empty lists are indistinguishable
/// in the metadata record.
pub fn parse_list(value: &str) -> Option<Vec<String>> {
    if value.is_empty() {
        return None;
    }

    let mut items = Vec::new();
    let mut buffer = String::new();
    let mut in_quotes = false;
    let mut previous: Option<char> = None;

    for ch in value.chars() {
        match ch {
            '"' if previous != Some('\\') => {
                in_quotes = !in_quotes;
            }
            ',' if !in_quotes => {
                flush(&mut buffer, &mut items);
            }
            _ => {
                buffer.push(ch);
            }
        }
        previous = Some(ch);
    }
    flush(&mut buffer, &mut items);

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn flush(buffer: &mut String, items: &mut Vec<String>) {
    let token = buffer.trim();
    if !token.is_empty() {
        items.push(token.to_string());
    }
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_list_with_spaces() {
        assert_eq!(
            parse_list("tag1, tag2 , tag3"),
            Some(vec![
                "tag1".to_string(),
                "tag2".to_string(),
                "tag3".to_string()
            ])
        );
    }

    #[test]
    fn test_consecutive_commas_collapse() {
        assert_eq!(
            parse_list("tag1,,tag2"),
            Some(vec!["tag1".to_string(), "tag2".to_string()])
        );
    }

    #[test]
    fn test_trailing_comma() {
        assert_eq!(
            parse_list("item1,item2,"),
            Some(vec!["item1".to_string(), "item2".to_string()])
        );
    }

    #[test]
    fn test_quoted_token_keeps_comma() {
        assert_eq!(
            parse_list("\"a, b\",c"),
            Some(vec!["a, b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_unclosed_quote_captures_rest() {
        assert_eq!(parse_list("\"a,b"), Some(vec!["a,b".to_string()]));
    }

    #[test]
    fn test_backslash_quote_stays_literal() {
        assert_eq!(
            parse_list("say \\\"hi\\\",next"),
            Some(vec!["say \\\"hi\\\"".to_string(), "next".to_string()])
        );
    }

    #[test]
    fn test_empty_input_is_absent() {
        assert_eq!(parse_list(""), None);
        assert_eq!(parse_list("  , ,"), None);
    }

    #[test]
    fn test_single_item() {
        assert_eq!(parse_list("single"), Some(vec!["single".to_string()]));
    }
}
