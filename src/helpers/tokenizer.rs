use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between fields, skipping leading whitespace
    OutsideField,
    /// Inside `"..."`
    InQuoted,
    /// After the closing quote, before the next separator
    QuoteClosed { tail_start: usize },
    /// Inside a bare field that started at `start`
    InUnquoted { start: usize },
}

/// Splits one line into raw fields.
///
/// Returns `None` for an empty line, which contributes no row. Unquoted fields
/// borrow from `line`; quoted fields are owned because `""` collapses to `"`.
///
/// Malformed quoting is tolerated: an unterminated quoted field runs to the end
/// of the line, and anything between a closing quote and the next separator is
/// appended to the field.
///
/// # Example
/// ```rust
/// # use columnar_frame::tokenize_line;
/// let fields = tokenize_line(r#" a , "b ""c""" ,"#, ',').unwrap();
/// assert_eq!(fields, vec!["a", r#"b "c""#, ""]);
/// ```
pub fn tokenize_line(line: &str, separator: char) -> Option<Vec<Cow<'_, str>>> {
    if line.is_empty() {
        return None;
    }

    let mut fields: Vec<Cow<'_, str>> = Vec::new();
    let mut quoted = String::new();
    let mut state = State::OutsideField;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        state = match state {
            State::OutsideField => {
                if c == separator {
                    fields.push(Cow::Borrowed(""));
                    State::OutsideField
                } else if c.is_whitespace() {
                    State::OutsideField
                } else if c == '"' {
                    quoted.clear();
                    State::InQuoted
                } else {
                    State::InUnquoted { start: i }
                }
            }
            State::InQuoted => {
                if c == '"' {
                    if matches!(chars.peek(), Some((_, '"'))) {
                        chars.next();
                        quoted.push('"');
                        State::InQuoted
                    } else {
                        State::QuoteClosed {
                            tail_start: i + c.len_utf8(),
                        }
                    }
                } else {
                    quoted.push(c);
                    State::InQuoted
                }
            }
            State::QuoteClosed { tail_start } => {
                if c == separator {
                    quoted.push_str(line[tail_start..i].trim());
                    fields.push(Cow::Owned(std::mem::take(&mut quoted)));
                    State::OutsideField
                } else {
                    state
                }
            }
            State::InUnquoted { start } => {
                if c == separator {
                    fields.push(Cow::Borrowed(line[start..i].trim_end()));
                    State::OutsideField
                } else {
                    state
                }
            }
        };
    }

    match state {
        State::OutsideField => fields.push(Cow::Borrowed("")),
        State::InQuoted => {
            let trimmed = quoted.trim_end().len();
            quoted.truncate(trimmed);
            fields.push(Cow::Owned(quoted));
        }
        State::QuoteClosed { tail_start } => {
            quoted.push_str(line[tail_start..].trim());
            fields.push(Cow::Owned(quoted));
        }
        State::InUnquoted { start } => fields.push(Cow::Borrowed(line[start..].trim_end())),
    }

    Some(fields)
}
