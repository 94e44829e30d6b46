//! Label-level checks for rewrite patterns and rewritten query names.

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 253;

/// Checks a rewrite fragment: dot-separated labels of letters, digits,
/// hyphens and template braces, no label starting or ending with a hyphen.
/// One leading and one trailing dot are tolerated since fragments are cut
/// out of FQDNs.
pub fn is_valid_pattern(fragment: &str) -> bool {
    let body = strip_edge_dots(fragment);
    !body.is_empty()
        && body
            .split('.')
            .all(|label| is_valid_label(label, |c| c.is_ascii_alphanumeric() || c == '{' || c == '}'))
}

/// Checks a complete query name before it is sent upstream.
pub fn is_valid_name(name: &str) -> bool {
    let body = name.strip_suffix('.').unwrap_or(name);
    !body.is_empty()
        && body.len() <= MAX_NAME_LEN
        && body.split('.').all(|label| {
            label.len() <= MAX_LABEL_LEN
                && is_valid_label(label, |c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Character-level check for text whose label layout is only known later.
pub fn has_valid_characters(fragment: &str) -> bool {
    fragment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '{' | '}'))
}

/// Template bracket scan: no nested or unmatched braces and at most one
/// `{...}` span.
pub fn has_valid_template_brackets(fragment: &str) -> bool {
    let mut open = false;
    let mut spans = 0;

    for c in fragment.chars() {
        match c {
            '{' if open => return false,
            '{' => open = true,
            '}' if !open => return false,
            '}' => {
                open = false;
                spans += 1;
            }
            _ => {}
        }
    }

    !open && spans <= 1
}

/// Removes `$1`, `$name`, `${name}` and `$$` references from a regex
/// replacement so the remaining literal text can be syntax checked.
pub fn strip_capture_references(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
            }
            Some('{') => {
                for inner in chars.by_ref() {
                    if inner == '}' {
                        break;
                    }
                }
            }
            _ => {
                while chars
                    .peek()
                    .is_some_and(|n| n.is_ascii_alphanumeric() || *n == '_')
                {
                    chars.next();
                }
            }
        }
    }

    out
}

fn strip_edge_dots(fragment: &str) -> &str {
    let s = fragment.strip_prefix('.').unwrap_or(fragment);
    s.strip_suffix('.').unwrap_or(s)
}

fn is_valid_label(label: &str, allowed: impl Fn(char) -> bool) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c == '-' || allowed(c))
}
