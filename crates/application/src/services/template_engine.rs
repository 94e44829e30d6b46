use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

pub const REGION_TOKEN: &str = "{REGION}";

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.-]*\.[.-]*").expect("separator run pattern"));
static DASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("dash run pattern"));
static DANGLING_EDGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[.-]+|-+$").expect("dangling edge pattern"));

/// Resolves `{...}` placeholders inside a query name.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    separator_run: Regex,
    dash_run: Regex,
    dangling_edges: Regex,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self {
            separator_run: SEPARATOR_RUN.clone(),
            dash_run: DASH_RUN.clone(),
            dangling_edges: DANGLING_EDGES.clone(),
        }
    }

    /// Expands the region placeholder in `name`.
    ///
    /// Returns `None` when braces survive substitution; such a name must be
    /// refused, never forwarded. With an empty region every placeholder is
    /// dropped along with the separators it leaves dangling.
    pub fn expand<'a>(&self, name: &'a str, region: &str) -> Option<Cow<'a, str>> {
        if !name.contains('{') {
            return Some(Cow::Borrowed(name));
        }

        let expanded = if region.is_empty() {
            self.clean_leftovers(&strip_placeholders(name))
        } else {
            replace_region_token(name, region)
        };

        if expanded.is_empty() || expanded.contains(['{', '}']) {
            return None;
        }

        Some(Cow::Owned(expanded))
    }

    /// Collapses the separators a removed token leaves behind: any run
    /// holding a dot becomes one dot, dash runs become one dash, and
    /// leading separators or trailing dashes are dropped.
    fn clean_leftovers(&self, name: &str) -> String {
        let collapsed = self.separator_run.replace_all(name, ".");
        let collapsed = self.dash_run.replace_all(&collapsed, "-");
        self.dangling_edges.replace_all(&collapsed, "").into_owned()
    }
}

/// Substitutes every `{REGION}` token, ignoring ASCII case since query
/// names are lower-cased before the rules run.
fn replace_region_token(name: &str, region: &str) -> String {
    let mut out = String::with_capacity(name.len() + region.len());
    let mut rest = name;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];
        if candidate.len() >= REGION_TOKEN.len()
            && candidate.as_bytes()[..REGION_TOKEN.len()].eq_ignore_ascii_case(REGION_TOKEN.as_bytes())
        {
            out.push_str(region);
            rest = &candidate[REGION_TOKEN.len()..];
        } else {
            out.push('{');
            rest = &candidate[1..];
        }
    }

    out.push_str(rest);
    out
}

/// Drops every balanced `{...}` token that has no nested brace.
fn strip_placeholders(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(close) if after.as_bytes()[close] == b'}' => {
                out.push_str(&rest[..open]);
                rest = &after[close + 1..];
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
