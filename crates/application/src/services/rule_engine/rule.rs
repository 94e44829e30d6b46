use regex::Regex;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Pass,
    Allow,
    Deny,
    Rewrite,
}

impl RuleKind {
    /// Tokens a definition needs before any options.
    pub fn min_fields(&self) -> usize {
        match self {
            Self::Rewrite => 4,
            _ => 3,
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pass" | "p" => Ok(Self::Pass),
            "allow" | "a" => Ok(Self::Allow),
            "deny" | "d" => Ok(Self::Deny),
            "rewrite" | "rw" => Ok(Self::Rewrite),
            _ => Err(format!("unknown rule kind '{}'", s)),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pass => "Pass",
            Self::Allow => "Allow",
            Self::Deny => "Deny",
            Self::Rewrite => "Rewrite",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    Prefix,
    Suffix,
    Substring,
    Regexp,
}

impl FromStr for MatchAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "suffix" => Ok(Self::Suffix),
            "substring" => Ok(Self::Substring),
            "regexp" => Ok(Self::Regexp),
            _ => Err(format!("action '{}' not supported", s)),
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Literal(String),
    Regex(Regex),
}

/// Compiled predicate shared by all rule kinds.
#[derive(Debug, Clone)]
pub struct MatchRule {
    action: MatchAction,
    matcher: Matcher,
}

impl MatchRule {
    pub fn literal(action: MatchAction, pattern: &str) -> Self {
        Self {
            action,
            matcher: Matcher::Literal(pattern.to_string()),
        }
    }

    pub fn regex(regex: Regex) -> Self {
        Self {
            action: MatchAction::Regexp,
            matcher: Matcher::Regex(regex),
        }
    }

    pub fn pattern(&self) -> &str {
        match &self.matcher {
            Matcher::Literal(p) => p,
            Matcher::Regex(r) => r.as_str(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match (&self.matcher, self.action) {
            (Matcher::Regex(re), _) => re.is_match(name),
            (Matcher::Literal(p), MatchAction::Prefix) => name.starts_with(p.as_str()),
            (Matcher::Literal(p), MatchAction::Suffix) => name.ends_with(p.as_str()),
            (Matcher::Literal(p), _) => name.contains(p.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RewriteRule {
    matcher: MatchRule,
    replacement: String,
    max_replacements: Option<usize>,
}

impl RewriteRule {
    pub fn new(matcher: MatchRule, replacement: String, max_replacements: Option<usize>) -> Self {
        Self {
            matcher,
            replacement,
            max_replacements,
        }
    }

    /// Rewritten name when the rule matches, `None` otherwise.
    pub fn apply(&self, name: &str) -> Option<String> {
        if !self.matcher.matches(name) {
            return None;
        }

        let rewritten = match &self.matcher.matcher {
            Matcher::Regex(re) => re.replace_all(name, self.replacement.as_str()).into_owned(),
            Matcher::Literal(pattern) => match self.matcher.action {
                MatchAction::Prefix => {
                    format!("{}{}", self.replacement, &name[pattern.len()..])
                }
                MatchAction::Suffix => {
                    format!("{}{}", &name[..name.len() - pattern.len()], self.replacement)
                }
                _ => match self.max_replacements {
                    Some(n) => name.replacen(pattern.as_str(), &self.replacement, n),
                    None => name.replace(pattern.as_str(), &self.replacement),
                },
            },
        };

        Some(rewritten)
    }
}
