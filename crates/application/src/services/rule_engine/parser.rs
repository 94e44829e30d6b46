use hoopoe_domain::DomainError;
use regex::Regex;

use super::rule::{MatchAction, MatchRule, RewriteRule, RuleKind};
use crate::services::dns_syntax;

const KIND_OFFSET: usize = 0;
const ACTION_OFFSET: usize = 1;
const PATTERN_OFFSET: usize = 2;
const REPLACEMENT_OFFSET: usize = 3;

const REPLACEMENTS_OPTION: &str = "replacements";

#[derive(Debug)]
pub enum ParsedRule {
    Pass(MatchRule),
    Allow(MatchRule),
    Deny(MatchRule),
    Rewrite(RewriteRule),
}

/// Parses `KIND ACTION PATTERN [REPLACEMENT] [key=value ...]`.
pub fn parse_rule(index: usize, definition: &str) -> Result<ParsedRule, DomainError> {
    let invalid = |reason: String| DomainError::InvalidRule {
        index,
        rule: definition.to_string(),
        reason,
    };

    let fields: Vec<&str> = definition.split_whitespace().collect();
    let kind_token = fields
        .get(KIND_OFFSET)
        .ok_or_else(|| invalid("empty rule definition".to_string()))?;
    let kind: RuleKind = kind_token.parse().map_err(invalid)?;

    if fields.len() < kind.min_fields() {
        return Err(invalid(format!(
            "{} definition must have at least {} fields",
            kind,
            kind.min_fields()
        )));
    }

    let action: MatchAction = fields[ACTION_OFFSET].parse().map_err(invalid)?;
    let pattern = fields[PATTERN_OFFSET];

    let filter: Option<fn(MatchRule) -> ParsedRule> = match kind {
        RuleKind::Pass => Some(ParsedRule::Pass),
        RuleKind::Allow => Some(ParsedRule::Allow),
        RuleKind::Deny => Some(ParsedRule::Deny),
        RuleKind::Rewrite => None,
    };

    if let Some(wrap) = filter {
        if let Some(option) = fields.get(PATTERN_OFFSET + 1) {
            return Err(invalid(format!(
                "option '{}' not supported for {} rules",
                option, kind
            )));
        }
        return build_matcher(action, pattern).map(wrap);
    }

    let mut replacement = fields[REPLACEMENT_OFFSET].to_string();
    let max_replacements =
        parse_options(action, &fields[REPLACEMENT_OFFSET + 1..]).map_err(invalid)?;

    if action != MatchAction::Regexp && !dns_syntax::is_valid_pattern(pattern) {
        return Err(invalid(format!("pattern must be a valid dns string: {}", pattern)));
    }
    if !dns_syntax::has_valid_template_brackets(pattern) {
        return Err(invalid(format!(
            "pattern with template must be valid templating: {}",
            pattern
        )));
    }

    // Capture references make label boundaries unknowable until match
    // time, so regex replacements only get a character check here.
    let replacement_ok = if action == MatchAction::Regexp {
        let literal = dns_syntax::strip_capture_references(&replacement);
        dns_syntax::has_valid_characters(&literal)
            && dns_syntax::has_valid_template_brackets(&literal)
    } else {
        dns_syntax::is_valid_pattern(&replacement)
            && dns_syntax::has_valid_template_brackets(&replacement)
    };
    if !replacement_ok {
        return Err(invalid(format!(
            "replacement must be a valid dns string: {}",
            replacement
        )));
    }

    if !replacement.ends_with('.') {
        replacement.push('.');
    }

    let matcher = build_matcher(action, pattern)?;
    Ok(ParsedRule::Rewrite(RewriteRule::new(
        matcher,
        replacement,
        max_replacements,
    )))
}

fn build_matcher(action: MatchAction, pattern: &str) -> Result<MatchRule, DomainError> {
    if action != MatchAction::Regexp {
        return Ok(MatchRule::literal(action, pattern));
    }

    Regex::new(pattern)
        .map(MatchRule::regex)
        .map_err(|e| DomainError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

fn parse_options(action: MatchAction, options: &[&str]) -> Result<Option<usize>, String> {
    let mut max_replacements = None;

    for option in options {
        let (key, value) = option
            .split_once('=')
            .ok_or_else(|| format!("malformed option '{}', expected key=value", option))?;

        if !key.eq_ignore_ascii_case(REPLACEMENTS_OPTION) {
            return Err(format!("unknown option '{}'", key));
        }
        if action != MatchAction::Substring {
            return Err(format!("option '{}' only applies to Substring rewrites", key));
        }

        let count: usize = value
            .parse()
            .map_err(|_| format!("option '{}' expects a positive integer, got '{}'", key, value))?;
        if count == 0 {
            return Err(format!("option '{}' must be at least 1", key));
        }
        max_replacements = Some(count);
    }

    Ok(max_replacements)
}
