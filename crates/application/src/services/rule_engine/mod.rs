mod parser;
mod rule;

pub use rule::{MatchAction, MatchRule, RewriteRule, RuleKind};

use hoopoe_domain::{DomainError, QueryResult};
use parser::{parse_rule, ParsedRule};
use tracing::{debug, info};

/// Outcome of evaluating one query name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleVerdict {
    /// Matched a Pass rule: forward the name exactly as received.
    Pass,
    /// Allowed, possibly rewritten.
    Allowed(String),
    Blocked,
}

/// Ordered pass / allow / deny / rewrite rules, compiled once at startup.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    pass: Vec<MatchRule>,
    allow: Vec<MatchRule>,
    deny: Vec<MatchRule>,
    rewrite: Vec<RewriteRule>,
    scan_all: bool,
}

impl RuleEngine {
    pub fn compile<S: AsRef<str>>(definitions: &[S], scan_all: bool) -> Result<Self, DomainError> {
        let mut engine = Self {
            scan_all,
            ..Self::default()
        };

        for (index, definition) in definitions.iter().enumerate() {
            match parse_rule(index, definition.as_ref())? {
                ParsedRule::Pass(rule) => engine.pass.push(rule),
                ParsedRule::Allow(rule) => engine.allow.push(rule),
                ParsedRule::Deny(rule) => engine.deny.push(rule),
                ParsedRule::Rewrite(rule) => engine.rewrite.push(rule),
            }
        }

        info!(
            pass = engine.pass.len(),
            allow = engine.allow.len(),
            deny = engine.deny.len(),
            rewrite = engine.rewrite.len(),
            scan_all,
            "Compiled proxy rules"
        );

        Ok(engine)
    }

    pub fn evaluate(&self, name: &str) -> RuleVerdict {
        if self.pass.iter().any(|r| r.matches(name)) {
            debug!(name, "Pass rule matched");
            return RuleVerdict::Pass;
        }

        // An empty allow list admits nothing.
        if !self.allow.iter().any(|r| r.matches(name)) {
            debug!(name, "No allow rule matched");
            return RuleVerdict::Blocked;
        }

        if let Some(rule) = self.deny.iter().find(|r| r.matches(name)) {
            debug!(name, pattern = rule.pattern(), "Deny rule matched");
            return RuleVerdict::Blocked;
        }

        let mut working = name.to_string();
        for rule in &self.rewrite {
            if let Some(rewritten) = rule.apply(&working) {
                debug!(from = %working, to = %rewritten, "Rewrite rule applied");
                working = rewritten;
                if !self.scan_all {
                    break;
                }
            }
        }

        RuleVerdict::Allowed(working)
    }

    /// Decision plus resulting name; the name is empty when blocked.
    pub fn apply(&self, name: &str) -> (QueryResult, String) {
        match self.evaluate(name) {
            RuleVerdict::Pass => (QueryResult::Allowed, name.to_string()),
            RuleVerdict::Allowed(rewritten) => (QueryResult::Allowed, rewritten),
            RuleVerdict::Blocked => (QueryResult::Blocked, String::new()),
        }
    }

    pub fn allow_count(&self) -> usize {
        self.allow.len()
    }

    pub fn rule_count(&self) -> usize {
        self.pass.len() + self.allow.len() + self.deny.len() + self.rewrite.len()
    }

    pub fn scan_all(&self) -> bool {
        self.scan_all
    }
}
