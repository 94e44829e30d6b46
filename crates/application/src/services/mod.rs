pub mod dns_syntax;
pub mod rule_engine;
pub mod template_engine;

pub use rule_engine::{MatchAction, RuleEngine, RuleKind, RuleVerdict};
pub use template_engine::TemplateEngine;
