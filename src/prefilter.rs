use crate::category::Category;
use crate::config::{Config, Criteria, NarrowRule};
use crate::email::{extract_subject, EmailRecord};
use anyhow::Context;
use regex::Regex;

/// The cheap, deterministic stage that runs before every AI scan. Rules are
/// evaluated in order and the first match wins; a non-UNFILTERED verdict is
/// terminal and the model is never invoked for that email.
pub struct BasicScan {
    length_threshold: usize,
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    name: String,
    criteria: Criteria,
    pattern: Regex,
    verdict: Category,
}

impl BasicScan {
    /// Compile the configured narrowing rules up front so a bad pattern
    /// fails at construction instead of mid-scan.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut rules = Vec::with_capacity(config.rules.len());
        for rule in &config.rules {
            rules.push(CompiledRule::compile(rule)?);
        }
        Ok(BasicScan {
            length_threshold: config.length_threshold,
            rules,
        })
    }

    /// Classify what can be decided locally. Returns UNFILTERED when no rule
    /// has an opinion, which downstream stages treat as "pass through".
    pub fn narrow(&self, email: &EmailRecord) -> Category {
        // Oversized messages skip the model entirely.
        if email.message.len() > self.length_threshold {
            log::debug!(
                "message of {} chars exceeds threshold {}, short-circuiting",
                email.message.len(),
                self.length_threshold
            );
            return Category::Long;
        }

        for rule in &self.rules {
            if rule.matches(email) {
                log::debug!("narrowing rule '{}' matched: {}", rule.name, rule.verdict);
                return rule.verdict;
            }
        }

        Category::Unfiltered
    }
}

impl CompiledRule {
    fn compile(rule: &NarrowRule) -> anyhow::Result<Self> {
        let source = match &rule.criteria {
            Criteria::SenderPattern { pattern }
            | Criteria::SubjectPattern { pattern }
            | Criteria::BodyPattern { pattern } => pattern,
        };
        let pattern = Regex::new(source)
            .with_context(|| format!("invalid pattern in rule '{}'", rule.name))?;
        Ok(CompiledRule {
            name: rule.name.clone(),
            criteria: rule.criteria.clone(),
            pattern,
            verdict: rule.verdict,
        })
    }

    fn matches(&self, email: &EmailRecord) -> bool {
        match &self.criteria {
            Criteria::SenderPattern { .. } => self.pattern.is_match(&email.sender),
            Criteria::SubjectPattern { .. } => {
                let subject = email
                    .header_subject()
                    .map(str::to_string)
                    .or_else(|| extract_subject(&email.message));
                subject.map(|s| self.pattern.is_match(&s)).unwrap_or(false)
            }
            Criteria::BodyPattern { .. } => self.pattern.is_match(&email.message),
        }
    }
}
