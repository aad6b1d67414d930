//! Payload transformation pipeline.
//!
//! Bridges vocabulary drift between the two instances. Rules are pure
//! string rewrites registered per stage and applied in registration order:
//! the pre-convert stage sees the EAD XML, the post-convert stage sees the
//! converted import JSON. New rules append without touching control flow.

use std::fmt;

/// Which payload a rule operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// EAD XML, before format conversion.
    PreConvert,
    /// Import JSON, after format conversion.
    PostConvert,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::PreConvert => write!(f, "pre-convert"),
            Stage::PostConvert => write!(f, "post-convert"),
        }
    }
}

/// A single named rewrite rule.
struct Rule {
    name: &'static str,
    apply: fn(&str) -> String,
}

/// Ordered rule lists for both stages.
pub struct Transforms {
    pre: Vec<Rule>,
    post: Vec<Rule>,
}

impl Default for Transforms {
    /// The known drift bridges between source and destination vocabularies.
    fn default() -> Self {
        let mut transforms = Transforms::empty();
        transforms.push(Stage::PreConvert, "normalize-other-level", normalize_other_level);
        transforms.push(Stage::PostConvert, "force-publish", force_publish);
        transforms
    }
}

impl Transforms {
    /// A pipeline with no rules registered.
    pub fn empty() -> Self {
        Transforms {
            pre: Vec::new(),
            post: Vec::new(),
        }
    }

    /// Append a rule to a stage. Order of registration is order of application.
    pub fn push(&mut self, stage: Stage, name: &'static str, apply: fn(&str) -> String) {
        let rule = Rule { name, apply };
        match stage {
            Stage::PreConvert => self.pre.push(rule),
            Stage::PostConvert => self.post.push(rule),
        }
    }

    /// Run a payload through a stage's rules, left to right.
    pub fn apply(&self, stage: Stage, payload: &str) -> String {
        let rules = match stage {
            Stage::PreConvert => &self.pre,
            Stage::PostConvert => &self.post,
        };
        rules.iter().fold(payload.to_string(), |payload, rule| {
            tracing::debug!("applying {stage} rule {}", rule.name);
            (rule.apply)(&payload)
        })
    }
}

/// The source spells the level-of-description value with a space; the
/// destination's vocabulary has no such entry.
fn normalize_other_level(payload: &str) -> String {
    payload.replace("other level", "otherlevel")
}

/// The converter may reset the publish flag; imported records must stay
/// visible (unpublished records were already filtered upstream).
fn force_publish(payload: &str) -> String {
    payload.replace("\"publish\":false", "\"publish\":true")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_convert_normalizes_other_level() {
        let transforms = Transforms::default();
        let xml = r#"<c01 level="other level"><did/></c01>"#;
        assert_eq!(
            transforms.apply(Stage::PreConvert, xml),
            r#"<c01 level="otherlevel"><did/></c01>"#
        );
    }

    #[test]
    fn post_convert_forces_publish_true() {
        let transforms = Transforms::default();
        let json = r#"{"publish":false,"title":"Papers"}"#;
        assert_eq!(
            transforms.apply(Stage::PostConvert, json),
            r#"{"publish":true,"title":"Papers"}"#
        );
    }

    #[test]
    fn stages_do_not_cross() {
        let transforms = Transforms::default();
        let json = r#"{"publish":false}"#;
        assert_eq!(transforms.apply(Stage::PreConvert, json), json);
    }

    #[test]
    fn rules_apply_in_registration_order() {
        let mut transforms = Transforms::empty();
        transforms.push(Stage::PreConvert, "a-to-b", |p| p.replace('a', "b"));
        transforms.push(Stage::PreConvert, "b-to-c", |p| p.replace('b', "c"));
        // a → b → c only if the rules ran in order.
        assert_eq!(transforms.apply(Stage::PreConvert, "a"), "c");
    }

    #[test]
    fn empty_pipeline_is_identity() {
        let transforms = Transforms::empty();
        assert_eq!(transforms.apply(Stage::PostConvert, "payload"), "payload");
    }
}
