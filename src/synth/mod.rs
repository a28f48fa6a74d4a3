//! Content synthesis.
//!
//! Content is a deterministic template lookup keyed by the stage category, with
//! the topic substituted into every placeholder.

mod templates;

use crate::catalog::{Stage, StageCategory, TOPIC_PLACEHOLDER};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One titled unit of synthesized text, destined for one document section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub title: String,
    pub content: String,
    pub source: String,
}

impl ContentBlock {
    /// Build the block a stage produces from its synthesized content.
    pub fn for_stage(stage: &Stage, content: String) -> Self {
        Self {
            title: stage.perspective_label.clone(),
            content,
            source: stage.source(),
        }
    }
}

/// Template text for a category.
pub fn template_for(category: StageCategory) -> &'static str {
    match category {
        StageCategory::Overview => templates::OVERVIEW,
        StageCategory::History => templates::HISTORY,
        StageCategory::CurrentTrends => templates::CURRENT_TRENDS,
        StageCategory::Applications => templates::APPLICATIONS,
        StageCategory::Challenges => templates::CHALLENGES,
        StageCategory::Future => templates::FUTURE,
        StageCategory::BestPractices => templates::BEST_PRACTICES,
        StageCategory::CaseStudies => templates::CASE_STUDIES,
    }
}

/// Generate the content block text for a topic and stage.
pub fn synthesize(topic: &str, stage: &Stage) -> String {
    template_for(stage.category).replace(TOPIC_PLACEHOLDER, topic)
}

/// Produces the body text for one stage.
///
/// The pipeline calls this once per stage. Implementations may fail; a failure
/// terminates the report stream with a failure event.
pub trait ContentSource: Send + Sync {
    fn content(&self, topic: &str, stage: &Stage) -> Result<String>;
}

/// The default source: fixed templates per category.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSynthesizer;

impl ContentSource for TemplateSynthesizer {
    fn content(&self, topic: &str, stage: &Stage) -> Result<String> {
        Ok(synthesize(topic, stage))
    }
}
