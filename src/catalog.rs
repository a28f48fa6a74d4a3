//! Research stage catalog.
//!
//! The catalog is the ordered list of perspectives a report is built from. The
//! order is significant: it drives both the order in which stages run and the
//! order of sections in the final document.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the topic in query and content templates.
pub const TOPIC_PLACEHOLDER: &str = "{topic}";

/// The semantic category a stage belongs to. Selects the content template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    Overview,
    History,
    CurrentTrends,
    Applications,
    Challenges,
    Future,
    BestPractices,
    CaseStudies,
}

impl StageCategory {
    /// All categories in catalog order.
    pub const ALL: [StageCategory; 8] = [
        StageCategory::Overview,
        StageCategory::History,
        StageCategory::CurrentTrends,
        StageCategory::Applications,
        StageCategory::Challenges,
        StageCategory::Future,
        StageCategory::BestPractices,
        StageCategory::CaseStudies,
    ];

    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageCategory::Overview => "overview",
            StageCategory::History => "history",
            StageCategory::CurrentTrends => "current_trends",
            StageCategory::Applications => "applications",
            StageCategory::Challenges => "challenges",
            StageCategory::Future => "future",
            StageCategory::BestPractices => "best_practices",
            StageCategory::CaseStudies => "case_studies",
        }
    }

    /// Parse an identifier, falling back to `Overview` for anything unknown.
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == id.trim())
            .unwrap_or(StageCategory::Overview)
    }
}

/// One research perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Search query with a `{topic}` placeholder
    pub query_template: String,
    /// Human-readable label, also used as the section title
    pub perspective_label: String,
    /// Category that selects the content template
    pub category: StageCategory,
}

impl Stage {
    /// Create a stage.
    pub fn new(
        query_template: impl Into<String>,
        perspective_label: impl Into<String>,
        category: StageCategory,
    ) -> Self {
        Self {
            query_template: query_template.into(),
            perspective_label: perspective_label.into(),
            category,
        }
    }

    /// Render the search query for a topic.
    pub fn query(&self, topic: &str) -> String {
        if self.query_template.contains(TOPIC_PLACEHOLDER) {
            self.query_template.replace(TOPIC_PLACEHOLDER, topic)
        } else {
            format!("{} {}", topic, self.query_template)
        }
    }

    /// Source attribution written under this stage's section.
    pub fn source(&self) -> String {
        format!("Deep Research Analysis - {}", self.perspective_label)
    }
}

/// The built-in eight-perspective catalog.
pub fn default_stages() -> Vec<Stage> {
    vec![
        Stage::new(
            "{topic} overview introduction",
            "Overview & Fundamentals",
            StageCategory::Overview,
        ),
        Stage::new(
            "{topic} history background",
            "Historical Context",
            StageCategory::History,
        ),
        Stage::new(
            "{topic} latest trends developments",
            "Current Trends",
            StageCategory::CurrentTrends,
        ),
        Stage::new(
            "{topic} applications use cases",
            "Practical Applications",
            StageCategory::Applications,
        ),
        Stage::new(
            "{topic} challenges problems",
            "Challenges & Limitations",
            StageCategory::Challenges,
        ),
        Stage::new(
            "{topic} future predictions",
            "Future Outlook",
            StageCategory::Future,
        ),
        Stage::new(
            "{topic} best practices tips",
            "Best Practices",
            StageCategory::BestPractices,
        ),
        Stage::new(
            "{topic} case studies examples",
            "Case Studies",
            StageCategory::CaseStudies,
        ),
    ]
}
