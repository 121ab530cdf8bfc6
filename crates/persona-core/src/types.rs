//! Raw collected-content records and insight types shared across stages.

use serde::{Deserialize, Serialize};

/// One unit of user-authored text plus its origin locator.
///
/// Assembled by the loader from raw collected records and consumed by the
/// indexing pipeline; superseded by store metadata after embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub text: String,
    pub source_locator: String,
}

/// A collected post record as written by the collector.
///
/// Extra fields in the artifact are tolerated on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
}

/// A collected comment record as written by the collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
}

/// The raw content artifact for one user: everything the collector fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectedContent {
    pub username: String,
    #[serde(default)]
    pub posts: Vec<PostRecord>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
}

impl CollectedContent {
    /// Assemble content items in artifact order: posts first, then comments.
    ///
    /// Posts contribute title and body joined by a blank line; comments
    /// contribute their body. Items with empty text or no locator are kept
    /// here; the skip rule belongs to the indexing pipeline.
    pub fn items(&self) -> Vec<ContentItem> {
        let mut items = Vec::with_capacity(self.posts.len() + self.comments.len());
        for post in &self.posts {
            let text = format!("{}\n\n{}", post.title, post.selftext)
                .trim()
                .to_string();
            items.push(ContentItem {
                text,
                source_locator: post.permalink.clone().unwrap_or_default(),
            });
        }
        for comment in &self.comments {
            items.push(ContentItem {
                text: comment.body.trim().to_string(),
                source_locator: comment.permalink.clone().unwrap_or_default(),
            });
        }
        items
    }
}

/// The six fixed semantic dimensions insights are extracted along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Interests,
    Personality,
    Communication,
    Values,
    Goals,
    PainPoints,
}

impl InsightCategory {
    /// All categories, in extraction order.
    pub fn all() -> [InsightCategory; 6] {
        [
            Self::Interests,
            Self::Personality,
            Self::Communication,
            Self::Values,
            Self::Goals,
            Self::PainPoints,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interests => "interests",
            Self::Personality => "personality",
            Self::Communication => "communication",
            Self::Values => "values",
            Self::Goals => "goals",
            Self::PainPoints => "pain_points",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "interests" => Some(Self::Interests),
            "personality" => Some(Self::Personality),
            "communication" => Some(Self::Communication),
            "values" => Some(Self::Values),
            "goals" => Some(Self::Goals),
            "pain_points" => Some(Self::PainPoints),
            _ => None,
        }
    }

    /// Category-specific instruction template. `{texts}` is replaced with
    /// the capped cluster sample before the call.
    pub fn instruction_template(&self) -> &'static str {
        match self {
            Self::Interests => {
                "Based on these comments, what is one specific interest or hobby? \
                 Example: 'Playing vintage guitars'.\n\nTexts:\n{texts}\n\nInterest:"
            }
            Self::Personality => {
                "Analyze the tone. What is one key personality trait? \
                 Example: 'Deeply analytical and skeptical'.\n\nTexts:\n{texts}\n\nTrait:"
            }
            Self::Communication => {
                "Describe one aspect of the user's communication style. \
                 Example: 'Uses technical jargon frequently'.\n\nTexts:\n{texts}\n\nStyle:"
            }
            Self::Values => {
                "What is one core value or belief expressed here? \
                 Example: 'Believes in open-source collaboration'.\n\nTexts:\n{texts}\n\nValue:"
            }
            Self::Goals => {
                "What is a primary motivation for these comments? \
                 Example: 'To find solutions to a technical problem'.\n\nTexts:\n{texts}\n\nGoal:"
            }
            Self::PainPoints => {
                "What is a source of frustration or a pain point for this user? \
                 Example: 'Frustrated with inefficient software'.\n\nTexts:\n{texts}\n\nPain Point:"
            }
        }
    }
}

/// One extracted insight: the unit appended to the raw insight log.
///
/// Created at most once per (cluster, category) pair; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInsight {
    pub category: InsightCategory,
    pub insight: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}
