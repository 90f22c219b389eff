//! Closed AI-label vocabularies used by the labels endpoints

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const LABEL_CATEGORIES: &[&str] = &[
    "all",
    "topics",
    "sentiment",
    "emotion",
    "moderation",
    "web3_topics",
];

pub const TOPIC_LABELS: &[&str] = &[
    "arts_culture",
    "business_entrepreneurs",
    "celebrity_pop_culture",
    "diaries_daily_life",
    "family",
    "fashion_style",
    "film_tv_video",
    "fitness_health",
    "food_dining",
    "gaming",
    "learning_educational",
    "music",
    "news_social_concern",
    "other_hobbies",
    "relationships",
    "science_technology",
    "sports",
    "travel_adventure",
    "youth_student_life",
];

pub const SENTIMENT_LABELS: &[&str] = &["positive", "neutral", "negative"];

pub const EMOTION_LABELS: &[&str] = &[
    "anger",
    "anticipation",
    "disgust",
    "fear",
    "joy",
    "love",
    "optimism",
    "pessimism",
    "sadness",
    "surprise",
    "trust",
];

pub const MODERATION_LABELS: &[&str] = &[
    "llm_generated",
    "spam",
    "sexual",
    "hate",
    "violence",
    "harassment",
    "self_harm",
    "sexual_minors",
    "hate_threatening",
    "violence_graphic",
];

pub const WEB3_TOPIC_LABELS: &[&str] = &[
    "web3_nft",
    "web3_defi",
    "web3_infra",
    "web3_industry",
    "web3_consumer",
];

/// Every label across all categories
pub static ALL_LABELS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    [
        TOPIC_LABELS,
        SENTIMENT_LABELS,
        EMOTION_LABELS,
        MODERATION_LABELS,
        WEB3_TOPIC_LABELS,
    ]
    .concat()
});

/// Label category requested from the labels endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelCategory {
    #[default]
    All,
    Topics,
    Sentiment,
    Emotion,
    Moderation,
    Web3Topics,
}

impl LabelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelCategory::All => "all",
            LabelCategory::Topics => "topics",
            LabelCategory::Sentiment => "sentiment",
            LabelCategory::Emotion => "emotion",
            LabelCategory::Moderation => "moderation",
            LabelCategory::Web3Topics => "web3_topics",
        }
    }

    /// Labels belonging to this category
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            LabelCategory::All => &ALL_LABELS,
            LabelCategory::Topics => TOPIC_LABELS,
            LabelCategory::Sentiment => SENTIMENT_LABELS,
            LabelCategory::Emotion => EMOTION_LABELS,
            LabelCategory::Moderation => MODERATION_LABELS,
            LabelCategory::Web3Topics => WEB3_TOPIC_LABELS,
        }
    }

    /// Category a single label belongs to
    pub fn of(label: &str) -> Option<Self> {
        [
            LabelCategory::Topics,
            LabelCategory::Sentiment,
            LabelCategory::Emotion,
            LabelCategory::Moderation,
            LabelCategory::Web3Topics,
        ]
        .into_iter()
        .find(|c| c.labels().contains(&label))
    }
}
