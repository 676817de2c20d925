//! Data tables and pacing shared by every session.

use super::chatbot::ChatScript;
use super::interview::FollowUpPolicy;
use super::recommendations::ListingCatalog;
use crate::config::{AppConfig, PacingConfig};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid chat script: {0}")]
    ChatScript(#[from] serde_json::Error),
    #[error("invalid listing catalog: {0}")]
    Catalog(#[from] csv::Error),
    #[error("invalid listing '{id}': {reason}")]
    InvalidListing { id: String, reason: String },
}

/// How each newly mounted interview decides on follow-up questions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowUpMode {
    Never,
    Always,
    Random { probability: f64 },
    Seeded { probability: f64, seed: u64 },
}

impl FollowUpMode {
    pub fn policy(self) -> FollowUpPolicy {
        match self {
            Self::Never => FollowUpPolicy::Never,
            Self::Always => FollowUpPolicy::Always,
            Self::Random { probability } => FollowUpPolicy::random(probability),
            Self::Seeded { probability, seed } => FollowUpPolicy::seeded(probability, seed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowAssets {
    pub catalog: Arc<ListingCatalog>,
    pub chat_script: Arc<ChatScript>,
    pub pacing: PacingConfig,
    pub follow_up: FollowUpMode,
}

impl FlowAssets {
    pub fn standard(pacing: PacingConfig) -> Self {
        Self {
            catalog: Arc::new(ListingCatalog::standard()),
            chat_script: Arc::new(ChatScript::standard()),
            pacing,
            follow_up: FollowUpMode::Random { probability: 0.5 },
        }
    }

    /// Built-in tables unless the configuration points at override files.
    pub fn from_config(config: &AppConfig) -> Result<Self, AssetError> {
        let catalog = match &config.content.listings_csv {
            Some(path) => {
                let catalog = ListingCatalog::from_path(path)?;
                info!(path = %path.display(), listings = catalog.len(), "loaded listing catalog");
                catalog
            }
            None => ListingCatalog::standard(),
        };

        let chat_script = match &config.content.chat_script {
            Some(path) => {
                let script = ChatScript::from_path(path)?;
                info!(path = %path.display(), intents = script.intents.len(), "loaded chat script");
                script
            }
            None => ChatScript::standard(),
        };

        Ok(Self {
            catalog: Arc::new(catalog),
            chat_script: Arc::new(chat_script),
            pacing: config.pacing,
            follow_up: FollowUpMode::Random {
                probability: config.content.follow_up_probability,
            },
        })
    }

    pub fn with_follow_up(mut self, follow_up: FollowUpMode) -> Self {
        self.follow_up = follow_up;
        self
    }
}
