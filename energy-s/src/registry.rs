use anyhow::{Context, Result};
use common::schema;
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

use crate::artifact::{Artifact, ArtifactError};
use crate::error::GatewayError;
use crate::util::config::{MissingModelPolicy, ModelsConfig};

/// Fixed names of the artifacts the gateway serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelName {
    Pax,
    Terminal,
    Kantor,
    TerminalClassifier,
    KantorClassifier,
    UsageClassifier,
}

impl ModelName {
    pub const ALL: [ModelName; 6] = [
        ModelName::Pax,
        ModelName::Terminal,
        ModelName::Kantor,
        ModelName::TerminalClassifier,
        ModelName::KantorClassifier,
        ModelName::UsageClassifier,
    ];

    /// Key used in the `[models]` config section.
    pub fn key(self) -> &'static str {
        match self {
            ModelName::Pax => "pax",
            ModelName::Terminal => "terminal",
            ModelName::Kantor => "kantor",
            ModelName::TerminalClassifier => "terminal_classifier",
            ModelName::KantorClassifier => "kantor_classifier",
            ModelName::UsageClassifier => "usage_classifier",
        }
    }

    pub fn features(self) -> &'static [&'static str] {
        match self {
            ModelName::Pax => schema::PAX_FEATURES,
            ModelName::Terminal => schema::TERMINAL_FEATURES,
            ModelName::Kantor => schema::KANTOR_FEATURES,
            ModelName::TerminalClassifier => schema::TERMINAL_CLASSIFIER_FEATURES,
            ModelName::KantorClassifier => schema::KANTOR_CLASSIFIER_FEATURES,
            ModelName::UsageClassifier => schema::USAGE_CLASSIFIER_FEATURES,
        }
    }

    pub fn is_classifier(self) -> bool {
        matches!(
            self,
            ModelName::TerminalClassifier | ModelName::KantorClassifier | ModelName::UsageClassifier
        )
    }

    /// Reject an artifact that was not exported for this slot.
    pub fn check(self, artifact: &Artifact) -> Result<(), ArtifactError> {
        if artifact.is_classifier() != self.is_classifier() {
            return Err(ArtifactError::Invalid(format!(
                "{} expects a {}, file holds a {}",
                self,
                if self.is_classifier() { "classifier" } else { "regressor" },
                artifact.kind()
            )));
        }
        if artifact.feature_names.iter().map(String::as_str).ne(self.features().iter().copied()) {
            return Err(ArtifactError::Invalid(format!(
                "{} expects columns {:?}, file declares {:?}",
                self,
                self.features(),
                artifact.feature_names
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Artifacts loaded at startup. Never mutated afterwards.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<ModelName, Artifact>,
}

impl ModelRegistry {
    /// Load every configured artifact once.
    ///
    /// With [`MissingModelPolicy::Abort`] the first failure is returned and the
    /// caller must not start serving. With [`MissingModelPolicy::Guard`] the
    /// failing slot stays empty and requests needing it get a 500.
    pub fn load(config: &ModelsConfig) -> Result<Self> {
        let mut models = HashMap::new();
        for name in ModelName::ALL {
            let path = config.path_for(name);
            let loaded = Artifact::from_file(&path).and_then(|artifact| {
                name.check(&artifact)?;
                Ok(artifact)
            });
            match loaded {
                Ok(artifact) => {
                    info!(
                        "Loaded {} model ({}) from {:?}, columns {:?}",
                        name,
                        artifact.kind(),
                        path,
                        artifact.feature_names
                    );
                    models.insert(name, artifact);
                }
                Err(e) => match config.on_missing {
                    MissingModelPolicy::Abort => {
                        return Err(e)
                            .with_context(|| format!("failed to load {name} model from {path:?}"));
                    }
                    MissingModelPolicy::Guard => {
                        warn!(
                            "Failed to load {} model from {:?}: {}. Endpoints using it will answer 500",
                            name, path, e
                        );
                    }
                },
            }
        }
        Ok(Self { models })
    }

    /// Build from artifacts already in memory, applying the same slot checks
    /// as [`ModelRegistry::load`].
    pub fn from_artifacts<I>(artifacts: I) -> Result<Self, ArtifactError>
    where
        I: IntoIterator<Item = (ModelName, Artifact)>,
    {
        let mut models = HashMap::new();
        for (name, artifact) in artifacts {
            artifact.validate()?;
            name.check(&artifact)?;
            models.insert(name, artifact);
        }
        Ok(Self { models })
    }

    pub fn get(&self, name: ModelName) -> Result<&Artifact, GatewayError> {
        self.models
            .get(&name)
            .ok_or(GatewayError::ModelUnavailable(name))
    }

    pub fn loaded(&self) -> Vec<ModelName> {
        let mut names: Vec<_> = self.models.keys().copied().collect();
        names.sort();
        names
    }

    pub fn missing(&self) -> Vec<ModelName> {
        ModelName::ALL
            .into_iter()
            .filter(|name| !self.models.contains_key(name))
            .collect()
    }
}
