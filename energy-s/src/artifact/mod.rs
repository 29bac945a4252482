//! Exported model artifacts and their inference.
//!
//! An artifact is produced by the training side and treated as opaque data
//! here: a column list plus a fitted body. JSON is the interchange format;
//! the same structure encoded with bincode (serde mode, standard config) is
//! accepted from `.bin` files.

pub mod tree;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use tree::{Tree, TREE_LEAF};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode JSON artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode bincode artifact: {0}")]
    Bincode(#[from] bincode::error::DecodeError),

    #[error("unsupported artifact extension {0:?}, expected .json or .bin")]
    UnsupportedFormat(String),

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("feature '{0}' is required by the model but missing from the input row")]
    MissingFeature(String),

    #[error("a {kind} model cannot {operation}")]
    WrongKind {
        kind: &'static str,
        operation: &'static str,
    },

    #[error("feature '{feature}' is not a finite number: {value}")]
    NonFiniteInput { feature: String, value: f64 },

    #[error("model produced a non-finite value: {0}")]
    NonFinite(f64),
}

/// Named input values for one inference call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    columns: Vec<(&'static str, f64)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &'static str, value: f64) -> Self {
        self.columns.push((column, value));
        self
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| *value)
    }
}

/// What a classifier answered: its integer code, or the text label when the
/// artifact ships one per class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Code(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelBody {
    LinearRegressor {
        coef: Vec<f64>,
        intercept: f64,
    },
    DecisionTreeRegressor {
        tree: Tree,
    },
    RandomForestRegressor {
        trees: Vec<Tree>,
    },
    DecisionTreeClassifier {
        classes: Vec<i64>,
        labels: Option<Vec<String>>,
        tree: Tree,
    },
    RandomForestClassifier {
        classes: Vec<i64>,
        labels: Option<Vec<String>>,
        trees: Vec<Tree>,
    },
}

impl ModelBody {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelBody::LinearRegressor { .. } => "linear_regressor",
            ModelBody::DecisionTreeRegressor { .. } => "decision_tree_regressor",
            ModelBody::RandomForestRegressor { .. } => "random_forest_regressor",
            ModelBody::DecisionTreeClassifier { .. } => "decision_tree_classifier",
            ModelBody::RandomForestClassifier { .. } => "random_forest_classifier",
        }
    }

    pub fn is_classifier(&self) -> bool {
        matches!(
            self,
            ModelBody::DecisionTreeClassifier { .. } | ModelBody::RandomForestClassifier { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub feature_names: Vec<String>,
    pub model: ModelBody,
}

impl Artifact {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Self::from_json_slice(&bytes),
            "bin" | "bincode" => Self::from_bincode_slice(&bytes),
            _ => Err(ArtifactError::UnsupportedFormat(extension)),
        }
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: Artifact = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn from_bincode_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let (artifact, _): (Artifact, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn kind(&self) -> &'static str {
        self.model.kind()
    }

    pub fn is_classifier(&self) -> bool {
        self.model.is_classifier()
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ArtifactError::Invalid("no feature_names declared".into()));
        }
        for (i, name) in self.feature_names.iter().enumerate() {
            if self.feature_names[..i].contains(name) {
                return Err(ArtifactError::Invalid(format!("feature '{name}' declared twice")));
            }
        }

        match &self.model {
            ModelBody::LinearRegressor { coef, intercept } => {
                if coef.len() != n {
                    return Err(ArtifactError::Invalid(format!(
                        "{} coefficients for {n} features",
                        coef.len()
                    )));
                }
                if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
                    return Err(ArtifactError::Invalid("non-finite coefficient".into()));
                }
                Ok(())
            }
            ModelBody::DecisionTreeRegressor { tree } => tree.validate(n, 1),
            ModelBody::RandomForestRegressor { trees } => validate_forest(trees, n, 1),
            ModelBody::DecisionTreeClassifier {
                classes,
                labels,
                tree,
            } => {
                validate_classes(classes, labels.as_deref())?;
                tree.validate(n, classes.len())
            }
            ModelBody::RandomForestClassifier {
                classes,
                labels,
                trees,
            } => {
                validate_classes(classes, labels.as_deref())?;
                validate_forest(trees, n, classes.len())
            }
        }
    }

    /// Values of `row` in the order the model was trained on.
    fn arrange(&self, row: &FeatureRow) -> Result<Vec<f64>, InferenceError> {
        self.feature_names
            .iter()
            .map(|name| match row.get(name) {
                Some(value) if value.is_finite() => Ok(value),
                Some(value) => Err(InferenceError::NonFiniteInput {
                    feature: name.clone(),
                    value,
                }),
                None => Err(InferenceError::MissingFeature(name.clone())),
            })
            .collect()
    }

    pub fn predict_value(&self, row: &FeatureRow) -> Result<f64, InferenceError> {
        let x = self.arrange(row)?;
        let value = match &self.model {
            ModelBody::LinearRegressor { coef, intercept } => {
                intercept + coef.iter().zip(&x).map(|(c, v)| c * v).sum::<f64>()
            }
            ModelBody::DecisionTreeRegressor { tree } => tree.leaf(&x)[0],
            ModelBody::RandomForestRegressor { trees } => {
                trees.iter().map(|t| t.leaf(&x)[0]).sum::<f64>() / trees.len() as f64
            }
            _ => {
                return Err(InferenceError::WrongKind {
                    kind: self.kind(),
                    operation: "predict a value",
                })
            }
        };
        if !value.is_finite() {
            return Err(InferenceError::NonFinite(value));
        }
        Ok(value)
    }

    pub fn predict_class(&self, row: &FeatureRow) -> Result<ClassLabel, InferenceError> {
        let x = self.arrange(row)?;
        let (classes, labels, probabilities) = match &self.model {
            ModelBody::DecisionTreeClassifier {
                classes,
                labels,
                tree,
            } => (classes, labels, tree::normalized(tree.leaf(&x))),
            ModelBody::RandomForestClassifier {
                classes,
                labels,
                trees,
            } => {
                let mut sum = vec![0.0; classes.len()];
                for t in trees {
                    for (acc, p) in sum.iter_mut().zip(tree::normalized(t.leaf(&x))) {
                        *acc += p;
                    }
                }
                (classes, labels, sum)
            }
            _ => {
                return Err(InferenceError::WrongKind {
                    kind: self.kind(),
                    operation: "predict a class",
                })
            }
        };

        let best = tree::argmax(&probabilities);
        Ok(match labels {
            Some(labels) => ClassLabel::Text(labels[best].clone()),
            None => ClassLabel::Code(classes[best]),
        })
    }
}

fn validate_classes(classes: &[i64], labels: Option<&[String]>) -> Result<(), ArtifactError> {
    if classes.is_empty() {
        return Err(ArtifactError::Invalid("classifier declares no classes".into()));
    }
    if let Some(labels) = labels {
        if labels.len() != classes.len() {
            return Err(ArtifactError::Invalid(format!(
                "{} labels for {} classes",
                labels.len(),
                classes.len()
            )));
        }
    }
    Ok(())
}

fn validate_forest(trees: &[Tree], n_features: usize, width: usize) -> Result<(), ArtifactError> {
    if trees.is_empty() {
        return Err(ArtifactError::Invalid("forest has no trees".into()));
    }
    trees.iter().try_for_each(|t| t.validate(n_features, width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn terminal_linear() -> Artifact {
        Artifact {
            feature_names: vec!["pax".into(), "suhu_rata".into(), "suhu_max".into()],
            model: ModelBody::LinearRegressor {
                coef: vec![0.5, 10.0, 2.0],
                intercept: 100.0,
            },
        }
    }

    #[test]
    fn test_linear_uses_declared_column_order() {
        let model = terminal_linear();
        // Row order differs from the model's, values are picked by name.
        let row = FeatureRow::new()
            .with("suhu_max", 32.0)
            .with("pax", 1000.0)
            .with("suhu_rata", 28.0);
        let value = model.predict_value(&row).unwrap();
        assert!((value - (100.0 + 500.0 + 280.0 + 64.0)).abs() < 1e-9);
    }

    #[test]
    fn test_missing_feature() {
        let row = FeatureRow::new().with("pax", 1.0).with("suhu_rata", 1.0);
        let err = terminal_linear().predict_value(&row).unwrap_err();
        assert!(matches!(err, InferenceError::MissingFeature(ref c) if c == "suhu_max"));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let row = FeatureRow::new()
            .with("pax", f64::INFINITY)
            .with("suhu_rata", 28.0)
            .with("suhu_max", 32.0);
        let err = terminal_linear().predict_value(&row).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::NonFiniteInput { ref feature, .. } if feature == "pax"
        ));

        // Finite inputs whose sum overflows.
        let row = FeatureRow::new()
            .with("pax", 1.0)
            .with("suhu_rata", 28.0)
            .with("suhu_max", f64::MAX);
        let err = terminal_linear().predict_value(&row).unwrap_err();
        assert!(matches!(err, InferenceError::NonFinite(v) if v.is_infinite()));
    }

    #[test]
    fn test_forest_classifier_votes() {
        let model = Artifact {
            feature_names: vec!["perubahan_listrik_kwh".into(), "perubahan_pax".into()],
            model: ModelBody::RandomForestClassifier {
                classes: vec![0, 1, 2],
                labels: None,
                trees: vec![
                    Tree::stump(0, 5.0, vec![0.0, 0.0, 4.0], vec![3.0, 1.0, 0.0]),
                    Tree::stump(0, 20.0, vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0]),
                    Tree::stump(1, 0.0, vec![2.0, 2.0, 0.0], vec![0.0, 1.0, 0.0]),
                ],
            },
        };
        model.validate().unwrap();

        let row = |kwh, pax| {
            FeatureRow::new()
                .with("perubahan_listrik_kwh", kwh)
                .with("perubahan_pax", pax)
        };
        // 0.75 + 0 + 0.5 for class 0, 0.25 + 0 + 0.5 for class 1, 0 + 1 + 0 for class 2.
        assert_eq!(model.predict_class(&row(10.0, 0.0)).unwrap(), ClassLabel::Code(0));
        assert_eq!(model.predict_class(&row(0.0, 5.0)).unwrap(), ClassLabel::Code(2));
        assert!(model.predict_value(&row(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_text_labels() {
        let model = Artifact {
            feature_names: vec!["x".into()],
            model: ModelBody::DecisionTreeClassifier {
                classes: vec![0, 1],
                labels: Some(vec!["HEMAT".into(), "BOROS".into()]),
                tree: Tree::stump(0, 0.0, vec![5.0, 1.0], vec![0.0, 2.0]),
            },
        };
        let row = FeatureRow::new().with("x", 3.0);
        assert_eq!(
            model.predict_class(&row).unwrap(),
            ClassLabel::Text("BOROS".into())
        );
        assert_eq!(serde_json::to_string(&ClassLabel::Code(2)).unwrap(), "2");
    }

    #[test]
    fn test_json_document() {
        let doc = json!({
            "feature_names": ["is_hari_kerja", "suhu_rata", "suhu_max"],
            "model": {
                "decision_tree_regressor": {
                    "tree": {
                        "children_left": [1, -1, -1],
                        "children_right": [2, -1, -1],
                        "feature": [0, -2, -2],
                        "threshold": [0.5, -2.0, -2.0],
                        "value": [[300.0], [150.0], [450.0]]
                    }
                }
            }
        });
        let model = Artifact::from_json_slice(doc.to_string().as_bytes()).unwrap();
        assert_eq!(model.kind(), "decision_tree_regressor");
        let row = FeatureRow::new()
            .with("is_hari_kerja", 1.0)
            .with("suhu_rata", 28.0)
            .with("suhu_max", 32.0);
        assert_eq!(model.predict_value(&row).unwrap(), 450.0);
    }

    #[test]
    fn test_invalid_documents() {
        let duplicate = json!({
            "feature_names": ["a", "a"],
            "model": {"linear_regressor": {"coef": [1.0, 1.0], "intercept": 0.0}}
        });
        assert!(matches!(
            Artifact::from_json_slice(duplicate.to_string().as_bytes()),
            Err(ArtifactError::Invalid(_))
        ));

        let wrong_width = json!({
            "feature_names": ["a"],
            "model": {"linear_regressor": {"coef": [1.0, 2.0], "intercept": 0.0}}
        });
        assert!(Artifact::from_json_slice(wrong_width.to_string().as_bytes()).is_err());

        assert!(matches!(
            Artifact::from_json_slice(b"{\"feature_names\": "),
            Err(ArtifactError::Json(_))
        ));
    }

    #[test]
    fn test_bincode_file() {
        let model = terminal_linear();
        let bytes = bincode::serde::encode_to_vec(&model, bincode::config::standard()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_terminal.bin");
        std::fs::write(&path, bytes).unwrap();
        assert_eq!(Artifact::from_file(&path).unwrap(), model);

        let other = dir.path().join("model_terminal.pkl");
        std::fs::write(&other, b"\x80\x04").unwrap();
        assert!(matches!(
            Artifact::from_file(&other),
            Err(ArtifactError::UnsupportedFormat(ext)) if ext == "pkl"
        ));
        assert!(matches!(
            Artifact::from_file(dir.path().join("missing.json")),
            Err(ArtifactError::Io { .. })
        ));
    }
}
