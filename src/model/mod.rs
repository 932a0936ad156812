//! The delivery time model: a preprocessing step followed by an estimator,
//! loaded once from a JSON artifact.

pub mod encoder;
pub mod estimator;

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::features::FeatureVector;

pub use encoder::Preprocessor;
pub use estimator::Estimator;

/// Anything that turns a feature vector into predicted minutes.
///
/// Implementations must be deterministic and may block.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> AppResult<f64>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub name: Option<String>,
    pub preprocessor: Preprocessor,
    pub estimator: Estimator,
}

impl Pipeline {
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let pipeline: Pipeline = serde_json::from_str(raw)?;
        pipeline.preprocessor.validate()?;
        pipeline.estimator.validate(pipeline.preprocessor.width())?;

        for (column, label) in pipeline.preprocessor.vocabulary_gaps() {
            tracing::warn!(
                column = %column,
                label = ?label,
                "Model vocabulary is missing a selectable value; predictions using it will fail"
            );
        }

        Ok(pipeline)
    }

    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::ModelLoad(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let pipeline = Self::from_json(&raw)?;

        tracing::info!(
            path = %path.display(),
            name = pipeline.name.as_deref().unwrap_or("unnamed"),
            columns = pipeline.preprocessor.width(),
            "Loaded delivery time model"
        );

        Ok(pipeline)
    }
}

impl Predictor for Pipeline {
    fn predict(&self, features: &FeatureVector) -> AppResult<f64> {
        let row = self.preprocessor.transform(features)?;
        let minutes = self.estimator.predict(&row);

        if !minutes.is_finite() {
            return Err(AppError::Prediction(format!(
                "Model produced a non-finite value {}",
                minutes
            )));
        }

        Ok(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Area, Category, Traffic, Vehicle, Weather};

    const SAMPLE: &str = include_str!("../../models/delivery_model.json");

    fn features() -> FeatureVector {
        FeatureVector {
            agent_age: 25,
            agent_rating: 3.5,
            distance_km: 19.02,
            time_to_pickup_min: 30.0,
            weather: Weather::Sunny,
            traffic: Traffic::High,
            vehicle: Vehicle::Motorcycle,
            area: Area::Urban,
            category: Category::Clothing,
        }
    }

    #[test]
    fn test_sample_artifact_loads() {
        let pipeline = Pipeline::from_json(SAMPLE).unwrap();
        assert!(pipeline.preprocessor.vocabulary_gaps().is_empty());
    }

    #[test]
    fn test_sample_artifact_is_deterministic() {
        let pipeline = Pipeline::from_json(SAMPLE).unwrap();
        let first = pipeline.predict(&features()).unwrap();
        let second = pipeline.predict(&features()).unwrap();
        assert_eq!(first, second);
        assert!(first > 0.0);
    }

    #[test]
    fn test_worse_conditions_take_longer() {
        let pipeline = Pipeline::from_json(SAMPLE).unwrap();
        let calm = pipeline.predict(&features()).unwrap();

        let mut stormy = features();
        stormy.weather = Weather::Stormy;
        stormy.traffic = Traffic::Jam;
        stormy.distance_km = 40.0;
        assert!(pipeline.predict(&stormy).unwrap() > calm);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Pipeline::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, AppError::ModelLoad(_)));
    }

    #[test]
    fn test_corrupt_artifact() {
        assert!(matches!(
            Pipeline::from_json("{ not json"),
            Err(AppError::ModelLoad(_))
        ));
    }

    #[test]
    fn test_coefficient_mismatch_rejected() {
        let raw = serde_json::json!({
            "preprocessor": {
                "numeric": [
                    { "name": "Agent_Age" },
                    { "name": "Agent_Rating" },
                    { "name": "Distance_km" },
                    { "name": "Time_to_Pickup_Min" }
                ],
                "categorical": [
                    { "name": "Weather", "categories": ["Sunny"] },
                    { "name": "Traffic", "categories": ["High "] },
                    { "name": "Vehicle", "categories": ["van"] },
                    { "name": "Area", "categories": ["Other"] },
                    { "name": "Category", "categories": ["Books"] }
                ]
            },
            "estimator": { "kind": "linear", "intercept": 1.0, "coefficients": [1.0, 2.0] }
        })
        .to_string();
        assert!(matches!(Pipeline::from_json(&raw), Err(AppError::ModelLoad(_))));
    }
}
