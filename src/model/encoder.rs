use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::features::{self, FeatureVector, CATEGORICAL_FEATURES, NUMERIC_FEATURES};

#[derive(Debug, Clone, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    pub categories: Vec<String>,
}

/// Turns a feature vector into the dense row the estimator consumes:
/// scaled numeric columns first, then one-hot blocks in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct Preprocessor {
    pub numeric: Vec<NumericColumn>,
    pub categorical: Vec<CategoricalColumn>,
}

impl Preprocessor {
    pub fn width(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.categories.len()).sum::<usize>()
    }

    pub fn validate(&self) -> AppResult<()> {
        for column in &self.numeric {
            if !NUMERIC_FEATURES.contains(&column.name.as_str()) {
                return Err(AppError::ModelLoad(format!(
                    "Unknown numeric column {:?}",
                    column.name
                )));
            }
            if column.scale == 0.0 || !column.scale.is_finite() {
                return Err(AppError::ModelLoad(format!(
                    "Column {:?} has an unusable scale {}",
                    column.name, column.scale
                )));
            }
        }

        for column in &self.categorical {
            if !CATEGORICAL_FEATURES.contains(&column.name.as_str()) {
                return Err(AppError::ModelLoad(format!(
                    "Unknown categorical column {:?}",
                    column.name
                )));
            }
            if column.categories.is_empty() {
                return Err(AppError::ModelLoad(format!(
                    "Column {:?} has no categories",
                    column.name
                )));
            }
        }

        let declared: Vec<&str> = self
            .numeric
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.categorical.iter().map(|c| c.name.as_str()))
            .collect();
        for name in features::FEATURE_NAMES {
            let count = declared.iter().filter(|d| **d == name).count();
            if count != 1 {
                return Err(AppError::ModelLoad(format!(
                    "Column {:?} must be declared exactly once, found {}",
                    name, count
                )));
            }
        }

        Ok(())
    }

    /// Enumeration labels the artifact has never seen, as (column, label).
    pub fn vocabulary_gaps(&self) -> Vec<(String, &'static str)> {
        let mut gaps = Vec::new();
        for column in &self.categorical {
            let Some(labels) = features::vocabulary(&column.name) else {
                continue;
            };
            for label in labels {
                if !column.categories.iter().any(|c| c == label) {
                    gaps.push((column.name.clone(), label));
                }
            }
        }
        gaps
    }

    pub fn transform(&self, features: &FeatureVector) -> AppResult<Vec<f64>> {
        let mut row = Vec::with_capacity(self.width());

        for column in &self.numeric {
            let value = features.numeric(&column.name).ok_or_else(|| {
                AppError::Prediction(format!("No numeric feature {:?}", column.name))
            })?;
            row.push((value - column.mean) / column.scale);
        }

        for column in &self.categorical {
            let label = features.categorical(&column.name).ok_or_else(|| {
                AppError::Prediction(format!("No categorical feature {:?}", column.name))
            })?;
            let hot = column
                .categories
                .iter()
                .position(|c| c == label)
                .ok_or_else(|| AppError::UnknownCategory {
                    field: categorical_field(&column.name),
                    value: label.to_string(),
                })?;
            row.extend((0..column.categories.len()).map(|i| if i == hot { 1.0 } else { 0.0 }));
        }

        Ok(row)
    }
}

fn categorical_field(name: &str) -> &'static str {
    CATEGORICAL_FEATURES
        .iter()
        .copied()
        .find(|f| *f == name)
        .unwrap_or("category")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Area, Category, Traffic, Vehicle, Weather};

    fn preprocessor() -> Preprocessor {
        serde_json::from_value(serde_json::json!({
            "numeric": [
                { "name": "Agent_Age", "mean": 30.0, "scale": 5.0 },
                { "name": "Agent_Rating" },
                { "name": "Distance_km" },
                { "name": "Time_to_Pickup_Min" }
            ],
            "categorical": [
                { "name": "Weather", "categories": ["Sunny", "Fog"] },
                { "name": "Traffic", "categories": ["High ", "Jam ", "Low ", "Medium "] },
                { "name": "Vehicle", "categories": ["motorcycle ", "scooter ", "van"] },
                { "name": "Area", "categories": ["Urban ", "Other"] },
                { "name": "Category", "categories": ["Books", "Toys"] }
            ]
        }))
        .unwrap()
    }

    fn features() -> FeatureVector {
        FeatureVector {
            agent_age: 25,
            agent_rating: 4.5,
            distance_km: 12.0,
            time_to_pickup_min: 15.0,
            weather: Weather::Fog,
            traffic: Traffic::Low,
            vehicle: Vehicle::Van,
            area: Area::Urban,
            category: Category::Books,
        }
    }

    #[test]
    fn test_transform_layout() {
        let pre = preprocessor();
        pre.validate().unwrap();
        assert_eq!(pre.width(), 4 + 2 + 4 + 3 + 2 + 2);

        let row = pre.transform(&features()).unwrap();
        assert_eq!(
            row,
            vec![
                -1.0, 4.5, 12.0, 15.0, // numeric
                0.0, 1.0, // weather
                0.0, 0.0, 1.0, 0.0, // traffic
                0.0, 0.0, 1.0, // vehicle
                1.0, 0.0, // area
                1.0, 0.0, // category
            ]
        );
    }

    #[test]
    fn test_unknown_category() {
        let mut f = features();
        f.weather = Weather::Windy;
        let err = preprocessor().transform(&f).unwrap_err();
        assert!(matches!(
            err,
            AppError::UnknownCategory { field: "Weather", ref value } if value == "Windy"
        ));
    }

    #[test]
    fn test_vocabulary_gaps() {
        let gaps = preprocessor().vocabulary_gaps();
        assert!(gaps.contains(&("Weather".to_string(), "Windy")));
        assert!(gaps.contains(&("Area".to_string(), "Semi-Urban ")));
        assert!(!gaps.iter().any(|(column, _)| column == "Traffic"));
    }

    #[test]
    fn test_missing_column_rejected() {
        let mut pre = preprocessor();
        pre.categorical.pop();
        assert!(matches!(pre.validate(), Err(AppError::ModelLoad(_))));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut pre = preprocessor();
        pre.numeric.push(NumericColumn {
            name: "Agent_Age".to_string(),
            mean: 0.0,
            scale: 1.0,
        });
        assert!(matches!(pre.validate(), Err(AppError::ModelLoad(_))));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let mut pre = preprocessor();
        pre.numeric[1].scale = 0.0;
        assert!(matches!(pre.validate(), Err(AppError::ModelLoad(_))));
    }
}
