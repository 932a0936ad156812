use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    GradientBoosted {
        #[serde(default)]
        base_score: f64,
        trees: Vec<Tree>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Leaf {
        leaf: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A regression tree stored as a flat node array with the root at index 0.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self, width: usize) -> AppResult<()> {
        if self.nodes.is_empty() {
            return Err(AppError::ModelLoad("Tree has no nodes".to_string()));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                threshold,
                left,
                right,
            } = *node
            {
                if feature >= width {
                    return Err(AppError::ModelLoad(format!(
                        "Node {} splits on column {} but rows have {} columns",
                        index, feature, width
                    )));
                }
                if threshold.is_nan() {
                    return Err(AppError::ModelLoad(format!("Node {} has a NaN threshold", index)));
                }
                // Children point forward so every walk ends at a leaf
                for child in [left, right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(AppError::ModelLoad(format!(
                            "Node {} has invalid child {}",
                            index, child
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Missing values (NaN) follow the left branch.
    pub fn evaluate(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { leaf } => return leaf,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = row[feature];
                    index = if value.is_nan() || value < threshold { left } else { right };
                }
            }
        }
    }
}

impl Estimator {
    pub fn validate(&self, width: usize) -> AppResult<()> {
        match self {
            Estimator::Linear { coefficients, .. } => {
                if coefficients.len() != width {
                    return Err(AppError::ModelLoad(format!(
                        "Expected {} coefficients, found {}",
                        width,
                        coefficients.len()
                    )));
                }
                Ok(())
            }
            Estimator::GradientBoosted { trees, .. } => {
                if trees.is_empty() {
                    return Err(AppError::ModelLoad("Ensemble has no trees".to_string()));
                }
                trees.iter().try_for_each(|tree| tree.validate(width))
            }
        }
    }

    /// Score an encoded row. The row width must have been checked by `validate`.
    pub fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Estimator::Linear {
                intercept,
                coefficients,
            } => intercept + coefficients.iter().zip(row).map(|(c, x)| c * x).sum::<f64>(),
            Estimator::GradientBoosted { base_score, trees } => {
                base_score + trees.iter().map(|tree| tree.evaluate(row)).sum::<f64>()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> serde_json::Value {
        json!({ "nodes": [
            { "feature": feature, "threshold": threshold, "left": 1, "right": 2 },
            { "leaf": low },
            { "leaf": high }
        ]})
    }

    #[test]
    fn test_linear() {
        let estimator: Estimator = serde_json::from_value(json!({
            "kind": "linear",
            "intercept": 10.0,
            "coefficients": [2.0, -1.0, 0.5]
        }))
        .unwrap();
        estimator.validate(3).unwrap();
        assert_eq!(estimator.predict(&[1.0, 2.0, 4.0]), 12.0);
        assert!(estimator.validate(4).is_err());
    }

    #[test]
    fn test_gradient_boosted() {
        let estimator: Estimator = serde_json::from_value(json!({
            "kind": "gradient_boosted",
            "base_score": 20.0,
            "trees": [stump(0, 10.0, 1.0, 5.0), stump(1, 0.5, -2.0, 3.0)]
        }))
        .unwrap();
        estimator.validate(2).unwrap();
        assert_eq!(estimator.predict(&[5.0, 1.0]), 24.0);
        assert_eq!(estimator.predict(&[10.0, 0.0]), 23.0);
        assert_eq!(estimator.predict(&[f64::NAN, f64::NAN]), 19.0);
    }

    #[test]
    fn test_deeper_tree() {
        let tree: Tree = serde_json::from_value(json!({ "nodes": [
            { "feature": 0, "threshold": 0.5, "left": 1, "right": 2 },
            { "leaf": 1.0 },
            { "feature": 1, "threshold": 3.0, "left": 3, "right": 4 },
            { "leaf": 2.0 },
            { "leaf": 3.0 }
        ]}))
        .unwrap();
        tree.validate(2).unwrap();
        assert_eq!(tree.evaluate(&[0.0, 9.0]), 1.0);
        assert_eq!(tree.evaluate(&[1.0, 2.0]), 2.0);
        assert_eq!(tree.evaluate(&[1.0, 3.0]), 3.0);
    }

    #[test]
    fn test_backward_child_rejected() {
        let tree: Tree = serde_json::from_value(json!({ "nodes": [
            { "feature": 0, "threshold": 0.5, "left": 0, "right": 1 },
            { "leaf": 1.0 }
        ]}))
        .unwrap();
        assert!(matches!(tree.validate(1), Err(AppError::ModelLoad(_))));
    }

    #[test]
    fn test_feature_out_of_range_rejected() {
        let tree: Tree = serde_json::from_value(stump(3, 1.0, 0.0, 1.0)).unwrap();
        assert!(tree.validate(3).is_err());
        assert!(tree.validate(4).is_ok());
    }
}
