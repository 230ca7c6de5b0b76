use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::model::{Classifier, clamp_probability, sigmoid};

const LEAF: i64 = -1;

/// Array-of-nodes tree layout. Node 0 is the root, `left == -1` marks a leaf,
/// and samples go left when `x[feature] <= threshold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub left: Vec<i64>,
    pub right: Vec<i64>,
    pub value: Vec<f64>,
}

#[derive(Debug, Clone)]
struct Node {
    feature: usize,
    threshold: f64,
    left: usize,
    right: usize,
    value: f64,
    leaf: bool,
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn from_spec(spec: TreeSpec, n_features: usize) -> Result<Self> {
        let n = spec.value.len();
        if n == 0 {
            bail!("tree has no nodes");
        }
        if spec.feature.len() != n
            || spec.threshold.len() != n
            || spec.left.len() != n
            || spec.right.len() != n
        {
            bail!("tree node arrays differ in length");
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let value = spec.value[i];
            if !value.is_finite() {
                bail!("node {}: value is not finite", i);
            }
            let (left, right) = (spec.left[i], spec.right[i]);
            if left == LEAF {
                if right != LEAF {
                    bail!("node {}: leaf has a right child", i);
                }
                nodes.push(Node {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 0,
                    value,
                    leaf: true,
                });
                continue;
            }
            // Children must point forward so traversal always terminates.
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    bail!("node {}: child index {} out of range", i, child);
                }
            }
            let feature = spec.feature[i];
            if feature < 0 || feature >= n_features as i64 {
                bail!(
                    "node {}: split feature {} outside 0..{}",
                    i,
                    feature,
                    n_features
                );
            }
            let threshold = spec.threshold[i];
            if !threshold.is_finite() {
                bail!("node {}: threshold is not finite", i);
            }
            nodes.push(Node {
                feature: feature as usize,
                threshold,
                left: left as usize,
                right: right as usize,
                value,
                leaf: false,
            });
        }
        Ok(Self { nodes })
    }

    pub fn leaf_value(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            if node.leaf {
                return node.value;
            }
            idx = if row[node.feature] <= node.threshold {
                node.left
            } else {
                node.right
            };
        }
    }

    fn leaf_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.nodes.iter().filter(|n| n.leaf).map(|n| n.value)
    }
}

fn build_trees(specs: Vec<TreeSpec>, n_features: usize) -> Result<Vec<Tree>> {
    if specs.is_empty() {
        bail!("ensemble has no trees");
    }
    let mut trees = Vec::with_capacity(specs.len());
    for (i, spec) in specs.into_iter().enumerate() {
        let tree = Tree::from_spec(spec, n_features).with_context(|| format!("tree {}", i))?;
        trees.push(tree);
    }
    Ok(trees)
}

/// Additive ensemble in log-odds space.
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    base_score: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
    n_features: usize,
}

impl GradientBoosting {
    pub fn new(
        base_score: f64,
        learning_rate: f64,
        trees: Vec<TreeSpec>,
        n_features: usize,
    ) -> Result<Self> {
        if !base_score.is_finite() || !learning_rate.is_finite() {
            bail!("base_score and learning_rate must be finite");
        }
        Ok(Self {
            base_score,
            learning_rate,
            trees: build_trees(trees, n_features)?,
            n_features,
        })
    }

    pub fn raw_score(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.leaf_value(row)).sum();
        self.base_score + self.learning_rate * sum
    }
}

impl Classifier for GradientBoosting {
    fn kind(&self) -> &'static str {
        "gradient_boosting"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: &[f64]) -> f64 {
        clamp_probability(sigmoid(self.raw_score(row)))
    }
}

/// Averaging ensemble; each leaf stores a positive-class probability.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<Tree>,
    n_features: usize,
}

impl RandomForest {
    pub fn new(trees: Vec<TreeSpec>, n_features: usize) -> Result<Self> {
        let trees = build_trees(trees, n_features)?;
        for (i, tree) in trees.iter().enumerate() {
            if tree.leaf_values().any(|v| !(0.0..=1.0).contains(&v)) {
                bail!("tree {}: leaf probability outside [0, 1]", i);
            }
        }
        Ok(Self { trees, n_features })
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.leaf_value(row)).sum();
        clamp_probability(sum / self.trees.len() as f64)
    }
}
