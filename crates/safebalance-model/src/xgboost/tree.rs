//! A single regression tree of the ensemble.

use super::format::TreeDocument;
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf {
        value: f32,
    },
}

/// Flattened tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Build and validate a tree. `index` is only used in error messages.
    pub(crate) fn from_document(
        index: usize,
        doc: &TreeDocument,
        num_feature: usize,
    ) -> Result<Self, ModelError> {
        let invalid = |reason: String| ModelError::InvalidTree {
            tree: index,
            reason,
        };

        let n = doc.left_children.len();
        if n == 0 {
            return Err(invalid("tree has no nodes".to_string()));
        }
        if doc.right_children.len() != n
            || doc.split_indices.len() != n
            || doc.split_conditions.len() != n
            || doc.default_left.len() != n
        {
            return Err(invalid("node arrays have different lengths".to_string()));
        }
        if doc.split_type.iter().any(|&t| t != 0) {
            return Err(ModelError::Unsupported(format!(
                "categorical split in tree {index}"
            )));
        }

        let child = |node: usize, raw: i64| -> Result<usize, ModelError> {
            usize::try_from(raw)
                .ok()
                .filter(|&c| c < n)
                .ok_or_else(|| invalid(format!("node {node} has child {raw} outside 0..{n}")))
        };

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (l, r) = (doc.left_children[i], doc.right_children[i]);
            if l == -1 && r == -1 {
                nodes.push(Node::Leaf {
                    value: doc.split_conditions[i],
                });
                continue;
            }
            let feature = usize::try_from(doc.split_indices[i])
                .ok()
                .filter(|&f| f < num_feature)
                .ok_or_else(|| {
                    invalid(format!(
                        "node {i} splits on feature {} of {num_feature}",
                        doc.split_indices[i]
                    ))
                })?;
            nodes.push(Node::Split {
                feature,
                threshold: doc.split_conditions[i],
                left: child(i, l)?,
                right: child(i, r)?,
                default_left: doc.default_left[i].is_set(),
            });
        }

        let tree = Self { nodes };
        tree.check_reachability().map_err(invalid)?;
        Ok(tree)
    }

    // Each node must be reached at most once from the root, which rules out
    // cycles and keeps traversal finite.
    fn check_reachability(&self) -> Result<(), String> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![0_usize];
        while let Some(i) = stack.pop() {
            if std::mem::replace(&mut seen[i], true) {
                return Err(format!("node {i} is reachable twice"));
            }
            if let Node::Split { left, right, .. } = self.nodes[i] {
                stack.push(left);
                stack.push(right);
            }
        }
        Ok(())
    }

    /// Leaf value reached by `features`. Comparisons run in `f32`, like
    /// XGBoost itself; a NaN follows the node's default direction.
    pub(crate) fn predict(&self, features: &[f32]) -> f32 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let v = features[feature];
                    i = if v.is_nan() {
                        if default_left { left } else { right }
                    } else if v < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub(crate) fn num_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xgboost::format::Flag;

    fn stump(feature: i64, threshold: f32, left: f32, right: f32) -> TreeDocument {
        TreeDocument {
            left_children: vec![1, -1, -1],
            right_children: vec![2, -1, -1],
            split_indices: vec![feature, 0, 0],
            split_conditions: vec![threshold, left, right],
            default_left: vec![Flag::Int(1), Flag::Int(0), Flag::Int(0)],
            split_type: vec![0, 0, 0],
        }
    }

    #[test]
    fn test_stump_routing() {
        let tree = RegressionTree::from_document(0, &stump(1, 0.5, -1.0, 2.0), 2).unwrap();
        assert_eq!(tree.predict(&[9.0, 0.4]), -1.0);
        assert_eq!(tree.predict(&[9.0, 0.5]), 2.0);
        assert_eq!(tree.predict(&[9.0, f32::NAN]), -1.0);
        assert_eq!(tree.num_leaves(), 2);
    }

    #[test]
    fn test_default_right() {
        let mut doc = stump(0, 0.5, -1.0, 2.0);
        doc.default_left[0] = Flag::Bool(false);
        let tree = RegressionTree::from_document(0, &doc, 1).unwrap();
        assert_eq!(tree.predict(&[f32::NAN]), 2.0);
    }

    #[test]
    fn test_single_leaf_tree() {
        let doc = TreeDocument {
            left_children: vec![-1],
            right_children: vec![-1],
            split_indices: vec![0],
            split_conditions: vec![0.25],
            default_left: vec![Flag::Int(0)],
            split_type: vec![],
        };
        let tree = RegressionTree::from_document(0, &doc, 1).unwrap();
        assert_eq!(tree.predict(&[100.0]), 0.25);
    }

    #[test]
    fn test_rejects_out_of_range_child() {
        let mut doc = stump(0, 0.5, -1.0, 2.0);
        doc.right_children[0] = 7;
        let err = RegressionTree::from_document(3, &doc, 1).unwrap_err();
        assert!(matches!(err, ModelError::InvalidTree { tree: 3, .. }));
    }

    #[test]
    fn test_rejects_unknown_feature() {
        let err = RegressionTree::from_document(0, &stump(5, 0.5, -1.0, 2.0), 2).unwrap_err();
        assert!(err.to_string().contains("feature 5 of 2"));
    }

    #[test]
    fn test_rejects_cycle() {
        let mut doc = stump(0, 0.5, -1.0, 2.0);
        doc.left_children[0] = 0;
        assert!(RegressionTree::from_document(0, &doc, 1).is_err());
    }

    #[test]
    fn test_rejects_ragged_arrays() {
        let mut doc = stump(0, 0.5, -1.0, 2.0);
        doc.split_conditions.pop();
        assert!(RegressionTree::from_document(0, &doc, 1).is_err());
    }

    #[test]
    fn test_rejects_categorical_split() {
        let mut doc = stump(0, 0.5, -1.0, 2.0);
        doc.split_type[0] = 1;
        assert!(matches!(
            RegressionTree::from_document(0, &doc, 1),
            Err(ModelError::Unsupported(_))
        ));
    }
}
