//! The two attribution output layouts and how to read one vector out of them.

use crate::error::ExplainError;
use ndarray::{Array2, Array3, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which layout an explainer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionLayout {
    /// One `[instance, feature]` matrix per class.
    #[default]
    PerClass,
    /// One `[instance, class, feature]` tensor.
    Stacked,
}

impl fmt::Display for AttributionLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributionLayout::PerClass => f.write_str("per_class"),
            AttributionLayout::Stacked => f.write_str("stacked"),
        }
    }
}

impl FromStr for AttributionLayout {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_class" | "per-class" => Ok(AttributionLayout::PerClass),
            "stacked" => Ok(AttributionLayout::Stacked),
            other => Err(ExplainError::unsupported(format!("unknown layout '{other}'"))),
        }
    }
}

/// Attribution values for a batch of instances, in one of two layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributionOutput {
    /// `values[class][[instance, feature]]`
    PerClass(Vec<Array2<f64>>),
    /// `values[[instance, class, feature]]`
    Stacked(Array3<f64>),
}

impl AttributionOutput {
    pub fn layout(&self) -> AttributionLayout {
        match self {
            AttributionOutput::PerClass(_) => AttributionLayout::PerClass,
            AttributionOutput::Stacked(_) => AttributionLayout::Stacked,
        }
    }

    /// `(instances, classes, features)`, after checking the layout is
    /// internally consistent.
    pub fn shape(&self) -> Result<(usize, usize, usize), ExplainError> {
        match self {
            AttributionOutput::PerClass(classes) => {
                let first = classes
                    .first()
                    .ok_or_else(|| ExplainError::unsupported("per-class list is empty"))?;
                let dim = first.dim();
                if let Some((c, m)) = classes.iter().enumerate().find(|(_, m)| m.dim() != dim) {
                    return Err(ExplainError::unsupported(format!(
                        "class {c} has shape {:?}, class 0 has {:?}",
                        m.dim(),
                        dim
                    )));
                }
                Ok((dim.0, classes.len(), dim.1))
            }
            AttributionOutput::Stacked(values) => Ok(values.dim()),
        }
    }

    /// The attribution vector for one instance and class.
    pub fn for_class(&self, instance: usize, class: usize) -> Result<Vec<f64>, ExplainError> {
        let (n_instances, n_classes, _) = self.shape()?;
        if class >= n_classes {
            return Err(ExplainError::ClassOutOfRange { class, n_classes });
        }
        if instance >= n_instances {
            return Err(ExplainError::InstanceOutOfRange { instance, n_instances });
        }
        Ok(match self {
            AttributionOutput::PerClass(classes) => classes[class].row(instance).to_vec(),
            AttributionOutput::Stacked(values) => values
                .index_axis(Axis(0), instance)
                .row(class)
                .to_vec(),
        })
    }

    /// Rearrange into `layout`.
    ///
    /// Per-class matrices of differing shapes cannot be stacked and are
    /// rejected as [`ExplainError::UnsupportedShape`].
    pub fn to_layout(&self, layout: AttributionLayout) -> Result<AttributionOutput, ExplainError> {
        let (rows, n_classes, cols) = self.shape()?;
        Ok(match (self, layout) {
            (AttributionOutput::PerClass(_), AttributionLayout::PerClass)
            | (AttributionOutput::Stacked(_), AttributionLayout::Stacked) => self.clone(),
            (AttributionOutput::Stacked(values), AttributionLayout::PerClass) => {
                AttributionOutput::PerClass(
                    values
                        .axis_iter(Axis(1))
                        .map(|class| class.to_owned())
                        .collect(),
                )
            }
            (AttributionOutput::PerClass(classes), AttributionLayout::Stacked) => {
                let mut values = Array3::zeros((rows, n_classes, cols));
                for (c, matrix) in classes.iter().enumerate() {
                    values.index_axis_mut(Axis(1), c).assign(matrix);
                }
                AttributionOutput::Stacked(values)
            }
        })
    }

    /// Build from nested vectors, e.g. attributions exported by another tool.
    ///
    /// For [`AttributionLayout::PerClass`] the nesting is
    /// `[class][instance][feature]`; for [`AttributionLayout::Stacked`] it is
    /// `[instance][class][feature]`. Ragged or empty input is rejected.
    pub fn from_nested(
        layout: AttributionLayout,
        values: Vec<Vec<Vec<f64>>>,
    ) -> Result<Self, ExplainError> {
        let outer = values.len();
        let middle = values.first().map(Vec::len).unwrap_or(0);
        let inner = values
            .first()
            .and_then(|m| m.first())
            .map(Vec::len)
            .unwrap_or(0);
        if outer == 0 || middle == 0 || inner == 0 {
            return Err(ExplainError::unsupported("attribution array is empty"));
        }

        let mut flat = Vec::with_capacity(outer * middle * inner);
        for (i, block) in values.into_iter().enumerate() {
            if block.len() != middle {
                return Err(ExplainError::unsupported(format!(
                    "ragged array: block {i} has {} rows, expected {middle}",
                    block.len()
                )));
            }
            for (j, row) in block.into_iter().enumerate() {
                if row.len() != inner {
                    return Err(ExplainError::unsupported(format!(
                        "ragged array: row [{i}][{j}] has {} values, expected {inner}",
                        row.len()
                    )));
                }
                flat.extend(row);
            }
        }

        let tensor = Array3::from_shape_vec((outer, middle, inner), flat)
            .map_err(|e| ExplainError::unsupported(e.to_string()))?;
        Ok(match layout {
            AttributionLayout::Stacked => AttributionOutput::Stacked(tensor),
            AttributionLayout::PerClass => AttributionOutput::PerClass(
                tensor.outer_iter().map(|m| m.to_owned()).collect(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn per_class() -> AttributionOutput {
        AttributionOutput::PerClass(vec![
            array![[1.0, 2.0], [3.0, 4.0]],
            array![[-1.0, -2.0], [-3.0, -4.0]],
            array![[0.0, 0.5], [0.5, 0.0]],
        ])
    }

    #[test]
    fn per_class_indexes_class_then_instance() {
        let output = per_class();
        assert_eq!(output.shape(), Ok((2, 3, 2)));
        assert_eq!(output.for_class(1, 0).unwrap(), vec![3.0, 4.0]);
        assert_eq!(output.for_class(0, 2).unwrap(), vec![0.0, 0.5]);
    }

    #[test]
    fn stacked_indexes_instance_then_class() {
        let stacked = per_class().to_layout(AttributionLayout::Stacked).unwrap();
        assert_eq!(stacked.layout(), AttributionLayout::Stacked);
        assert_eq!(stacked.shape(), Ok((2, 3, 2)));
        assert_eq!(stacked.for_class(1, 0).unwrap(), vec![3.0, 4.0]);
        assert_eq!(stacked.for_class(1, 1).unwrap(), vec![-3.0, -4.0]);
        assert_eq!(stacked.to_layout(AttributionLayout::PerClass), Ok(per_class()));
    }

    #[test]
    fn out_of_range_indices_are_errors() {
        let output = per_class();
        assert_eq!(
            output.for_class(0, 3),
            Err(ExplainError::ClassOutOfRange { class: 3, n_classes: 3 })
        );
        assert_eq!(
            output.for_class(2, 0),
            Err(ExplainError::InstanceOutOfRange { instance: 2, n_instances: 2 })
        );
    }

    #[test]
    fn mismatched_class_matrices_are_unsupported() {
        let output = AttributionOutput::PerClass(vec![
            array![[1.0, 2.0]],
            array![[1.0, 2.0, 3.0]],
        ]);
        assert!(matches!(output.for_class(0, 0), Err(ExplainError::UnsupportedShape(_))));
        assert!(matches!(
            output.to_layout(AttributionLayout::Stacked),
            Err(ExplainError::UnsupportedShape(_))
        ));
        assert!(matches!(
            AttributionOutput::PerClass(vec![]).to_layout(AttributionLayout::Stacked),
            Err(ExplainError::UnsupportedShape(_))
        ));
        assert!(matches!(
            AttributionOutput::PerClass(vec![]).for_class(0, 0),
            Err(ExplainError::UnsupportedShape(_))
        ));
    }

    #[test]
    fn from_nested_builds_both_layouts() {
        let per_class = AttributionOutput::from_nested(
            AttributionLayout::PerClass,
            vec![vec![vec![1.0, 2.0]], vec![vec![3.0, 4.0]]],
        )
        .unwrap();
        assert_eq!(per_class.for_class(0, 1).unwrap(), vec![3.0, 4.0]);

        let stacked = AttributionOutput::from_nested(
            AttributionLayout::Stacked,
            vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]],
        )
        .unwrap();
        assert_eq!(stacked.for_class(0, 1).unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn from_nested_rejects_ragged_and_empty() {
        let ragged = vec![vec![vec![1.0, 2.0], vec![3.0]]];
        assert!(matches!(
            AttributionOutput::from_nested(AttributionLayout::Stacked, ragged),
            Err(ExplainError::UnsupportedShape(_))
        ));
        assert!(AttributionOutput::from_nested(AttributionLayout::PerClass, vec![]).is_err());
    }

    #[test]
    fn layout_parses_from_config_strings() {
        assert_eq!("per_class".parse::<AttributionLayout>(), Ok(AttributionLayout::PerClass));
        assert_eq!("per-class".parse::<AttributionLayout>(), Ok(AttributionLayout::PerClass));
        assert_eq!("stacked".parse::<AttributionLayout>(), Ok(AttributionLayout::Stacked));
        assert!("flat".parse::<AttributionLayout>().is_err());
    }
}
