//! Feature path bookkeeping for TreeSHAP.
//!
//! Tracks, along the current root-to-node path, which features were split on
//! and the proportion of all feature subsets of each size that reach the
//! node (Lundberg et al., "Consistent Individualized Feature Attribution for
//! Tree Ensembles", Algorithm 2).

/// One unique feature on the current path.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PathElement {
    /// `None` for the root sentinel.
    pub feature: Option<usize>,
    /// Fraction of cover flowing this way when the feature is absent.
    pub zero_fraction: f64,
    /// 1.0 if the instance goes this way when the feature is present, else 0.0.
    pub one_fraction: f64,
    /// Permutation weight for subsets of this size.
    pub pweight: f64,
}

/// The unique-feature path from the root to the current node.
#[derive(Debug, Clone, Default)]
pub(crate) struct FeaturePath {
    elements: Vec<PathElement>,
}

impl FeaturePath {
    pub fn with_capacity(depth: usize) -> Self {
        Self {
            elements: Vec::with_capacity(depth + 1),
        }
    }

    /// Index of the last element (the path's unique depth).
    #[inline]
    fn depth(&self) -> usize {
        self.elements.len() - 1
    }

    /// Number of real features on the path (the root sentinel excluded).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.elements.len().saturating_sub(1)
    }

    #[inline]
    pub fn element(&self, i: usize) -> &PathElement {
        &self.elements[i]
    }

    /// Position of `feature` on the path, if it was split on above.
    pub fn position_of(&self, feature: usize) -> Option<usize> {
        self.elements
            .iter()
            .position(|e| e.feature == Some(feature))
    }

    /// Append a feature and update the subset weights.
    pub fn extend(&mut self, feature: Option<usize>, zero_fraction: f64, one_fraction: f64) {
        let d = self.elements.len();
        self.elements.push(PathElement {
            feature,
            zero_fraction,
            one_fraction,
            pweight: if d == 0 { 1.0 } else { 0.0 },
        });
        let denom = (d + 1) as f64;
        for i in (0..d).rev() {
            let carried = one_fraction * self.elements[i].pweight * (i + 1) as f64 / denom;
            self.elements[i + 1].pweight += carried;
            self.elements[i].pweight = zero_fraction * self.elements[i].pweight * (d - i) as f64 / denom;
        }
    }

    /// Remove the element at `index`, undoing its effect on the weights.
    pub fn unwind(&mut self, index: usize) {
        let d = self.depth();
        let one = self.elements[index].one_fraction;
        let zero = self.elements[index].zero_fraction;
        let denom = (d + 1) as f64;
        let mut next_one_portion = self.elements[d].pweight;

        for i in (0..d).rev() {
            if one != 0.0 {
                let tmp = self.elements[i].pweight;
                self.elements[i].pweight = next_one_portion * denom / ((i + 1) as f64 * one);
                next_one_portion = tmp - self.elements[i].pweight * zero * (d - i) as f64 / denom;
            } else {
                self.elements[i].pweight = self.elements[i].pweight * denom / (zero * (d - i) as f64);
            }
        }

        for i in index..d {
            self.elements[i].feature = self.elements[i + 1].feature;
            self.elements[i].zero_fraction = self.elements[i + 1].zero_fraction;
            self.elements[i].one_fraction = self.elements[i + 1].one_fraction;
        }
        self.elements.pop();
    }

    /// Total subset weight with the element at `index` unwound, without
    /// modifying the path.
    pub fn unwound_sum(&self, index: usize) -> f64 {
        let d = self.depth();
        let one = self.elements[index].one_fraction;
        let zero = self.elements[index].zero_fraction;
        let denom = (d + 1) as f64;
        let mut next_one_portion = self.elements[d].pweight;
        let mut total = 0.0;

        for i in (0..d).rev() {
            if one != 0.0 {
                let tmp = next_one_portion * denom / ((i + 1) as f64 * one);
                total += tmp;
                next_one_portion = self.elements[i].pweight - tmp * zero * (d - i) as f64 / denom;
            } else if zero != 0.0 {
                total += self.elements[i].pweight / zero / ((d - i) as f64 / denom);
            }
        }
        total
    }
}
