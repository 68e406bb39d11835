/// A bijection on `0..n`, mapping the index of an actual group to the index of an ideal slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    /// Wraps `indices` if it is a bijection on `0..indices.len()`.
    pub fn from_indices(indices: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; indices.len()];
        for &i in &indices {
            if i >= seen.len() || seen[i] {
                return None;
            }
            seen[i] = true;
        }
        Some(Self { indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn apply(&self, index: usize) -> usize {
        self.indices[index]
    }

    pub fn is_identity(&self) -> bool {
        self.indices.iter().enumerate().all(|(i, &p)| i == p)
    }

    /// Reorders `items` so that position `i` of the result holds `items[self.apply(i)]`.
    pub fn apply_to<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.indices.iter().map(|&p| items[p].clone()).collect()
    }

    /// Every permutation of `0..n`, in lexicographic order.
    pub fn all(n: usize) -> Vec<Self> {
        Self::within_classes(&vec![(); n])
    }

    /// Every permutation that only exchanges indices of equal class, in lexicographic order.
    ///
    /// The identity always comes first. Exchanging two lone pairs, or two bonds of the same
    /// kind, yields an equivalent assignment, so these are the candidates worth testing when
    /// matching groups to ideal slots.
    pub fn within_classes<K: PartialEq>(classes: &[K]) -> Vec<Self> {
        let n = classes.len();
        let mut result = Vec::new();
        let mut current = Vec::with_capacity(n);
        let mut used = vec![false; n];
        Self::extend(classes, &mut current, &mut used, &mut result);
        result
    }

    fn extend<K: PartialEq>(
        classes: &[K],
        current: &mut Vec<usize>,
        used: &mut [bool],
        result: &mut Vec<Self>,
    ) {
        let position = current.len();
        if position == classes.len() {
            result.push(Self {
                indices: current.clone(),
            });
            return;
        }
        for candidate in 0..classes.len() {
            if used[candidate] || classes[candidate] != classes[position] {
                continue;
            }
            used[candidate] = true;
            current.push(candidate);
            Self::extend(classes, current, used, result);
            current.pop();
            used[candidate] = false;
        }
    }
}
