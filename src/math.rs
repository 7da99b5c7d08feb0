use std::collections::BTreeSet;

use crate::automaton::StateIndex;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition is a different view on a congruence relation, by grouping states into their
/// respective classes under the relation. The position of a class in the partition is its id.
#[derive(Debug, Clone)]
pub struct Partition(Vec<BTreeSet<StateIndex>>);

impl std::ops::Deref for Partition {
    type Target = Vec<BTreeSet<StateIndex>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a BTreeSet<StateIndex>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<StateIndex>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Two partitions are equal if they consist of the same classes, the order of the classes
/// does not matter.
impl PartialEq for Partition {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl Eq for Partition {}

impl Partition {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators over state indices. Empty
    /// classes are dropped.
    pub fn new<X: IntoIterator<Item = StateIndex>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .filter(|class| !class.is_empty())
                .collect(),
        )
    }

    /// Creates a partition from a mapping that assigns a block id to each state, i.e. state `q`
    /// lies in block `block_ids[q]`. The ids need not be contiguous, they are compacted such that
    /// the resulting classes are numbered `0..k` in the order in which the blocks are first
    /// encountered when going through the states in ascending order.
    ///
    /// # Example
    /// ```
    /// use dfamin::prelude::*;
    ///
    /// let partition = Partition::from_block_ids(&[4, 2, 4, 7]);
    /// assert_eq!(partition.size(), 3);
    /// assert_eq!(partition.block_ids(), vec![0, 1, 0, 2]);
    /// ```
    pub fn from_block_ids(block_ids: &[usize]) -> Self {
        let mut compacted: Map<usize, usize> = Map::default();
        let mut classes: Vec<BTreeSet<StateIndex>> = vec![];
        for (q, id) in block_ids.iter().enumerate() {
            let class = *compacted.entry(*id).or_insert_with(|| {
                classes.push(BTreeSet::new());
                classes.len() - 1
            });
            classes[class].insert(q);
        }
        Self(classes)
    }

    /// Returns a vector which for each state contains the id of the class that it belongs to.
    /// States that are not covered by the partition are not accounted for, so this should only
    /// be called on partitions that cover `0..n` for some `n`.
    pub fn block_ids(&self) -> Vec<usize> {
        let size = self
            .iter()
            .filter_map(|class| class.last())
            .max()
            .map_or(0, |max| max + 1);
        let mut out = vec![0; size];
        for (id, class) in self.iter().enumerate() {
            for q in class {
                out[*q] = id;
            }
        }
        out
    }

    /// Tries to find the id of the class containing the given state `q`. If the state is not
    /// in the partition, `None` is returned.
    pub fn class_of(&self, q: StateIndex) -> Option<usize> {
        self.iter().position(|class| class.contains(&q))
    }

    /// Returns true if and only if the given states lie in the same class.
    pub fn equivalent(&self, p: StateIndex, q: StateIndex) -> bool {
        matches!((self.class_of(p), self.class_of(q)), (Some(x), Some(y)) if x == y)
    }
}

impl From<Vec<BTreeSet<StateIndex>>> for Partition {
    fn from(value: Vec<BTreeSet<StateIndex>>) -> Self {
        Self(value)
    }
}
