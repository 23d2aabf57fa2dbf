//! The disjoint-set forest.
//!
//! Elements are interned into dense handles on first sight; the parent,
//! provenance and timestamp tables are parallel vectors indexed by handle.
//! No path compression is ever performed: every forest edge is a record of a
//! merge that actually happened, and the explanation engine relies on that.
use crate::{util::IndexSet, Element};

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// How an effective merge re-shapes the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MergeStrategy {
    /// Attach the root of the first element's tree under the root of the
    /// second's.
    #[default]
    RootAttachment,
    /// Reverse the chain from the first element up to its root, then hang the
    /// first element directly under the second.
    PathReversal,
}

impl Display for MergeStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::RootAttachment => write!(f, "root-attachment"),
            MergeStrategy::PathReversal => write!(f, "path-reversal"),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root-attachment" => Ok(MergeStrategy::RootAttachment),
            "path-reversal" => Ok(MergeStrategy::PathReversal),
            _ => Err(format!("Unknown merge strategy: {s}")),
        }
    }
}

/// The structural effect of a single `merge` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new forest edge `child -> parent` was created.
    Joined { child: Element, parent: Element },
    /// Both elements were already in the same set; only the log changed.
    Redundant,
}

/// A union-find forest that keeps the provenance of every edge.
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    strategy: MergeStrategy,
    elements: IndexSet<Element>,
    parents: Vec<usize>,
    /// The `(p, q)` passed to the merge that gave an element its parent.
    provenance: Vec<Option<(Element, Element)>>,
    /// Index into `merge_log` of that merge.
    timestamps: Vec<Option<usize>>,
    merge_log: Vec<(Element, Element)>,
    n_unions: usize,
}

impl UnionFind {
    pub fn with_strategy(strategy: MergeStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// The number of registered elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, x: Element) -> bool {
        self.elements.contains(&x)
    }

    /// All registered elements, in the order they were first seen.
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.elements.iter().copied()
    }

    /// Every pair ever passed to `merge`, redundant ones included. The
    /// position of a pair is its merge timestamp.
    pub fn merge_log(&self) -> &[(Element, Element)] {
        &self.merge_log
    }

    /// The number of merges that changed the forest.
    pub fn n_unions(&self) -> usize {
        self.n_unions
    }

    /// Get-or-insert the handle for `x`.
    pub(crate) fn index(&mut self, x: Element) -> usize {
        let (i, inserted) = self.elements.insert_full(x);
        if inserted {
            log::trace!("registered element {x} as handle {i}");
            self.parents.push(i);
            self.provenance.push(None);
            self.timestamps.push(None);
        }
        i
    }

    pub(crate) fn get_index(&self, x: Element) -> Option<usize> {
        self.elements.get_index_of(&x)
    }

    pub(crate) fn key(&self, index: usize) -> Element {
        self.elements[index]
    }

    pub(crate) fn parent_index(&self, index: usize) -> usize {
        self.parents[index]
    }

    pub(crate) fn provenance_index(&self, index: usize) -> Option<(Element, Element)> {
        self.provenance[index]
    }

    pub(crate) fn timestamp_index(&self, index: usize) -> Option<usize> {
        self.timestamps[index]
    }

    pub(crate) fn find_index(&self, mut current: usize) -> usize {
        while current != self.parents[current] {
            current = self.parents[current];
        }
        current
    }

    /// Find the representative of `x`'s set, registering `x` as a singleton
    /// if it has never been seen.
    pub fn find(&mut self, x: Element) -> Element {
        let index = self.index(x);
        let root = self.find_index(index);
        self.key(root)
    }

    /// Find the representative of `x`'s set without registering it.
    ///
    /// Unseen elements are their own representative.
    pub fn find_naive(&self, x: Element) -> Element {
        match self.get_index(x) {
            Some(index) => self.key(self.find_index(index)),
            None => x,
        }
    }

    pub fn same_set(&mut self, a: Element, b: Element) -> bool {
        self.find(a) == self.find(b)
    }

    /// The number of parent hops from `x` to its root; 0 for roots and
    /// unseen elements.
    pub fn depth(&self, x: Element) -> usize {
        let Some(mut current) = self.get_index(x) else {
            return 0;
        };
        let mut depth = 0;
        while current != self.parents[current] {
            current = self.parents[current];
            depth += 1;
        }
        depth
    }

    /// The current parent of `x`, or `None` if `x` is a root or unseen.
    pub fn parent(&self, x: Element) -> Option<Element> {
        let index = self.get_index(x)?;
        let parent = self.parents[index];
        (parent != index).then(|| self.key(parent))
    }

    /// The original merge pair behind the edge from `x` to its parent.
    pub fn provenance(&self, x: Element) -> Option<(Element, Element)> {
        self.get_index(x).and_then(|i| self.provenance[i])
    }

    /// The merge timestamp of the edge from `x` to its parent.
    pub fn timestamp(&self, x: Element) -> Option<usize> {
        self.get_index(x).and_then(|i| self.timestamps[i])
    }

    /// Merge the sets of `p` and `q` using the forest's strategy.
    ///
    /// The pair is logged even when the two are already joined.
    pub fn merge(&mut self, p: Element, q: Element) -> MergeOutcome {
        let timestamp = self.merge_log.len();
        self.merge_log.push((p, q));
        let index_p = self.index(p);
        let index_q = self.index(q);
        let root_p = self.find_index(index_p);
        let root_q = self.find_index(index_q);
        if root_p == root_q {
            log::debug!("merge #{timestamp} ({p},{q}) is redundant");
            return MergeOutcome::Redundant;
        }

        let (child, parent) = match self.strategy {
            MergeStrategy::RootAttachment => {
                self.attach(root_p, root_q, (p, q), timestamp);
                (root_p, root_q)
            }
            MergeStrategy::PathReversal => {
                self.reverse_path(index_p);
                self.attach(index_p, index_q, (p, q), timestamp);
                (index_p, index_q)
            }
        };
        self.n_unions += 1;
        debug_assert_eq!(self.find_index(index_p), self.find_index(index_q));

        let (child, parent) = (self.key(child), self.key(parent));
        log::debug!("merge #{timestamp} ({p},{q}) added edge {child} -> {parent}");
        MergeOutcome::Joined { child, parent }
    }

    fn attach(
        &mut self,
        child: usize,
        parent: usize,
        provenance: (Element, Element),
        timestamp: usize,
    ) {
        debug_assert_eq!(child, self.parents[child]);
        self.parents[child] = parent;
        self.provenance[child] = Some(provenance);
        self.timestamps[child] = Some(timestamp);
    }

    /// Flip every edge on the chain from `start` up to its root, so that the
    /// old root hangs below and `start` becomes a root. Each edge keeps its
    /// provenance and timestamp; they move to whichever endpoint is now the
    /// child.
    fn reverse_path(&mut self, start: usize) {
        let mut current = start;
        let mut carried = (self.provenance[start], self.timestamps[start]);
        let mut parent = self.parents[start];
        while parent != current {
            let next = self.parents[parent];
            let displaced = (self.provenance[parent], self.timestamps[parent]);
            self.parents[parent] = current;
            (self.provenance[parent], self.timestamps[parent]) = carried;
            carried = displaced;
            current = parent;
            parent = next;
        }
        self.parents[start] = start;
        self.provenance[start] = None;
        self.timestamps[start] = None;
    }

    /// The current partition, each set in registration order.
    pub fn sets(&self) -> Vec<Vec<Element>> {
        let mut sets = vec![vec![]; self.len()];
        for i in 0..self.len() {
            sets[self.find_index(i)].push(self.key(i));
        }
        sets.retain(|set| !set.is_empty());
        sets
    }
}
