//! Root paths and lowest common ancestors over the forest.
use smallvec::SmallVec;

use crate::{unionfind::UnionFind, util::same_edge, Element, Error, Result};

/// A forest edge as a pair of handles, `(child, parent)`.
pub(crate) type IndexEdge = (usize, usize);
pub(crate) type IndexPath = SmallVec<[IndexEdge; 8]>;

impl UnionFind {
    /// The edges `(node, parent)` walking from `x` up to its root.
    pub fn path_to_root(&mut self, x: Element) -> Vec<(Element, Element)> {
        let index = self.index(x);
        let root = self.find_index(index);
        self.path_to_ancestor(index, root)
            .into_iter()
            .map(|(child, parent)| (self.key(child), self.key(parent)))
            .collect()
    }

    /// The edges walking from `start` up to `ancestor`, which must lie on
    /// `start`'s root path. Stops at the root otherwise.
    pub(crate) fn path_to_ancestor(&self, start: usize, ancestor: usize) -> IndexPath {
        let mut path = IndexPath::new();
        let mut current = start;
        while current != ancestor {
            let parent = self.parent_index(current);
            if parent == current {
                break;
            }
            path.push((current, parent));
            current = parent;
        }
        path
    }

    /// The deepest node shared by the root paths of `a` and `b`.
    ///
    /// Both paths end in the same suffix when `a` and `b` share a root, so
    /// they are compared from the root end inward until they diverge.
    pub(crate) fn lca_index(&self, a: usize, b: usize) -> usize {
        let path_a = self.path_to_ancestor(a, self.find_index(a));
        let path_b = self.path_to_ancestor(b, self.find_index(b));
        debug_assert_eq!(self.find_index(a), self.find_index(b));

        let mut i = path_a.len();
        let mut j = path_b.len();
        while i > 0 && j > 0 && same_edge(&path_a[i - 1], &path_b[j - 1]) {
            i -= 1;
            j -= 1;
        }

        // the parent end of the first diverging edge; if one path was used
        // up entirely, its start is itself the ancestor of the other
        if i > 0 {
            path_a[i - 1].1
        } else if j > 0 {
            path_b[j - 1].1
        } else {
            a
        }
    }

    /// The lowest common ancestor of `a` and `b`.
    pub fn lca(&mut self, a: Element, b: Element) -> Result<Element> {
        let index_a = self.index(a);
        let index_b = self.index(b);
        if self.find_index(index_a) != self.find_index(index_b) {
            return Err(Error::NotConnected { a, b });
        }
        Ok(self.key(self.lca_index(index_a, index_b)))
    }
}
