use std::fmt::{self, Display, Formatter};

use crate::Element;

pub(crate) type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;
pub(crate) type HashSet<K> = hashbrown::HashSet<K, BuildHasher>;
pub type IndexSet<K> = indexmap::IndexSet<K, BuildHasher>;

/// Displays the items of a slice separated by the given string.
pub struct ListDisplay<'a, T>(pub &'a [T], pub &'a str);

impl<T: Display> Display for ListDisplay<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(self.1)?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// A pair of elements, printed the way merge inputs are written: `(p,q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairDisplay(pub Element, pub Element);

impl Display for PairDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

/// Displays a sequence of pairs as `(a,b) (c,d) ...`.
pub(crate) fn display_pairs(pairs: &[(Element, Element)]) -> String {
    let pairs: Vec<PairDisplay> = pairs.iter().map(|&(p, q)| PairDisplay(p, q)).collect();
    ListDisplay(&pairs, " ").to_string()
}

/// Undirected equality of two edges.
pub(crate) fn same_edge<T: PartialEq>(x: &(T, T), y: &(T, T)) -> bool {
    (x.0 == y.0 && x.1 == y.1) || (x.0 == y.1 && x.1 == y.0)
}
