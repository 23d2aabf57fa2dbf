//! Explanations: why two elements ended up in the same set.
//!
//! A connectivity query is answered by taking the forest path between the
//! two elements, picking the most recent merge on that path, and splitting
//! the query around that merge's original arguments. Each half is explained
//! the same way until every piece is a literal merge call.
use std::fmt::{self, Display, Formatter};

use crate::{
    lca::IndexEdge,
    unionfind::UnionFind,
    util::{display_pairs, same_edge, HashSet, PairDisplay},
    Element, Error, Result,
};

/// An ordered trail of original merge pairs. Consecutive pairs share an
/// endpoint, so the trail reads as a chain from the first queried element
/// to the second.
pub type Proof = Vec<(Element, Element)>;

/// Which half of the connecting path an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Between the first queried element and the common ancestor.
    Left,
    /// Between the common ancestor and the second queried element.
    Right,
}

/// One decomposition step of an explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    /// The sub-query being explained.
    pub query: (Element, Element),
    /// Where the two root paths of the query meet.
    pub anchor: Element,
    /// The forest edges `(child, parent)` connecting the query, in order from
    /// the first element to the second.
    pub path: Vec<(Element, Element)>,
    /// The most recent edge on `path`.
    pub selected: (Element, Element),
    pub side: Side,
    /// The merge pair that created `selected`.
    pub provenance: (Element, Element),
    pub timestamp: usize,
}

impl Display for TraceStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (a, b) = self.query;
        let (child, parent) = self.selected;
        let (u, v) = self.provenance;
        write!(
            f,
            "explain {a} {b} via {}: path [{}], edge {child}->{parent} from merge #{} {}",
            self.anchor,
            display_pairs(&self.path),
            self.timestamp,
            PairDisplay(u, v),
        )
    }
}

/// A proof together with the steps that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Explanation {
    pub proof: Proof,
    pub trace: Vec<TraceStep>,
}

enum Task {
    Explain(usize, usize),
    Emit((Element, Element)),
}

impl UnionFind {
    /// Explain why `a` and `b` are in the same set.
    ///
    /// Returns [`Error::NotConnected`] when they are not.
    pub fn explain(&mut self, a: Element, b: Element) -> Result<Proof> {
        let (index_a, index_b) = self.connected_indices(a, b)?;
        self.decompose(index_a, index_b, None)
    }

    /// Like [`UnionFind::explain`], also returning every decomposition step in
    /// the order it was taken.
    pub fn explain_with_trace(&mut self, a: Element, b: Element) -> Result<Explanation> {
        let (index_a, index_b) = self.connected_indices(a, b)?;
        let mut trace = vec![];
        let proof = self.decompose(index_a, index_b, Some(&mut trace))?;
        Ok(Explanation { proof, trace })
    }

    fn connected_indices(&mut self, a: Element, b: Element) -> Result<(usize, usize)> {
        let index_a = self.index(a);
        let index_b = self.index(b);
        if self.find_index(index_a) != self.find_index(index_b) {
            return Err(Error::NotConnected { a, b });
        }
        Ok((index_a, index_b))
    }

    fn broken_invariant(&self, msg: String) -> Error {
        log::error!("explanation bookkeeping is corrupted: {msg}");
        Error::BrokenInvariant(msg)
    }

    /// Runs the decomposition on an explicit stack so that the depth of the
    /// forest never reaches the call stack.
    fn decompose(
        &self,
        a: usize,
        b: usize,
        mut trace: Option<&mut Vec<TraceStep>>,
    ) -> Result<Proof> {
        let mut proof = Proof::new();
        let mut tasks = vec![Task::Explain(a, b)];
        while let Some(task) = tasks.pop() {
            let (a, b) = match task {
                Task::Emit(pair) => {
                    proof.push(pair);
                    continue;
                }
                Task::Explain(a, b) if a == b => continue,
                Task::Explain(a, b) => (a, b),
            };
            // every merge appears at most once in a proof
            if proof.len() >= self.merge_log().len() {
                return Err(self.broken_invariant(format!(
                    "proof of ({},{}) outgrew the merge log",
                    self.key(a),
                    self.key(b)
                )));
            }

            let anchor = self.lca_index(a, b);
            let left = self.path_to_ancestor(a, anchor);
            let right = self.path_to_ancestor(b, anchor);
            let path = left
                .iter()
                .map(|&edge| (Side::Left, edge))
                .chain(right.iter().rev().map(|&edge| (Side::Right, edge)));

            let mut selected: Option<(usize, Side, IndexEdge)> = None;
            for (side, edge) in path {
                let timestamp = self.timestamp_index(edge.0).ok_or_else(|| {
                    self.broken_invariant(format!(
                        "edge {}->{} has no merge timestamp",
                        self.key(edge.0),
                        self.key(edge.1)
                    ))
                })?;
                if selected.map_or(true, |(best, ..)| timestamp > best) {
                    selected = Some((timestamp, side, edge));
                }
            }
            let Some((timestamp, side, (child, parent))) = selected else {
                return Err(self.broken_invariant(format!(
                    "no edge connects {} and {}",
                    self.key(a),
                    self.key(b)
                )));
            };
            let (u, v) = self.provenance_index(child).ok_or_else(|| {
                self.broken_invariant(format!(
                    "edge {}->{} has no provenance",
                    self.key(child),
                    self.key(parent)
                ))
            })?;

            let query = (self.key(a), self.key(b));
            log::trace!(
                "explaining ({},{}): merge #{timestamp} ({u},{v}) on the {side:?} side",
                query.0,
                query.1
            );
            if let Some(trace) = trace.as_deref_mut() {
                trace.push(TraceStep {
                    query,
                    anchor: self.key(anchor),
                    path: left
                        .iter()
                        .chain(right.iter().rev())
                        .map(|&(c, p)| (self.key(c), self.key(p)))
                        .collect(),
                    selected: (self.key(child), self.key(parent)),
                    side,
                    provenance: (u, v),
                    timestamp,
                });
            }

            if same_edge(&(u, v), &query) {
                proof.push(query);
                continue;
            }

            // the merge argument that sits below the selected edge; path
            // reversal can leave an edge pointing from `v` towards `u`
            let (below, above) = if v == self.key(child) { (v, u) } else { (u, v) };
            let (near_a, near_b) = match side {
                Side::Left => (below, above),
                Side::Right => (above, below),
            };
            let index_near_a = self.registered(near_a)?;
            let index_near_b = self.registered(near_b)?;
            tasks.push(Task::Explain(index_near_b, b));
            tasks.push(Task::Emit((near_a, near_b)));
            tasks.push(Task::Explain(a, index_near_a));
        }
        Ok(proof)
    }

    fn registered(&self, x: Element) -> Result<usize> {
        self.get_index(x)
            .ok_or_else(|| self.broken_invariant(format!("merge argument {x} was never registered")))
    }

    /// Check that `proof` justifies the connection between `a` and `b`: every
    /// pair must have been passed to `merge`, and the pairs taken together
    /// must connect `a` to `b`.
    pub fn check_proof(&self, a: Element, b: Element, proof: &[(Element, Element)]) -> Result<()> {
        let logged: HashSet<(Element, Element)> = self
            .merge_log()
            .iter()
            .flat_map(|&(p, q)| [(p, q), (q, p)])
            .collect();
        if let Some(&(p, q)) = proof.iter().find(|pair| !logged.contains(*pair)) {
            return Err(Error::InvalidProof(format!("({p},{q}) was never merged")));
        }

        let mut connected = UnionFind::default();
        for &(p, q) in proof {
            connected.merge(p, q);
        }
        if !connected.same_set(a, b) {
            return Err(Error::InvalidProof(format!(
                "{} does not connect {a} and {b}",
                display_pairs(proof)
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MergeStrategy;

    const STRATEGIES: [MergeStrategy; 2] =
        [MergeStrategy::RootAttachment, MergeStrategy::PathReversal];

    fn merged(strategy: MergeStrategy, pairs: &[(Element, Element)]) -> UnionFind {
        let mut uf = UnionFind::with_strategy(strategy);
        for &(p, q) in pairs {
            uf.merge(p, q);
        }
        uf
    }

    fn is_chain(a: Element, b: Element, proof: &[(Element, Element)]) -> bool {
        let mut at = a;
        for &(p, q) in proof {
            if p != at {
                return false;
            }
            at = q;
        }
        at == b
    }

    #[test]
    fn explains_the_worked_example() {
        for strategy in STRATEGIES {
            let mut uf = merged(strategy, &[(1, 2), (1, 3), (4, 3), (5, 4)]);
            assert_eq!(uf.find(5), uf.find(2));
            let proof = uf.explain(5, 2).unwrap();
            assert_eq!(proof, vec![(5, 4), (4, 3), (3, 1), (1, 2)], "{strategy}");
            uf.check_proof(5, 2, &proof).unwrap();
        }
    }

    #[test]
    fn a_literal_merge_explains_itself() {
        for strategy in STRATEGIES {
            let mut uf = merged(strategy, &[(1, 2), (2, 3), (3, 4)]);
            assert_eq!(uf.explain(3, 4).unwrap(), vec![(3, 4)]);
            assert_eq!(uf.explain(4, 3).unwrap(), vec![(4, 3)]);
        }
    }

    #[test]
    fn explaining_an_element_to_itself_is_empty() {
        let mut uf = merged(MergeStrategy::RootAttachment, &[(1, 2)]);
        assert_eq!(uf.explain(1, 1).unwrap(), vec![]);
        // unseen elements are fresh singletons
        assert_eq!(uf.explain(9, 9).unwrap(), vec![]);
    }

    #[test]
    fn disconnected_elements_are_an_error() {
        let mut uf = merged(MergeStrategy::RootAttachment, &[(1, 2), (3, 4)]);
        assert!(matches!(
            uf.explain(1, 3),
            Err(Error::NotConnected { a: 1, b: 3 })
        ));
        assert!(matches!(
            uf.explain(1, 77),
            Err(Error::NotConnected { a: 1, b: 77 })
        ));
        assert!(uf.contains(77));
    }

    #[test]
    fn proofs_are_chains_of_logged_merges() {
        let pairs = [
            (1, 2),
            (3, 4),
            (2, 4),
            (5, 6),
            (6, 1),
            (7, 8),
            (8, 9),
            (9, 3),
            (2, 3),
            (10, 5),
            (4, 10),
        ];
        for strategy in STRATEGIES {
            let mut uf = merged(strategy, &pairs);
            for a in 1..=10 {
                for b in 1..=10 {
                    let proof = uf.explain(a, b).unwrap();
                    assert!(is_chain(a, b, &proof), "{strategy}: {proof:?}");
                    uf.check_proof(a, b, &proof).unwrap();
                    let distinct: HashSet<_> = proof.iter().collect();
                    assert_eq!(distinct.len(), proof.len());
                }
            }
        }
    }

    #[test]
    fn trace_records_every_decomposition() {
        let mut uf = merged(
            MergeStrategy::RootAttachment,
            &[(1, 2), (1, 3), (4, 3), (5, 4)],
        );
        let Explanation { proof, trace } = uf.explain_with_trace(5, 2).unwrap();
        assert_eq!(proof, uf.explain(5, 2).unwrap());

        let queries: Vec<_> = trace.iter().map(|step| step.query).collect();
        assert_eq!(queries, vec![(5, 2), (4, 2), (3, 2), (1, 2)]);

        let first = &trace[0];
        assert_eq!(first.anchor, 3);
        assert_eq!(first.path, vec![(5, 3), (2, 3)]);
        assert_eq!(first.selected, (5, 3));
        assert_eq!(first.side, Side::Left);
        assert_eq!(first.provenance, (5, 4));
        assert_eq!(first.timestamp, 3);

        assert_eq!(trace[2].side, Side::Right);
        assert_eq!(trace[2].provenance, (1, 3));
        assert_eq!(
            trace[0].to_string(),
            "explain 5 2 via 3: path [(5,3) (2,3)], edge 5->3 from merge #3 (5,4)"
        );
    }

    #[test]
    fn most_recent_merge_splits_the_query() {
        // the direct merge (1,4) is older than the chain through 2 and 3, but
        // it created the only edge between 1 and 4
        let mut uf = merged(MergeStrategy::RootAttachment, &[(1, 4), (2, 3), (1, 2)]);
        assert_eq!(uf.explain(1, 4).unwrap(), vec![(1, 4)]);
        assert_eq!(uf.explain(3, 4).unwrap(), vec![(3, 2), (2, 1), (1, 4)]);
    }

    #[test]
    fn deep_chains_do_not_recurse() {
        let n = 3_000;
        for strategy in STRATEGIES {
            let mut uf = UnionFind::with_strategy(strategy);
            for i in 0..n {
                uf.merge(i, i + 1);
            }
            let proof = uf.explain(0, n).unwrap();
            assert_eq!(proof.len(), n as usize);
            assert!(is_chain(0, n, &proof));
        }
    }

    #[test]
    fn check_proof_rejects_bogus_trails() {
        let uf = merged(MergeStrategy::RootAttachment, &[(1, 2), (2, 3)]);
        assert!(uf.check_proof(1, 3, &[(1, 2), (2, 3)]).is_ok());
        assert!(uf.check_proof(1, 3, &[(3, 2), (2, 1)]).is_ok());
        assert!(matches!(
            uf.check_proof(1, 3, &[(1, 3)]),
            Err(Error::InvalidProof(_))
        ));
        assert!(matches!(
            uf.check_proof(1, 3, &[(1, 2)]),
            Err(Error::InvalidProof(_))
        ));
    }
}
