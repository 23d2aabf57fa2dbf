//! Exporting the forest as a vertex/edge list for visualizers.
use serde::Serialize;

use crate::{unionfind::UnionFind, util::same_edge, Element, Result};

/// How a renderer should draw an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeHighlight {
    #[default]
    Normal,
    /// Part of the explanation step being shown.
    Selected,
    /// Part of an earlier explanation step.
    AlreadySelected,
}

/// A forest edge `child -> parent` and the merge that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeRecord {
    pub child: Element,
    pub parent: Element,
    pub provenance: (Element, Element),
    pub timestamp: usize,
    /// Depth of `parent`, used as the layout level.
    pub parent_depth: usize,
    pub highlight: EdgeHighlight,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Every registered element, in the order it was first seen.
    pub vertices: Vec<Element>,
    pub edges: Vec<EdgeRecord>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn edge(&self, child: Element) -> Option<&EdgeRecord> {
        self.edges.iter().find(|edge| edge.child == child)
    }
}

/// Edges to tag in a snapshot. Edges are matched regardless of direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlights {
    pub selected: Vec<(Element, Element)>,
    pub already_selected: Vec<(Element, Element)>,
}

impl Highlights {
    fn classify(&self, edge: (Element, Element)) -> EdgeHighlight {
        if self.selected.iter().any(|e| same_edge(e, &edge)) {
            EdgeHighlight::Selected
        } else if self.already_selected.iter().any(|e| same_edge(e, &edge)) {
            EdgeHighlight::AlreadySelected
        } else {
            EdgeHighlight::Normal
        }
    }
}

impl UnionFind {
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_with_highlights(&Highlights::default())
    }

    pub fn snapshot_with_highlights(&self, highlights: &Highlights) -> Snapshot {
        let vertices: Vec<Element> = self.elements().collect();
        let edges = (0..self.len())
            .filter_map(|i| {
                let parent = self.parent_index(i);
                if parent == i {
                    return None;
                }
                let (child, parent) = (self.key(i), self.key(parent));
                let record = self.provenance_index(i).zip(self.timestamp_index(i));
                debug_assert!(record.is_some(), "edge {child}->{parent} has no merge record");
                let Some((provenance, timestamp)) = record else {
                    log::error!("edge {child}->{parent} has no merge record, leaving it out");
                    return None;
                };
                Some(EdgeRecord {
                    child,
                    parent,
                    provenance,
                    timestamp,
                    parent_depth: self.depth(parent),
                    highlight: highlights.classify((child, parent)),
                })
            })
            .collect();
        Snapshot { vertices, edges }
    }

    /// One frame per decomposition step of `explain(a, b)`: the step's edge
    /// is `selected` and the edges of all earlier steps `already-selected`.
    pub fn explanation_frames(&mut self, a: Element, b: Element) -> Result<Vec<Snapshot>> {
        let explanation = self.explain_with_trace(a, b)?;
        let mut highlights = Highlights::default();
        let mut frames = Vec::with_capacity(explanation.trace.len());
        for step in &explanation.trace {
            highlights
                .already_selected
                .extend(highlights.selected.drain(..));
            highlights.selected.push(step.selected);
            frames.push(self.snapshot_with_highlights(&highlights));
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MergeStrategy;

    fn example() -> UnionFind {
        let mut uf = UnionFind::with_strategy(MergeStrategy::RootAttachment);
        for (p, q) in [(1, 2), (1, 3), (4, 3), (5, 4)] {
            uf.merge(p, q);
        }
        uf.find(6);
        uf
    }

    #[test]
    fn snapshot_lists_vertices_and_edges() {
        let uf = example();
        let snapshot = uf.snapshot();
        assert_eq!(snapshot.vertices, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(snapshot.edges.len(), 4);

        let edge = snapshot.edge(2).unwrap();
        assert_eq!((edge.child, edge.parent), (2, 3));
        assert_eq!(edge.provenance, (1, 3));
        assert_eq!(edge.timestamp, 1);
        assert_eq!(edge.parent_depth, 0);
        assert_eq!(snapshot.edge(1).unwrap().parent_depth, 1);
        assert!(snapshot.edge(3).is_none());
        assert!(snapshot
            .edges
            .iter()
            .all(|edge| edge.highlight == EdgeHighlight::Normal));
    }

    #[test]
    fn highlights_match_either_direction() {
        let uf = example();
        let snapshot = uf.snapshot_with_highlights(&Highlights {
            selected: vec![(3, 5)],
            already_selected: vec![(4, 3)],
        });
        assert_eq!(snapshot.edge(5).unwrap().highlight, EdgeHighlight::Selected);
        assert_eq!(
            snapshot.edge(4).unwrap().highlight,
            EdgeHighlight::AlreadySelected
        );
        assert_eq!(snapshot.edge(1).unwrap().highlight, EdgeHighlight::Normal);
    }

    #[test]
    fn explanation_frames_accumulate() {
        let mut uf = example();
        let frames = uf.explanation_frames(5, 2).unwrap();
        assert_eq!(frames.len(), 4);

        let tags = |frame: &Snapshot| {
            [1, 2, 4, 5].map(|child| frame.edge(child).unwrap().highlight)
        };
        use EdgeHighlight::*;
        assert_eq!(tags(&frames[0]), [Normal, Normal, Normal, Selected]);
        assert_eq!(tags(&frames[1]), [Normal, Normal, Selected, AlreadySelected]);
        assert_eq!(tags(&frames[2]), [Normal, Selected, AlreadySelected, AlreadySelected]);
        assert_eq!(
            tags(&frames[3]),
            [Selected, AlreadySelected, AlreadySelected, AlreadySelected]
        );
    }

    #[test]
    fn json_export() {
        let mut uf = UnionFind::default();
        uf.merge(1, 2);
        let json: serde_json::Value = serde_json::from_str(&uf.snapshot().to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "vertices": [1, 2],
                "edges": [{
                    "child": 1,
                    "parent": 2,
                    "provenance": [1, 2],
                    "timestamp": 0,
                    "parent_depth": 0,
                    "highlight": "normal",
                }],
            })
        );
    }
}
