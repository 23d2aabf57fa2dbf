//! Step-by-step recording of a merge sequence for playback.
//!
//! A [`Timeline`] holds one snapshot per step: frame `k` is the forest after
//! the first `k` merges. Scheduling the frames is left to the caller.
use std::fmt::{self, Display, Formatter};

use crate::{snapshot::Snapshot, Element, MergeStrategy, UnionFind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineConfig {
    pub strategy: MergeStrategy,
    /// Merges beyond this many are not recorded.
    pub max_steps: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            strategy: MergeStrategy::default(),
            max_steps: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineStatus {
    pub nodes: usize,
    pub edges: usize,
    /// Number of frames shown so far.
    pub position: usize,
    pub total: usize,
}

impl Display for TimelineStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes {} edges {} events {}/{}",
            self.nodes, self.edges, self.position, self.total
        )
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    frames: Vec<Snapshot>,
    forest: UnionFind,
    position: usize,
}

impl Timeline {
    pub fn record(pairs: &[(Element, Element)], config: TimelineConfig) -> Self {
        let mut forest = UnionFind::with_strategy(config.strategy);
        let mut frames = vec![forest.snapshot()];
        for &(p, q) in pairs.iter().take(config.max_steps) {
            forest.merge(p, q);
            frames.push(forest.snapshot());
        }
        if pairs.len() > config.max_steps {
            log::warn!(
                "recorded {} of {} merges (max steps reached)",
                config.max_steps,
                pairs.len()
            );
        }
        Self {
            frames,
            forest,
            position: 0,
        }
    }

    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    /// The forest after every recorded merge.
    pub fn forest(&self) -> &UnionFind {
        &self.forest
    }

    /// The most recently shown frame, if any.
    pub fn current(&self) -> Option<&Snapshot> {
        self.position.checked_sub(1).map(|i| &self.frames[i])
    }

    /// Move `steps` frames forwards (or backwards). Returns whether more
    /// frames remain in that direction.
    pub fn tick(&mut self, steps: usize, reverse: bool) -> bool {
        if reverse {
            self.position = self.position.saturating_sub(steps);
            self.position > 0
        } else {
            self.position = (self.position + steps).min(self.frames.len());
            self.position < self.frames.len()
        }
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Skip to the last frame.
    pub fn finish(&mut self) {
        self.position = self.frames.len();
    }

    pub fn status(&self) -> TimelineStatus {
        let (nodes, edges) = self
            .current()
            .map_or((0, 0), |frame| (frame.vertices.len(), frame.edges.len()));
        TimelineStatus {
            nodes,
            edges,
            position: self.position,
            total: self.frames.len(),
        }
    }
}
