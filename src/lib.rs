//! # explain-uf
//! A union-find forest that can explain itself.
//!
//! Besides answering whether two elements are in the same set, the forest
//! remembers which `merge` call created each of its edges. Given two
//! connected elements, [`UnionFind::explain`] reconstructs an ordered trail of
//! original merge calls that chains one to the other.
//!
//! ```
//! use explain_uf::UnionFind;
//!
//! let mut uf = UnionFind::default();
//! for (p, q) in [(1, 2), (1, 3), (4, 3), (5, 4)] {
//!     uf.merge(p, q);
//! }
//! assert_eq!(uf.find(5), uf.find(2));
//! assert_eq!(
//!     uf.explain(5, 2).unwrap(),
//!     vec![(5, 4), (4, 3), (3, 1), (1, 2)]
//! );
//! ```
//!
//! Forests can also be driven by a small command language through
//! [`Session`], exported as [`Snapshot`]s, or recorded step by step in a
//! [`Timeline`].
mod cli;
pub mod command;
mod explain;
#[cfg(feature = "graphviz")]
mod graph;
mod input;
mod lca;
mod snapshot;
mod timeline;
mod unionfind;
pub mod util;

#[cfg(test)]
mod tests;

use thiserror::Error;

#[cfg(feature = "bin")]
pub use cli::bin::*;
pub use command::{Command, CommandOutput};
pub use explain::{Explanation, Proof, Side, TraceStep};
pub use input::parse_pairs;
pub use snapshot::{EdgeHighlight, EdgeRecord, Highlights, Snapshot};
pub use timeline::{Timeline, TimelineConfig, TimelineStatus};
pub use unionfind::{MergeOutcome, MergeStrategy, UnionFind};

/// An element tracked by the forest.
pub type Element = i64;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{a} and {b} are not in the same set")]
    NotConnected { a: Element, b: Element },
    #[error("Broken invariant: {0}")]
    BrokenInvariant(String),
    #[error("Invalid proof: {0}")]
    InvalidProof(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No valid pairs found")]
    NoPairs,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Check failed: {0}")]
    CheckFailed(String),
    #[error("Command should have failed.")]
    ExpectFail,
    #[error("line {line}: {source}")]
    Script { line: usize, source: Box<Error> },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A forest driven by commands, as in scripts and the REPL.
#[derive(Debug, Clone, Default)]
pub struct Session {
    forest: UnionFind,
}

impl Session {
    pub fn with_strategy(strategy: MergeStrategy) -> Self {
        Self {
            forest: UnionFind::with_strategy(strategy),
        }
    }

    pub fn forest(&self) -> &UnionFind {
        &self.forest
    }

    pub fn forest_mut(&mut self) -> &mut UnionFind {
        &mut self.forest
    }

    /// Parse and run every command of `program`, stopping at the first error.
    pub fn run_program(&mut self, program: &str) -> Result<Vec<CommandOutput>> {
        let mut outputs = vec![];
        for (line, command) in command::parse_program(program)? {
            let output = self.run_command(command).map_err(|err| Error::Script {
                line,
                source: Box::new(err),
            })?;
            outputs.extend(output);
        }
        Ok(outputs)
    }

    pub fn run_command(&mut self, command: Command) -> Result<Vec<CommandOutput>> {
        let uf = &mut self.forest;
        let output = match command {
            Command::Strategy(strategy) => {
                log::info!("starting a new {strategy} forest");
                *uf = UnionFind::with_strategy(strategy);
                vec![CommandOutput::Strategy(strategy)]
            }
            Command::Merge(pairs) => pairs
                .into_iter()
                .map(|(p, q)| CommandOutput::Merged((p, q), uf.merge(p, q)))
                .collect(),
            Command::Find(x) => vec![CommandOutput::Find(x, uf.find(x))],
            Command::Depth(x) => vec![CommandOutput::Depth(x, uf.depth(x))],
            Command::Lca(a, b) => vec![CommandOutput::Lca(a, b, uf.lca(a, b)?)],
            Command::Explain(a, b) => vec![CommandOutput::Explain(a, b, uf.explain(a, b)?)],
            Command::Trace(a, b) => {
                vec![CommandOutput::Trace(a, b, uf.explain_with_trace(a, b)?)]
            }
            Command::CheckSame(a, b) => {
                if !uf.same_set(a, b) {
                    return Err(Error::CheckFailed(format!("{a} and {b} are in different sets")));
                }
                vec![]
            }
            Command::CheckDistinct(a, b) => {
                if uf.same_set(a, b) {
                    return Err(Error::CheckFailed(format!("{a} and {b} are in the same set")));
                }
                vec![]
            }
            Command::CheckDepth(x, expected) => {
                let depth = uf.depth(x);
                if depth != expected {
                    return Err(Error::CheckFailed(format!(
                        "depth of {x} is {depth}, expected {expected}"
                    )));
                }
                vec![]
            }
            Command::CheckExplain(a, b, expected) => {
                let proof = uf.explain(a, b)?;
                uf.check_proof(a, b, &proof)?;
                if proof != expected {
                    return Err(Error::CheckFailed(format!(
                        "explain {a} {b} gave {}, expected {}",
                        util::display_pairs(&proof),
                        util::display_pairs(&expected)
                    )));
                }
                vec![]
            }
            Command::Snapshot => vec![CommandOutput::Snapshot(uf.snapshot())],
            Command::Sets => vec![CommandOutput::Sets(uf.sets())],
            Command::Fail(inner) => match self.run_command(*inner) {
                Ok(_) => return Err(Error::ExpectFail),
                Err(err) => {
                    log::info!("command failed as expected: {err}");
                    vec![]
                }
            },
        };
        Ok(output)
    }
}
