//! The line-oriented command language understood by [`crate::Session`].
//!
//! One command per line, `;` starts a comment:
//!
//! ```text
//! strategy path-reversal
//! merge (1,2), (1,3)
//! merge 4 3
//! explain 4 2
//! check-explain 4 2 (4,3) (3,1) (1,2)
//! fail explain 1 9
//! ```
use std::fmt::{self, Display, Formatter};

use crate::{
    explain::{Explanation, Proof},
    input::{parse_pair, parse_pairs},
    snapshot::Snapshot,
    util::{display_pairs, ListDisplay, PairDisplay},
    Element, Error, MergeOutcome, MergeStrategy, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start over with an empty forest using the given strategy.
    Strategy(MergeStrategy),
    Merge(Vec<(Element, Element)>),
    Find(Element),
    Depth(Element),
    Lca(Element, Element),
    Explain(Element, Element),
    Trace(Element, Element),
    CheckSame(Element, Element),
    CheckDistinct(Element, Element),
    CheckDepth(Element, usize),
    CheckExplain(Element, Element, Proof),
    Snapshot,
    Sets,
    /// The inner command must fail.
    Fail(Box<Command>),
}

impl Command {
    /// Parse a single line. Blank lines and comments parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = match line.split_once(';') {
            Some((code, _comment)) => code,
            None => line,
        }
        .trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match head {
            "strategy" => Command::Strategy(rest.parse().map_err(Error::Parse)?),
            "merge" if rest.contains('(') => Command::Merge(parse_pairs(rest)?),
            "merge" => {
                let (p, q) = two_elements(head, &args)?;
                Command::Merge(vec![(p, q)])
            }
            "find" => Command::Find(one_element(head, &args)?),
            "depth" => Command::Depth(one_element(head, &args)?),
            "lca" => {
                let (a, b) = two_elements(head, &args)?;
                Command::Lca(a, b)
            }
            "explain" => {
                let (a, b) = two_elements(head, &args)?;
                Command::Explain(a, b)
            }
            "trace" => {
                let (a, b) = two_elements(head, &args)?;
                Command::Trace(a, b)
            }
            "check-same" => {
                let (a, b) = two_elements(head, &args)?;
                Command::CheckSame(a, b)
            }
            "check-distinct" => {
                let (a, b) = two_elements(head, &args)?;
                Command::CheckDistinct(a, b)
            }
            "check-depth" => {
                let [x, depth] = args.as_slice() else {
                    return Err(arity(head, 2, args.len()));
                };
                Command::CheckDepth(element(x)?, number(depth)?)
            }
            "check-explain" => {
                let (ends, proof) = match rest.find('(') {
                    Some(open) => (&rest[..open], parse_proof(&rest[open..])?),
                    None => (rest, vec![]),
                };
                let ends: Vec<&str> = ends.split_whitespace().collect();
                let (a, b) = two_elements(head, &ends)?;
                Command::CheckExplain(a, b, proof)
            }
            "snapshot" => Command::Snapshot,
            "sets" => Command::Sets,
            "fail" => match Command::parse(rest)? {
                Some(inner) => Command::Fail(Box::new(inner)),
                None => return Err(Error::Parse("fail needs a command".to_string())),
            },
            _ => return Err(Error::UnknownCommand(head.to_string())),
        };
        Ok(Some(command))
    }
}

/// Parse a whole program, numbering errors by line.
pub fn parse_program(program: &str) -> Result<Vec<(usize, Command)>> {
    let mut commands = vec![];
    for (i, line) in program.lines().enumerate() {
        let command = Command::parse(line).map_err(|err| Error::Script {
            line: i + 1,
            source: Box::new(err),
        })?;
        commands.extend(command.map(|command| (i + 1, command)));
    }
    Ok(commands)
}

fn parse_proof(text: &str) -> Result<Proof> {
    let mut proof = vec![];
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        let close = rest
            .find(')')
            .ok_or_else(|| Error::Parse(format!("unclosed pair: {rest}")))?;
        proof.push(parse_pair(&rest[open + 1..close])?);
        rest = &rest[close + 1..];
    }
    Ok(proof)
}

fn element(arg: &str) -> Result<Element> {
    arg.parse()
        .map_err(|_| Error::Parse(format!("not an element: {arg}")))
}

fn number(arg: &str) -> Result<usize> {
    arg.parse()
        .map_err(|_| Error::Parse(format!("not a number: {arg}")))
}

fn arity(command: &str, expected: usize, found: usize) -> Error {
    Error::Parse(format!(
        "{command} takes {expected} argument(s), found {found}"
    ))
}

fn one_element(command: &str, args: &[&str]) -> Result<Element> {
    match args {
        [x] => element(x),
        _ => Err(arity(command, 1, args.len())),
    }
}

fn two_elements(command: &str, args: &[&str]) -> Result<(Element, Element)> {
    match args {
        [a, b] => Ok((element(a)?, element(b)?)),
        _ => Err(arity(command, 2, args.len())),
    }
}

/// The result of running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Strategy(MergeStrategy),
    Merged((Element, Element), MergeOutcome),
    Find(Element, Element),
    Depth(Element, usize),
    Lca(Element, Element, Element),
    Explain(Element, Element, Proof),
    Trace(Element, Element, Explanation),
    Snapshot(Snapshot),
    Sets(Vec<Vec<Element>>),
}

impl Display for CommandOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::Strategy(strategy) => write!(f, "strategy {strategy}"),
            CommandOutput::Merged((p, q), MergeOutcome::Joined { child, parent }) => {
                write!(f, "merge {}: {child} -> {parent}", PairDisplay(*p, *q))
            }
            CommandOutput::Merged((p, q), MergeOutcome::Redundant) => {
                write!(f, "merge {}: redundant", PairDisplay(*p, *q))
            }
            CommandOutput::Find(x, root) => write!(f, "find {x} = {root}"),
            CommandOutput::Depth(x, depth) => write!(f, "depth {x} = {depth}"),
            CommandOutput::Lca(a, b, anchor) => write!(f, "lca {a} {b} = {anchor}"),
            CommandOutput::Explain(a, b, proof) => {
                write!(f, "explain {a} {b}: {}", display_pairs(proof))
            }
            CommandOutput::Trace(a, b, explanation) => {
                for step in &explanation.trace {
                    writeln!(f, "  {step}")?;
                }
                write!(f, "explain {a} {b}: {}", display_pairs(&explanation.proof))
            }
            CommandOutput::Snapshot(snapshot) => {
                let edges: Vec<String> = snapshot
                    .edges
                    .iter()
                    .map(|edge| {
                        let (p, q) = edge.provenance;
                        format!(
                            "{}->{} {}",
                            edge.child,
                            edge.parent,
                            PairDisplay(p, q)
                        )
                    })
                    .collect();
                write!(
                    f,
                    "snapshot: vertices {}; edges {}",
                    ListDisplay(&snapshot.vertices, " "),
                    ListDisplay(&edges, ", ")
                )
            }
            CommandOutput::Sets(sets) => {
                let sets: Vec<String> = sets
                    .iter()
                    .map(|set| format!("{{{}}}", ListDisplay(set, " ")))
                    .collect();
                write!(f, "sets: {}", ListDisplay(&sets, " "))
            }
        }
    }
}
