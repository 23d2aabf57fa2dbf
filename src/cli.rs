use crate::*;
use std::io::{self, BufRead, BufReader, Read, Write};

#[cfg(feature = "bin")]
pub mod bin {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    #[command(version, about = env!("CARGO_PKG_DESCRIPTION"))]
    struct Args {
        /// Command scripts to run; starts a REPL when none are given
        inputs: Vec<PathBuf>,
        /// How merges re-shape the forest
        #[clap(long, default_value_t = MergeStrategy::RootAttachment)]
        strategy: MergeStrategy,
        /// Merge pairs written literally, e.g. "(1,2), (1,3)"
        #[clap(long)]
        pairs: Option<String>,
        /// Read merge pairs from a file instead
        #[clap(long, conflicts_with = "pairs")]
        pairs_file: Option<PathBuf>,
        /// Only merge the first N pairs
        #[clap(long, default_value = "1000")]
        max_steps: usize,
        /// Explain the connection between two elements after merging
        #[clap(long, num_args = 2, value_names = ["A", "B"], allow_negative_numbers = true)]
        explain: Option<Vec<Element>>,
        /// Also print every decomposition step of the explanation
        #[clap(long, requires = "explain")]
        trace: bool,
        /// Writes the final forest as JSON to the given file
        #[clap(long)]
        to_json: Option<PathBuf>,
        /// Writes the final forest as a dot file to the given file
        #[clap(long)]
        to_dot: Option<PathBuf>,
        /// Prevents printing command outputs
        #[clap(long)]
        no_messages: bool,
    }

    /// Start the command-line interface.
    #[allow(clippy::disallowed_macros)]
    pub fn cli() {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .format_timestamp(None)
            .format_target(false)
            .parse_default_env()
            .init();

        let args = Args::parse();
        if let Err(err) = run(&args) {
            log::error!("{err}");
            std::process::exit(1)
        }
    }

    fn run(args: &Args) -> Result<()> {
        let mut session = Session::with_strategy(args.strategy);
        let pairs = match (&args.pairs, &args.pairs_file) {
            (Some(pairs), _) => Some(parse_pairs(pairs)?),
            (None, Some(path)) => Some(parse_pairs(&std::fs::read_to_string(path)?)?),
            (None, None) => None,
        };

        if let Some(pairs) = pairs {
            let config = TimelineConfig {
                strategy: args.strategy,
                max_steps: args.max_steps,
            };
            let mut timeline = Timeline::record(&pairs, config);
            timeline.finish();
            log::info!("{}", timeline.status());
            *session.forest_mut() = timeline.forest().clone();
        } else if args.inputs.is_empty() && args.explain.is_none() {
            log::info!("Welcome to the explain-uf REPL! ({} forest)", args.strategy);
            session.repl()?;
            return Ok(());
        }

        for input in &args.inputs {
            log::debug!("running {}", input.display());
            let program = std::fs::read_to_string(input)?;
            let outputs = session.run_program(&program)?;
            if !args.no_messages {
                for output in outputs {
                    println!("{output}");
                }
            }
        }

        if let Some([a, b]) = args.explain.as_deref() {
            let command = if args.trace {
                Command::Trace(*a, *b)
            } else {
                Command::Explain(*a, *b)
            };
            for output in session.run_command(command)? {
                println!("{output}");
            }
        }

        let snapshot = session.forest().snapshot();
        if let Some(path) = &args.to_json {
            std::fs::write(path, snapshot.to_json()?)?;
            log::info!("wrote {}", path.display());
        }
        if let Some(path) = &args.to_dot {
            std::fs::write(path, snapshot.to_dot())?;
            log::info!("wrote {}", path.display());
        }
        Ok(())
    }
}

impl Session {
    /// Start a Read-Eval-Print Loop with standard I/O.
    pub fn repl(&mut self) -> io::Result<()> {
        self.repl_with(io::stdin(), io::stdout())
    }

    /// Start a Read-Eval-Print Loop with the given input and output channel.
    /// Errors are logged and do not end the loop.
    pub fn repl_with<R, W>(&mut self, input: R, mut output: W) -> io::Result<()>
    where
        R: Read,
        W: Write,
    {
        for line in BufReader::new(input).lines() {
            let line = line?;
            let result = Command::parse(&line)
                .and_then(|command| match command {
                    Some(command) => self.run_command(command),
                    None => Ok(vec![]),
                });
            match result {
                Ok(outputs) => {
                    for out in outputs {
                        writeln!(output, "{out}")?;
                    }
                }
                Err(err) => log::error!("{err}"),
            }
        }
        Ok(())
    }
}
