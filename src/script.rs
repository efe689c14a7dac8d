//! Batch driver for instruction scripts.
//!
//! A script is a whitespace separated token stream:
//!
//! ```text
//! n
//! x y        (n - 1 edges)
//! q
//! add t v    (q instructions, add or max)
//! max a b
//! ```
//!
//! Every `max` result is written to the output on its own line and flushed
//! straight away, so the output produced so far survives a failure later in
//! the batch.

use std::{
    fmt,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    str::{FromStr, SplitWhitespace},
    time::{Duration, Instant},
};

use colored::Colorize as _;
use tracing::{debug, debug_span, warn};

use crate::{
    error::{Result, TreeError},
    query::PathQuery,
    NodeId, Tree, TreeBuilder, Value,
};

/// Line written to the output when the batch hits an unknown instruction
pub const UNKNOWN_INSTRUCTION_LINE: &str = "Error! Incorrect instruction.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Add `value` to the subtree of `t`
    Add { t: NodeId, value: Value },
    /// Maximum value on the path between `a` and `b`
    Max { a: NodeId, b: NodeId },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Add { t, value } => write!(f, "add {} {}", t, value),
            Instruction::Max { a, b } => write!(f, "max {} {}", a, b),
        }
    }
}

/// A query that failed without stopping the batch
#[derive(Debug)]
pub struct QueryFailure {
    /// Position of the instruction in the batch, starting at 0
    pub index: usize,
    pub instruction: Instruction,
    pub error: TreeError,
}

/// Summary of a finished batch
#[derive(Debug, Default)]
pub struct RunReport {
    /// Number of instructions executed, failed ones included
    pub executed: usize,
    /// Results of the successful `max` instructions, in order
    pub outputs: Vec<Value>,
    pub failures: Vec<QueryFailure>,
    pub elapsed: Duration,
}

/// Whitespace tokenizer that remembers how many tokens it has handed out
struct Tokens<'input> {
    inner: SplitWhitespace<'input>,
    position: usize,
}

impl<'input> Tokens<'input> {
    fn new(input: &'input str) -> Self {
        Self {
            inner: input.split_whitespace(),
            position: 0,
        }
    }

    fn token(&mut self, what: &str) -> Result<&'input str> {
        let token = self.inner.next().ok_or_else(|| TreeError::Parse {
            position: self.position,
            message: format!("expected {}, found end of input", what),
        })?;
        self.position += 1;
        Ok(token)
    }

    fn number<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.token(what)?;
        token.parse().map_err(|_| TreeError::Parse {
            position: self.position - 1,
            message: format!("expected {}, found `{}`", what, token),
        })
    }

    /// Read the next instruction. Keywords are case insensitive.
    fn instruction(&mut self) -> Result<Instruction> {
        let keyword = self.token("instruction")?;

        if keyword.eq_ignore_ascii_case("add") {
            Ok(Instruction::Add {
                t: self.number("node id")?,
                value: self.number("value")?,
            })
        } else if keyword.eq_ignore_ascii_case("max") {
            Ok(Instruction::Max {
                a: self.number("node id")?,
                b: self.number("node id")?,
            })
        } else {
            Err(TreeError::UnknownInstruction(keyword.to_string()))
        }
    }
}

/// A loaded script: the tree it describes and its pending instructions.
pub struct Script<'input> {
    tokens: Tokens<'input>,
    tree: Tree,
    queries: usize,
}

impl<'input> Script<'input> {
    /// Read the node count, the edges and the instruction count.
    ///
    /// The edges are not checked for the tree property here; run the script
    /// with [`Script::run_indexed`] for that.
    pub fn load(input: &'input str) -> Result<Self> {
        let mut tokens = Tokens::new(input);

        let nodes: usize = tokens.number("node count")?;
        let mut builder = TreeBuilder::new(nodes);
        for _ in 0..nodes.saturating_sub(1) {
            let x = tokens.number("node id")?;
            let y = tokens.number("node id")?;
            builder = builder.edge(x, y)?;
        }
        let tree = builder.done()?;

        let queries = tokens.number("instruction count")?;

        Ok(Self {
            tokens,
            tree,
            queries,
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of instructions the script declares
    pub fn queries(&self) -> usize {
        self.queries
    }

    /// Run the instructions against the plain [`Tree`]
    pub fn run<W: Write>(self, out: W) -> Result<RunReport> {
        self.run_with(|tree| Ok(tree), out)
    }

    /// Validate and index the tree, then run the instructions against it
    pub fn run_indexed<W: Write>(self, out: W) -> Result<RunReport> {
        self.run_with(Tree::index, out)
    }

    /// Run the instructions against whatever `prepare` turns the loaded tree into
    pub fn run_with<T, F, W>(mut self, prepare: F, mut out: W) -> Result<RunReport>
    where
        T: PathQuery,
        F: FnOnce(Tree) -> Result<T>,
        W: Write,
    {
        let started = Instant::now();
        let span = debug_span!("script", nodes = self.tree.len(), queries = self.queries);
        let _enter = span.enter();

        let mut tree = prepare(self.tree)?;
        let mut report = RunReport::default();

        for index in 0..self.queries {
            let instruction = match self.tokens.instruction() {
                Ok(instruction) => instruction,
                Err(err @ TreeError::UnknownInstruction(_)) => {
                    warn!("{} {}", "Stopping batch:".red(), err);
                    writeln!(out, "{}", UNKNOWN_INSTRUCTION_LINE)
                        .and_then(|_| out.flush())
                        .map_err(|e| TreeError::io("writing output", e))?;
                    return Err(err);
                }
                Err(err) => return Err(err),
            };

            debug!("Instruction {}: {}", index, instruction);

            let result = match instruction {
                Instruction::Add { t, value } => tree.add_value(t, value),
                Instruction::Max { a, b } => tree.max(a, b).and_then(|max| {
                    writeln!(out, "{}", max)
                        .and_then(|_| out.flush())
                        .map_err(|e| TreeError::io("writing output", e))?;
                    report.outputs.push(max);
                    Ok(())
                }),
            };

            report.executed += 1;

            match result {
                Ok(()) => {}
                Err(error) if error.is_query_error() => {
                    warn!("{} {}: {}", "Failed".yellow(), instruction, error);
                    report.failures.push(QueryFailure {
                        index,
                        instruction,
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        report.elapsed = started.elapsed();
        debug!(
            "Finished {} instructions in {:.3} seconds",
            report.executed,
            report.elapsed.as_secs_f64()
        );

        Ok(report)
    }
}

/// Load a script from `input` and write its results to `output`, creating or
/// truncating it.
pub fn run_files(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<RunReport> {
    let input = input.as_ref();
    let output = output.as_ref();

    let text = std::fs::read_to_string(input)
        .map_err(|e| TreeError::io(format!("reading {}", input.display()), e))?;
    let file = File::create(output)
        .map_err(|e| TreeError::io(format!("creating {}", output.display()), e))?;

    Script::load(&text)?.run(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    const SAMPLE: &str = "4
        1 2
        1 3
        3 4
        5
        add 3 5
        max 2 4
        max 1 2
        add 1 -2
        max 3 4
    ";

    fn output(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    /// Writer that records what was written between flushes
    #[derive(Default)]
    struct FlushLog {
        pending: Vec<u8>,
        flushed: Vec<String>,
    }

    impl Write for FlushLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.pending.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            let chunk = std::mem::take(&mut self.pending);
            self.flushed.push(String::from_utf8(chunk).unwrap());
            Ok(())
        }
    }

    #[traced_test]
    #[test]
    fn sample() {
        let script = Script::load(SAMPLE).unwrap();
        assert_eq!(script.queries(), 5);
        assert_eq!(script.tree().edge_count(), 3);

        let mut out = Vec::new();
        let report = script.run(&mut out).unwrap();

        assert_eq!(output(out), "5\n0\n3\n");
        assert_eq!(report.executed, 5);
        assert_eq!(report.outputs, vec![5, 0, 3]);
        assert!(report.failures.is_empty());
    }

    #[traced_test]
    #[test]
    fn indexed_matches() {
        let mut plain = Vec::new();
        let mut indexed = Vec::new();

        Script::load(SAMPLE).unwrap().run(&mut plain).unwrap();
        Script::load(SAMPLE)
            .unwrap()
            .run_indexed(&mut indexed)
            .unwrap();

        assert_eq!(plain, indexed);
    }

    #[traced_test]
    #[test]
    fn keywords_ignore_case() {
        let input = "3 1 2 2 3 3 ADD 2 4 Max 1 3 mAx 1 1";
        let mut out = Vec::new();
        Script::load(input).unwrap().run(&mut out).unwrap();
        assert_eq!(output(out), "4\n0\n");
    }

    #[traced_test]
    #[test]
    fn unknown_instruction_stops_batch() {
        let input = "2 1 2 3 add 2 1 max 1 2 min 1 2";
        let mut out = Vec::new();

        let result = Script::load(input).unwrap().run(&mut out);

        assert!(matches!(
            result,
            Err(TreeError::UnknownInstruction(ref keyword)) if keyword == "min"
        ));
        assert_eq!(output(out), "1\nError! Incorrect instruction.\n");
    }

    #[traced_test]
    #[test]
    fn query_errors_continue() {
        let input = "3 1 2 1 3 4 max 0 1 add 7 1 add 3 2 max 2 3";
        let mut out = Vec::new();

        let report = Script::load(input).unwrap().run(&mut out).unwrap();

        assert_eq!(output(out), "2\n");
        assert_eq!(report.executed, 4);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].index, 0);
        assert_eq!(report.failures[0].instruction, Instruction::Max { a: 0, b: 1 });
        assert!(matches!(
            report.failures[1].error,
            TreeError::InvalidNodeId { id: 7, len: 3 }
        ));
    }

    #[traced_test]
    #[test]
    fn malformed_input() {
        assert!(matches!(
            Script::load("3 1 2"),
            Err(TreeError::Parse { position: 3, .. })
        ));
        assert!(matches!(
            Script::load("x"),
            Err(TreeError::Parse { position: 0, .. })
        ));
        assert!(matches!(
            Script::load("2 1 5 0"),
            Err(TreeError::InvalidNodeId { id: 5, len: 2 })
        ));
        assert!(matches!(Script::load("0 0"), Err(TreeError::EmptyTree)));

        // Declares two instructions but only has one
        let mut out = Vec::new();
        let result = Script::load("1 2 max 1 1").unwrap().run(&mut out);
        assert!(matches!(result, Err(TreeError::Parse { .. })));
        assert_eq!(output(out), "0\n");
    }

    #[traced_test]
    #[test]
    fn each_line_flushed() {
        let input = "3 1 2 1 3 5 max 1 2 add 2 4 max 1 2 max 3 3 sub 1 2";
        let mut log = FlushLog::default();

        let result = Script::load(input).unwrap().run(&mut log);

        assert!(matches!(result, Err(TreeError::UnknownInstruction(_))));
        assert_eq!(
            log.flushed,
            vec!["0\n", "4\n", "0\n", "Error! Incorrect instruction.\n"]
        );
        assert!(log.pending.is_empty());
    }

    #[traced_test]
    #[test]
    fn huge_node_count() {
        assert!(matches!(
            Script::load("1000000000000000000 1 2"),
            Err(TreeError::Parse { position: 3, .. })
        ));
        assert!(matches!(
            Script::load("1000000000000000000"),
            Err(TreeError::Parse { position: 1, .. })
        ));
    }

    #[traced_test]
    #[test]
    fn disconnected_input() {
        // Edges 1-2 twice leave 3 unreachable
        let input = "3 1 2 1 2 2 max 1 3 max 1 2";

        let mut out = Vec::new();
        let report = Script::load(input).unwrap().run(&mut out).unwrap();
        assert_eq!(output(out), "0\n");
        assert!(matches!(
            report.failures[0].error,
            TreeError::MalformedTopology { from: 1, to: 3 }
        ));

        let result = Script::load(input).unwrap().run_indexed(Vec::new());
        assert!(matches!(
            result,
            Err(TreeError::MalformedTopology { .. })
        ));
    }

    #[traced_test]
    #[test]
    fn files() {
        let dir = std::env::temp_dir().join(format!("sapling-script-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("input.txt");
        let output_path = dir.join("output.txt");
        std::fs::write(&input, SAMPLE).unwrap();

        let report = run_files(&input, &output_path).unwrap();
        assert_eq!(report.outputs, vec![5, 0, 3]);
        assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "5\n0\n3\n");

        assert!(matches!(
            run_files(dir.join("missing.txt"), &output_path),
            Err(TreeError::Io { .. })
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
