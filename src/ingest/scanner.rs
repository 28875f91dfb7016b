//! Line scanning and edge extraction.
//!
//! Scanning happens in two stages. [`SyntaxScanner`] walks the lines in
//! order, tracking which syntaxes are active, and cuts the declaration body
//! out of each matching line. Splitting a body into sources and targets and
//! inserting the edges is independent per line and runs on a worker pool.

use std::io::{self, BufRead};
use std::num::NonZeroUsize;
use std::thread;

use log::{debug, info};

use super::lines::ContinuedLines;
use crate::graph::{Node, SyncedGraph};
use crate::syntax::Syntax;

/// Counters collected while ingesting one input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Logical lines read (after joining continuations)
    pub lines: usize,
    /// Lines that matched a syntax and were handed to the workers
    pub declarations: usize,
}

/// Tracks the active syntaxes and extracts declaration bodies line by line.
///
/// Syntaxes are tried in order and the first one that matches a line wins.
/// A syntax with a graph prefix only applies between a line containing the
/// prefix and a line containing its graph suffix (both inclusive).
#[derive(Debug)]
pub struct SyntaxScanner<'s> {
    syntaxes: &'s [Syntax],
    active: Vec<bool>,
}

impl<'s> SyntaxScanner<'s> {
    /// Creates a scanner with every block syntax inactive.
    pub fn new(syntaxes: &'s [Syntax]) -> Self {
        Self {
            syntaxes,
            active: vec![false; syntaxes.len()],
        }
    }

    /// Returns true if the syntax at `index` currently applies.
    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    /// Feeds one logical line to the scanner.
    ///
    /// # Returns
    ///
    /// The first matching syntax and the declaration body it found, or
    /// `None` if no active syntax matched.
    pub fn scan<'l>(&mut self, line: &'l str) -> Option<(&'s Syntax, &'l str)> {
        let syntaxes = self.syntaxes;
        for (index, syntax) in syntaxes.iter().enumerate() {
            if syntax.is_always_active() || line.contains(syntax.graph_prefix.as_str()) {
                if !self.active[index] && !syntax.is_always_active() {
                    debug!("Syntax block '{}' opened", syntax.graph_prefix);
                }
                self.active[index] = true;
            } else if !self.active[index] {
                continue;
            }

            if !syntax.graph_suffix.is_empty() && line.contains(syntax.graph_suffix.as_str()) {
                debug!("Syntax block '{}' closed", syntax.graph_prefix);
                self.active[index] = false;
            }

            if let Some(body) = declaration_body(line, syntax) {
                return Some((syntax, body));
            }
        }
        None
    }
}

/// Cuts the text between the edge prefix and the last edge suffix.
///
/// The body must contain the edge infix, otherwise the line is not a
/// declaration of this syntax.
fn declaration_body<'l>(line: &'l str, syntax: &Syntax) -> Option<&'l str> {
    let start = line.find(syntax.edge_prefix.as_str())? + syntax.edge_prefix.len();
    let end = line.rfind(syntax.edge_suffix.as_str())?;
    if start > end {
        return None;
    }
    let body = &line[start..end];
    body.contains(syntax.edge_infix.as_str()).then_some(body)
}

/// Splits a declaration body into its source and target names.
///
/// Names are trimmed when the syntax asks for it, one pair of surrounding
/// double quotes is removed, and empty names are dropped.
///
/// # Example
///
/// ```rust
/// use depgrapher::ingest::split_declaration;
/// use depgrapher::syntax::Syntax;
///
/// let (sources, targets) = split_declaration("a b: c d", &Syntax::makefile());
/// assert_eq!(sources, vec!["a", "b"]);
/// assert_eq!(targets, vec!["c", "d"]);
///
/// let (sources, targets) = split_declaration("\"a\" -> \"b\"", &Syntax::dot());
/// assert_eq!((sources, targets), (vec!["a"], vec!["b"]));
/// ```
pub fn split_declaration<'b>(body: &'b str, syntax: &Syntax) -> (Vec<&'b str>, Vec<&'b str>) {
    let Some((sources, targets)) = body.split_once(syntax.edge_infix.as_str()) else {
        return (Vec::new(), Vec::new());
    };
    (
        names(sources, &syntax.source_delimiter, syntax.strip_whitespace),
        names(targets, &syntax.target_delimiter, syntax.strip_whitespace),
    )
}

fn names<'b>(list: &'b str, delimiter: &str, strip_whitespace: bool) -> Vec<&'b str> {
    let parts: Vec<&str> = if delimiter.is_empty() {
        vec![list]
    } else {
        list.split(delimiter).collect()
    };

    parts
        .into_iter()
        .map(|name| if strip_whitespace { name.trim() } else { name })
        .map(unquote)
        .filter(|name| !name.is_empty())
        .collect()
}

fn unquote(name: &str) -> &str {
    name.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(name)
}

/// A declaration body waiting to be split by a worker.
struct Task<'s> {
    body: String,
    syntax: &'s Syntax,
}

fn worker_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn add_declaration<N>(graph: &SyncedGraph<N>, body: &str, syntax: &Syntax)
where
    N: Node + From<String>,
{
    let (sources, targets) = split_declaration(body, syntax);
    for source in &sources {
        for target in &targets {
            graph.add_edge_and_nodes(N::from(source.to_string()), N::from(target.to_string()));
        }
    }
}

/// Reads every line of `reader` and adds the declared edges to `graph`.
///
/// Lines are scanned on the calling thread; declaration bodies are split and
/// inserted by a pool of scoped workers (one per available CPU) fed through
/// a bounded queue. All workers are joined before this returns, also when a
/// read error stops the scan, so `graph` then holds every edge read so far.
///
/// # Errors
///
/// Returns the first read error, or `InvalidInput` if `syntaxes` is empty.
pub fn ingest_into<N, R>(
    graph: &SyncedGraph<N>,
    reader: R,
    syntaxes: &[Syntax],
) -> io::Result<IngestStats>
where
    N: Node + From<String> + Send + Sync,
    R: BufRead,
{
    if syntaxes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "at least one syntax is required",
        ));
    }

    let workers = worker_count();
    debug!("Ingesting with {} workers", workers);

    let stats = thread::scope(|scope| {
        let (sender, receiver) = crossbeam_channel::bounded::<Task<'_>>(workers);
        for _ in 0..workers {
            let receiver = receiver.clone();
            scope.spawn(move || {
                for task in receiver {
                    add_declaration(graph, &task.body, task.syntax);
                }
            });
        }
        drop(receiver);

        let mut scanner = SyntaxScanner::new(syntaxes);
        let mut stats = IngestStats::default();
        for line in ContinuedLines::new(reader) {
            let line = line?;
            stats.lines += 1;
            if let Some((syntax, body)) = scanner.scan(&line) {
                stats.declarations += 1;
                let task = Task {
                    body: body.to_string(),
                    syntax,
                };
                sender.send(task).map_err(|_| {
                    io::Error::new(io::ErrorKind::BrokenPipe, "ingestion workers stopped")
                })?;
            }
        }
        Ok::<_, io::Error>(stats)
    })?;

    info!(
        "Read {} lines with {} declarations ({} nodes, {} edges)",
        stats.lines,
        stats.declarations,
        graph.node_count(),
        graph.edge_count()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_body_makefile() {
        let make = Syntax::makefile();
        assert_eq!(declaration_body("a b: c d", &make), Some("a b: c d"));
        assert_eq!(declaration_body("\techo hello", &make), None);
    }

    #[test]
    fn test_declaration_body_uses_last_suffix() {
        let call = &Syntax::make_call()[0];
        assert_eq!(
            declaration_body("x $(call DEPEND_ALL,a,$(B),c) y", call),
            Some("a,$(B),c")
        );
        assert_eq!(declaration_body("$(call ALL_SPECS,a):", call), None);
    }

    #[test]
    fn test_declaration_body_suffix_before_prefix() {
        let bracketed = Syntax::new("", "[", " ", "=", " ", "]", "", true);
        assert_eq!(declaration_body("] a = b [", &bracketed), None);
        assert_eq!(declaration_body("[a = b]", &bracketed), Some("a = b"));
    }

    #[test]
    fn test_split_declaration() {
        let make = Syntax::makefile();
        let (sources, targets) = split_declaration(" 2 3: 4 5  6 7 ", &make);
        assert_eq!(sources, vec!["2", "3"]);
        assert_eq!(targets, vec!["4", "5", "6", "7"]);

        let (sources, targets) = split_declaration("clean:", &make);
        assert_eq!(sources, vec!["clean"]);
        assert!(targets.is_empty());
    }

    #[test]
    fn test_split_declaration_without_whitespace_stripping() {
        let syntax = Syntax {
            strip_whitespace: false,
            ..Syntax::dot()
        };
        let (sources, targets) = split_declaration(" a -> b", &syntax);
        assert_eq!(sources, vec![" a "]);
        assert_eq!(targets, vec![" b"]);
    }

    #[test]
    fn test_split_declaration_make_call() {
        let calls = Syntax::make_call();
        let (sources, targets) = split_declaration("lib, a, b", &calls[0]);
        assert_eq!(sources, vec!["lib"]);
        assert_eq!(targets, vec!["a", "b"]);

        let (sources, targets) = split_declaration("x,y): p q", &calls[1]);
        assert_eq!(sources, vec!["x", "y"]);
        assert_eq!(targets, vec!["p", "q"]);
    }

    #[test]
    fn test_scanner_block_activation() {
        let syntaxes = [Syntax::dot()];
        let mut scanner = SyntaxScanner::new(&syntaxes);

        assert!(scanner.scan("a -> b;").is_none());
        assert!(!scanner.is_active(0));

        assert!(scanner.scan("digraph{").is_none());
        assert!(scanner.is_active(0));

        let (syntax, body) = scanner.scan("  a -> b;").unwrap();
        assert_eq!(syntax, &syntaxes[0]);
        assert_eq!(body, "  a -> b");

        assert!(scanner.scan("}").is_none());
        assert!(!scanner.is_active(0));
        assert!(scanner.scan("c -> d;").is_none());
    }

    #[test]
    fn test_scanner_suffix_line_is_still_used() {
        let syntaxes = [Syntax::dot()];
        let mut scanner = SyntaxScanner::new(&syntaxes);
        scanner.scan("digraph{");
        let (_, body) = scanner.scan("a -> b; }").unwrap();
        assert_eq!(body, "a -> b");
        assert!(!scanner.is_active(0));
    }

    #[test]
    fn test_scanner_first_match_wins() {
        let syntaxes = vec![Syntax::makefile(), Syntax::dot()];
        let mut scanner = SyntaxScanner::new(&syntaxes);
        scanner.scan("digraph{");

        let (syntax, _) = scanner.scan("a -> b;").unwrap();
        assert_eq!(syntax, &Syntax::dot());

        let (syntax, _) = scanner.scan("x: y -> z;").unwrap();
        assert_eq!(syntax, &Syntax::makefile());
    }

    #[test]
    fn test_ingest_into_requires_syntax() {
        let graph: SyncedGraph = SyncedGraph::new();
        let err = ingest_into(&graph, "a:b\n".as_bytes(), &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_ingest_into_stats() {
        let graph: SyncedGraph = SyncedGraph::new();
        let input = "a: b \\\n c\n\n# comment\nd: a\n";
        let stats = ingest_into(&graph, input.as_bytes(), &[Syntax::makefile()]).unwrap();
        assert_eq!(
            stats,
            IngestStats {
                lines: 4,
                declarations: 2
            }
        );
        assert_eq!(graph.edge_count(), 3);
    }
}
