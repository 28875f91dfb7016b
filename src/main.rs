use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use depgrapher::export::{self, ExportFormat};
use depgrapher::graph::{Graph, SyncedGraph};
use depgrapher::ingest;
use depgrapher::render::{self, TreeRenderer};
use depgrapher::syntax::{self, Syntax};

/// Value of `--outfile` that selects standard output.
const STDOUT: &str = "stdout";

#[derive(Parser)]
#[command(name = "depgrapher")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Dependency graphs from Makefiles, Dot files and similar formats", long_about = None)]
struct Cli {
    /// Syntaxes used to parse the input: preset names (Makefile, Dot, MakeCall)
    /// or inline definitions {"gp","ep","sd","in","td","es","gs",true}
    #[arg(short, long, default_value = "Makefile,Dot")]
    syntax: String,

    /// Write the graph to this file ("stdout" for standard output) instead
    /// of printing a tree
    #[arg(short, long)]
    outfile: Option<String>,

    /// Only show the dependencies of this node
    #[arg(short, long)]
    node: Option<String>,

    /// Format used with --outfile
    #[arg(short, long, default_value_t = ExportFormat::Dot)]
    format: ExportFormat,

    /// Wrap the tree at this many columns (defaults to the terminal width)
    #[arg(short, long)]
    width: Option<usize>,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,

    /// Input files, read in order (standard input when none are given)
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // info+ on stderr; --verbose enables debug; RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("depgrapher", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let syntaxes = syntax::parse(&cli.syntax)
        .with_context(|| format!("Invalid syntax selection '{}'", cli.syntax))?;
    debug!("Using {} syntaxes", syntaxes.len());

    let synced = read_graph(&cli.files, &syntaxes)?;
    let graph = synced.read();

    match &cli.outfile {
        Some(outfile) => write_graph(&graph, cli.node.as_deref(), outfile, cli.format),
        None => print_tree(&graph, cli.node.as_deref(), cli.width),
    }
}

fn read_graph(files: &[PathBuf], syntaxes: &[Syntax]) -> Result<SyncedGraph> {
    let graph = SyncedGraph::new();
    if files.is_empty() {
        debug!("No input files given, reading standard input");
        ingest::ingest_into(&graph, io::stdin().lock(), syntaxes)
            .context("Failed to read standard input")?;
    }
    for path in files {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        ingest::ingest_into(&graph, BufReader::new(file), syntaxes)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }
    Ok(graph)
}

fn write_graph(
    graph: &Graph,
    node: Option<&str>,
    outfile: &str,
    format: ExportFormat,
) -> Result<()> {
    let subgraph;
    let graph = match node {
        Some(name) => {
            subgraph = graph
                .get_dependency_graph(name)
                .with_context(|| format!("Unknown node '{}'", name))?;
            &subgraph
        }
        None => graph,
    };

    if outfile == STDOUT {
        let mut out = io::stdout().lock();
        export::export(format, graph, &mut out)?;
        return Ok(());
    }

    let file = File::create(outfile).with_context(|| format!("Failed to create {}", outfile))?;
    let mut out = BufWriter::new(file);
    export::export(format, graph, &mut out)
        .and_then(|_| out.flush())
        .with_context(|| format!("Failed to write {}", outfile))?;
    info!(
        "Wrote {} nodes and {} edges to {} as {}",
        graph.node_count(),
        graph.edge_count(),
        outfile,
        format
    );
    Ok(())
}

fn print_tree(graph: &Graph, node: Option<&str>, width: Option<usize>) -> Result<()> {
    let renderer = TreeRenderer::new(graph).max_width(width.or_else(render::terminal_width));
    let lines = match node {
        Some(name) => {
            let root = graph
                .get_node(name)
                .with_context(|| format!("Unknown node '{}'", name))?;
            renderer.render(root)
        }
        None => renderer.render_full(),
    };
    render::write_lines(&mut io::stdout().lock(), &lines)?;
    Ok(())
}
