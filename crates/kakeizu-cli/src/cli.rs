//! Command-line interface for the kakeizu utility
//!
//! Reads a family tree as JSON and prints its layout, its flow graph, its
//! generation rows, or the problems found in it.

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::colorizer::render_rows;
use kakeizu::core::logging::init_logging;
use kakeizu::flow::FlowBuilder;
use kakeizu::rank::generation_rows;
use kakeizu::tree::Tree;
use kakeizu::{Direction, LayoutConfig, PlacementStrategy};

/// Kakeizu - lay out Japanese family trees
#[derive(Parser)]
#[command(name = "kakeizu")]
#[command(about = "Lay out family trees given as JSON person lists")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lay out a tree and print positioned nodes and edges as JSON
    Layout {
        /// Input tree JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Layout direction (TB|BT|LR|RL)
        #[arg(short, long, default_value = "TB")]
        direction: Direction,

        /// Node placement strategy (simple|linear-segments)
        #[arg(long, default_value = "simple")]
        placement: PlacementStrategy,

        /// Gap between generations
        #[arg(long)]
        layer_spacing: Option<f64>,

        /// Gap between neighbouring nodes
        #[arg(long)]
        node_spacing: Option<f64>,
    },

    /// Print the flow graph without positions
    Flow {
        /// Input tree JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print generation rows, ancestors first
    Rows {
        /// Input tree JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Report dangling references and inconsistent spouse links
    Check {
        /// Input tree JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
#[derive(Default)]
pub struct KakeizuApp {
    config: LayoutConfig,
}

impl KakeizuApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new application instance with a layout config
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var(kakeizu::LOG_LEVEL_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var(kakeizu::LOG_FORMAT_ENV)
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Kakeizu v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Layout {
                input,
                output,
                direction,
                placement,
                layer_spacing,
                node_spacing,
            } => {
                let mut config = self.config.clone().with_direction(direction).with_placement(placement);
                config.layer_spacing = layer_spacing.unwrap_or(config.layer_spacing);
                config.node_spacing = node_spacing.unwrap_or(config.node_spacing);
                self.config = config;
                self.layout_command(input, output, cli.verbose)
            }
            Commands::Flow { input, output } => self.flow_command(input, output, cli.verbose),
            Commands::Rows { input, output, color } => self.rows_command(input, output, color, cli.verbose),
            Commands::Check { input } => self.check_command(input, cli.verbose),
        }
    }

    /// Handle the layout command
    fn layout_command(&self, input: Option<PathBuf>, output: Option<PathBuf>, verbose: bool) -> Result<()> {
        let tree = self.read_tree(input, verbose)?;
        let graph = kakeizu::layout_tree_with_config(&tree, &self.config)?;
        info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "Laid out tree");

        if verbose {
            eprintln!(
                "Laid out {} nodes and {} edges ({})",
                graph.nodes.len(),
                graph.edges.len(),
                self.config.direction
            );
        }
        self.write_output(output, &graph.to_json()?)
    }

    /// Handle the flow command
    fn flow_command(&self, input: Option<PathBuf>, output: Option<PathBuf>, verbose: bool) -> Result<()> {
        let tree = self.read_tree(input, verbose)?;
        let graph = FlowBuilder::with_config(self.config.clone()).build(&tree);
        self.write_output(output, &graph.to_json()?)
    }

    /// Handle the rows command
    fn rows_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        color: ColorChoice,
        verbose: bool,
    ) -> Result<()> {
        let tree = self.read_tree(input, verbose)?;
        let rows = generation_rows(&tree);
        if verbose {
            eprintln!("{} generation(s)", rows.len());
        }
        let colored = self.should_colorize(&output, color);
        self.write_output(output, &render_rows(&rows, colored))
    }

    /// Handle the check command
    fn check_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let tree = self.read_tree(input, verbose)?;
        let issues = tree.validate();
        if issues.is_empty() {
            println!("✓ {} people, no issues", tree.len());
            return Ok(());
        }
        for issue in &issues {
            println!("✗ {}", issue);
        }
        bail!("{} issue(s) found", issues.len())
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    fn read_tree(&self, input: Option<PathBuf>, verbose: bool) -> Result<Tree> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let tree = Tree::from_json(&content).map_err(|e| anyhow!("Invalid tree: {}", e))?;
        debug!(people = tree.len(), "Parsed tree");
        Ok(tree)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content)
                    .map_err(|e| anyhow!("Failed to write output file '{}': {}", path.display(), e))?;
            }
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
