//! k8s-manifest-diff - CLI for comparing Kubernetes manifests.
//!
//! Exit codes: 0 when no differences are found, 1 when differences are
//! found, 2 on any error.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use k8s_manifest_diff::{diff, filter, parser};

#[derive(Debug, Parser)]
#[command(
    name = "k8s-manifest-diff",
    version,
    about = "Compare Kubernetes YAML manifests",
    long_about = "k8s-manifest-diff compares Kubernetes YAML manifests.\n\
                  It can filter resources by kind, label, or annotation, and masks\n\
                  Secret data values in diff output by default."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare two Kubernetes YAML files
    Diff(DiffArgs),
    /// Mask secrets in Kubernetes YAML manifests with filtering support
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
struct DiffArgs {
    /// Base manifest file
    base_file: PathBuf,
    /// Head manifest file
    head_file: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,

    /// Number of context lines in diff output
    #[arg(long, default_value_t = diff::DEFAULT_CONTEXT)]
    context: usize,

    /// Disable masking of Secret data values in diff output
    #[arg(long = "disable-masking-secret")]
    disable_masking_secret: bool,

    /// Output only the list of changed resources instead of the full diff
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Manifest files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[command(flatten)]
    filter: FilterArgs,

    /// Disable masking of Secret data values
    #[arg(long = "disable-masking-secret")]
    disable_masking_secret: bool,
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Kinds to exclude from the comparison (comma-separated or repeated)
    #[arg(long = "exclude-kinds", value_delimiter = ',')]
    exclude_kinds: Vec<String>,

    /// Label selector, e.g. 'app=nginx'. Can be specified multiple times.
    #[arg(long = "label")]
    labels: Vec<String>,

    /// Annotation selector, e.g. 'team=infra'. Can be specified multiple times.
    #[arg(long = "annotation")]
    annotations: Vec<String>,
}

impl FilterArgs {
    fn to_options(&self) -> filter::Options {
        filter::Options {
            exclude_kinds: self.exclude_kinds.clone(),
            label_selector: parse_selectors(&self.labels),
            annotation_selector: parse_selectors(&self.annotations),
        }
    }
}

/// Parses `key=value` selector flags into a map. Entries without `=` are
/// ignored, matching the original flag behavior.
fn parse_selectors(selectors: &[String]) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for selector in selectors {
        if let Some((key, value)) = selector.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    map
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Diff(args) => run_diff(&args),
        Command::Parse(args) => run_parse(&args),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run_diff(args: &DiffArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let base = fs::read_to_string(&args.base_file)
        .map_err(|e| format!("failed to read base file {:?}: {}", args.base_file, e))?;
    let head = fs::read_to_string(&args.head_file)
        .map_err(|e| format!("failed to read head file {:?}: {}", args.head_file, e))?;

    let opts = diff::Options {
        filter: args.filter.to_options(),
        context: args.context,
        disable_mask_secrets: args.disable_masking_secret,
    };

    let results = diff::yaml(&base, &head, &opts)?;

    if !results.has_changes() {
        println!("No differences found");
        return Ok(ExitCode::SUCCESS);
    }

    if args.summary {
        for (key, result) in results.iter() {
            if result.change_type == diff::ChangeType::Unchanged {
                continue;
            }
            println!("{} ({})", key.short_name(), result.change_type);
        }
    } else {
        print!("{}", results.to_diff_string());
    }

    Ok(ExitCode::from(1))
}

fn run_parse(args: &ParseArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let opts = parser::Options {
        filter: args.filter.to_options(),
        disable_masking_secrets: args.disable_masking_secret,
    };

    for (i, file) in args.files.iter().enumerate() {
        let input = fs::read_to_string(file)
            .map_err(|e| format!("failed to read file {:?}: {}", file, e))?;

        let set = parser::yaml(&input, &opts)
            .map_err(|e| format!("failed to process file {:?}: {}", file, e))?;

        if args.files.len() > 1 {
            println!("# File: {}", file.display());
        }
        print!("{}", set.to_yaml_string()?);

        if i + 1 < args.files.len() {
            println!("\n---\n");
        }
    }

    Ok(ExitCode::SUCCESS)
}
