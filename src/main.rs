//! profile-builder command-line interface

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use profile_builder::driver::{BuildOptions, BuildOutput, OutputLayout, build_profile, write_output};
use profile_builder::error::{ProfileError, Result};
use profile_builder::formatter::FormatOptions;
use profile_builder::project::{
    LatestOptions, LatestStrategy, ListStrategy, SelectionStrategy, StrategyKind,
};

/// Build a Go alias profile re-exporting versioned SDK packages
#[derive(Parser, Debug)]
#[command(name = "profile-builder", version, about)]
struct Cli {
    /// Profile name, appended to the user agent of the generated package
    #[arg(short, long, default_value = "")]
    name: String,

    /// Output file (merged layout) or directory (per-package layout); stdout if omitted
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Root directory of the versioned source packages
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// File listing one package directory per line; stdin if omitted
    #[arg(short, long, value_name = "FILE")]
    list: Option<PathBuf>,

    /// How packages are selected
    #[arg(short, long, value_enum, default_value_t = StrategyKind::List)]
    strategy: StrategyKind,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputLayout::Merged)]
    layout: OutputLayout,

    /// Package name of merged output
    #[arg(long, value_name = "NAME")]
    package: Option<String>,

    /// Skip preview API versions (latest strategy)
    #[arg(long)]
    exclude_preview: bool,

    /// Omit the go1.9 build constraint
    #[arg(long)]
    no_build_tag: bool,

    /// File whose text is written as the license header
    #[arg(long, value_name = "FILE")]
    license: Option<PathBuf>,

    /// Extract packages in parallel
    #[arg(short = 'j', long)]
    parallel: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let options = build_options(cli)?;
    options.validate(cli.output.as_deref())?;

    let cancel = CancellationToken::new();
    let output = select_and_build(cli, &options, &cancel)?;
    if output.skipped > 0 {
        tracing::warn!(count = output.skipped, "some functions were not re-exported");
    }
    write_output(&output, cli.output.as_deref(), &mut io::stdout().lock())
}

fn build_options(cli: &Cli) -> Result<BuildOptions> {
    let mut format = FormatOptions::default().with_build_tag(!cli.no_build_tag);
    if let Some(path) = &cli.license {
        let text = std::fs::read_to_string(path).map_err(|e| ProfileError::io(path, e))?;
        format = format.with_license_header(text);
    }

    let mut options = BuildOptions::new(cli.name.clone())
        .with_layout(cli.layout)
        .with_format(format)
        .with_parallel(cli.parallel);
    if let Some(package) = &cli.package {
        options = options.with_package_name(package.clone());
    }
    Ok(options)
}

fn select_and_build(
    cli: &Cli,
    options: &BuildOptions,
    cancel: &CancellationToken,
) -> Result<BuildOutput> {
    match cli.strategy {
        StrategyKind::Latest => {
            if cli.list.is_some() {
                return Err(ProfileError::config(
                    "--list only applies to the list strategy",
                ));
            }
            let Some(root) = &cli.root else {
                return Err(ProfileError::config("the latest strategy needs --root"));
            };
            let strategy = LatestStrategy::new(root)
                .with_options(LatestOptions::default().exclude_preview(cli.exclude_preview));
            tracing::info!(strategy = strategy.name(), root = %root.display(), "selecting packages");
            build_profile(strategy.packages(cancel.clone()), options, cancel)
        }
        StrategyKind::List => match &cli.list {
            Some(path) => {
                let file = File::open(path).map_err(|e| ProfileError::io(path, e))?;
                let strategy = with_root(ListStrategy::new(BufReader::new(file), path), cli);
                tracing::info!(strategy = strategy.name(), list = %path.display(), "selecting packages");
                build_profile(strategy.packages(cancel.clone()), options, cancel)
            }
            None => {
                let strategy = with_root(ListStrategy::new(io::stdin().lock(), "<stdin>"), cli);
                tracing::info!(strategy = strategy.name(), "selecting packages from stdin");
                build_profile(strategy.packages(cancel.clone()), options, cancel)
            }
        },
    }
}

fn with_root<R: io::BufRead>(strategy: ListStrategy<R>, cli: &Cli) -> ListStrategy<R> {
    match &cli.root {
        Some(root) => strategy.with_root(root),
        None => strategy,
    }
}
