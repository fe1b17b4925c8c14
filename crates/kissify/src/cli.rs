//! Command-line host for the transform
//!
//! Reads lowered JavaScript files, rewrites each into a registration call and
//! prints the result. A failing file is reported and skipped; the run as a
//! whole fails if any file did.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use log::{LevelFilter, debug, error, info};
use rustc_hash::FxHashMap;

use crate::{
    config::Config,
    module_name::{
        FixedModuleName, ModuleNameResolver, ModuleSource, NoModuleName, RelativePathModuleName,
    },
    source,
    transform::{ModuleTransform, TransformOutcome},
};

#[derive(Parser, Debug)]
#[command(name = "kissify", version, about)]
pub struct Cli {
    /// CommonJS-lowered JavaScript modules to wrap
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write `<stem>.js` files into this directory instead of stdout;
    /// inputs sharing a stem are rejected
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: discover `kissify.toml`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Register the module under this name (single input only)
    #[arg(long, conflicts_with_all = ["module_ids", "module_root"])]
    pub module_name: Option<String>,

    /// Derive module names from file paths
    #[arg(long)]
    pub module_ids: bool,

    /// Prefix for path-derived module names; implies --module-ids
    #[arg(long)]
    pub module_root: Option<String>,

    /// Log the dependencies registered for every module
    #[arg(long)]
    pub report: bool,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease log verbosity
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

impl Cli {
    /// Warnings by default, info with `--report`, shifted by `-v`/`-q`
    pub fn log_level(&self) -> LevelFilter {
        let base: i16 = if self.report { 3 } else { 2 };
        match base + i16::from(self.verbose) - i16::from(self.quiet) {
            i16::MIN..=0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Load the configuration and fold the command-line overrides into it
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => {
                let cwd = std::env::current_dir().context("Failed to read current directory")?;
                Config::discover(&cwd)?
            }
        };
        if self.module_ids {
            config.module_ids.enabled = true;
        }
        if let Some(root) = &self.module_root {
            config.module_ids.enabled = true;
            config.module_ids.module_root = Some(root.clone());
        }
        Ok(config)
    }
}

/// Pick the name resolver for this invocation
pub fn build_resolver(cli: &Cli, config: &Config) -> Result<Box<dyn ModuleNameResolver>> {
    if let Some(name) = &cli.module_name {
        if cli.inputs.len() > 1 {
            bail!("--module-name can only be used with a single input");
        }
        return Ok(Box::new(FixedModuleName(name.clone())));
    }
    if !config.module_ids.enabled {
        return Ok(Box::new(NoModuleName));
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let source_root = match &config.module_ids.source_root {
        Some(root) => resolve_path(&cwd.join(root)),
        None => resolve_path(&cwd),
    };
    debug!("Deriving module names relative to {}", source_root.display());
    Ok(Box::new(RelativePathModuleName::new(
        source_root,
        config.module_ids.module_root.clone(),
    )))
}

/// Parse, transform and print one module
pub fn transform_source(
    code: &str,
    name: &str,
    config: &Config,
    resolver: &dyn ModuleNameResolver,
    module: ModuleSource<'_>,
) -> Result<(String, TransformOutcome)> {
    let mut parsed = source::parse(code, name)?;
    let outcome = ModuleTransform::new(config, resolver, module).run(&mut parsed.program)?;
    let printed = source::print(&parsed.program, &parsed.source_map)?;
    Ok((printed, outcome))
}

/// Read and transform the module at `path`
pub fn transform_file(
    path: &Path,
    config: &Config,
    resolver: &dyn ModuleNameResolver,
) -> Result<(String, TransformOutcome)> {
    let code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let absolute = resolve_path(path);
    transform_source(
        &code,
        &path.display().to_string(),
        config,
        resolver,
        ModuleSource::from_path(&absolute),
    )
    .with_context(|| format!("Failed to transform {}", path.display()))
}

/// Canonical form of `path`, or its lexically absolute form when it cannot
/// be canonicalized
fn resolve_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|err| {
            debug!("Failed to resolve {}: {err}", path.display());
            path.to_path_buf()
        })
}

/// `<dir>/<stem>.js` for every input
///
/// Fails before anything is written when two inputs would share a target.
fn output_targets(inputs: &[PathBuf], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut claimed: FxHashMap<PathBuf, &Path> = FxHashMap::default();
    inputs
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .with_context(|| format!("{} has no file name", input.display()))?;
            let target = dir.join(format!("{}.js", stem.to_string_lossy()));
            if let Some(previous) = claimed.insert(target.clone(), input) {
                bail!(
                    "{} and {} would both be written to {}",
                    previous.display(),
                    input.display(),
                    target.display()
                );
            }
            Ok(target)
        })
        .collect()
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let resolver = build_resolver(cli, &config)?;

    let targets: Vec<Option<PathBuf>> = match &cli.output {
        Some(dir) => {
            let targets = output_targets(&cli.inputs, dir)?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
            targets.into_iter().map(Some).collect()
        }
        None => vec![None; cli.inputs.len()],
    };

    let mut failures = 0usize;
    for (input, target) in cli.inputs.iter().zip(&targets) {
        let result = transform_file(input, &config, resolver.as_ref())
            .and_then(|(code, outcome)| {
                if cli.report {
                    report(input, &outcome);
                }
                write_output(target.as_deref(), &code)
            });
        if let Err(err) = result {
            error!("{err:#}");
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} modules failed", cli.inputs.len());
    }
    Ok(())
}

fn report(input: &Path, outcome: &TransformOutcome) {
    match outcome {
        TransformOutcome::Transformed(summary) => info!(
            "{}: name {}, requires {:?}, cssRequires {:?}",
            input.display(),
            summary.module_name.as_deref().unwrap_or("<anonymous>"),
            summary.requires().collect::<Vec<_>>(),
            summary
                .stylesheets
                .iter()
                .map(|path| &**path)
                .collect::<Vec<_>>()
        ),
        TransformOutcome::AlreadyTransformed => {
            info!("{}: already transformed", input.display());
        }
    }
}

fn write_output(target: Option<&Path>, code: &str) -> Result<()> {
    let Some(target) = target else {
        let mut stdout = std::io::stdout().lock();
        return stdout
            .write_all(code.as_bytes())
            .context("Failed to write to stdout");
    };

    debug!("Writing {}", target.display());
    std::fs::write(target, code).with_context(|| format!("Failed to write {}", target.display()))
}
