//! Build orchestration: strategy → extraction → resolution → synthesis →
//! rendering, and writing the rendered files.
//!
//! Everything is rendered in memory before anything touches the output
//! location, so a failed or cancelled build writes nothing.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tempfile::NamedTempFile;
use tokio_util::sync::CancellationToken;

use crate::error::{ProfileError, Result};
use crate::formatter::{FormatOptions, format_async};
use crate::project::SourcePackage;
use crate::resolve::resolve;
use crate::symbols::{PackageSymbols, extract_package};
use crate::synth::{SynthOptions, go_identifier, synthesize};

/// File name of every profile in the per-package layout
pub const PROFILE_FILE_NAME: &str = "models.go";

/// How output files are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputLayout {
    /// One package re-exporting every selected package
    #[default]
    Merged,
    /// One profile per source package at `<provider>/<type>/<group>/models.go`
    PerPackage,
}

/// Options of one build
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Profile name, reported by the `UserAgent` wrapper
    pub profile_name: String,
    /// `package` clause of merged output; defaults to the source package
    /// name for a single package and to the profile name otherwise
    pub package_name: Option<String>,
    pub layout: OutputLayout,
    pub format: FormatOptions,
    /// Extract packages concurrently
    pub parallel: bool,
}

impl BuildOptions {
    pub fn new(profile_name: impl Into<String>) -> Self {
        Self {
            profile_name: profile_name.into(),
            ..Self::default()
        }
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject option combinations that cannot produce output
    pub fn validate(&self, target: Option<&Path>) -> Result<()> {
        if self.layout == OutputLayout::PerPackage && target.is_none() {
            return Err(ProfileError::config(
                "the per-package layout needs an output directory",
            ));
        }
        if self.layout == OutputLayout::PerPackage && self.package_name.is_some() {
            return Err(ProfileError::config(
                "a package name only applies to the merged layout",
            ));
        }
        Ok(())
    }
}

/// One rendered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Path relative to the output directory; empty for merged output
    pub path: PathBuf,
    pub contents: String,
}

/// Everything a build produced, still in memory
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub files: Vec<OutputFile>,
    /// Number of source packages extracted
    pub packages: usize,
    /// Functions that could not be re-exported
    pub skipped: usize,
}

/// Running state of one build
pub struct BuildContext {
    cancel: CancellationToken,
    pending: Vec<SourcePackage>,
    seen: FxHashSet<PathBuf>,
    packages: Vec<PackageSymbols>,
}

impl BuildContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            pending: Vec::new(),
            seen: FxHashSet::default(),
            packages: Vec::new(),
        }
    }

    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(ProfileError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Accept a selected package; extraction happens now unless deferred
    /// for parallel extraction
    pub fn add_package(&mut self, package: SourcePackage, defer: bool) -> Result<()> {
        self.check_cancelled()?;
        if !self.seen.insert(package.path.clone()) {
            tracing::warn!(package = %package, "package selected twice, ignoring");
            return Ok(());
        }
        if defer {
            self.pending.push(package);
        } else {
            tracing::info!(package = %package, "extracting");
            self.packages.push(extract_package(Arc::new(package))?);
        }
        Ok(())
    }

    /// Extract deferred packages concurrently, keeping enumeration order
    pub fn extract_pending(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return Ok(());
        }
        tracing::info!(packages = pending.len(), "extracting in parallel");
        let cancel = &self.cancel;
        let extracted = pending
            .into_par_iter()
            .map(|package| {
                if cancel.is_cancelled() {
                    return Err(ProfileError::Cancelled);
                }
                extract_package(Arc::new(package))
            })
            .collect::<Result<Vec<_>>>()?;
        self.packages.extend(extracted);
        Ok(())
    }

    pub fn packages(&self) -> &[PackageSymbols] {
        &self.packages
    }
}

/// Run the pipeline over the packages a strategy yields
pub fn build_profile<I>(
    packages: I,
    options: &BuildOptions,
    cancel: &CancellationToken,
) -> Result<BuildOutput>
where
    I: IntoIterator<Item = Result<SourcePackage>>,
{
    let mut ctx = BuildContext::new(cancel.clone());
    for package in packages {
        ctx.add_package(package?, options.parallel)?;
    }
    ctx.extract_pending()?;
    ctx.check_cancelled()?;

    let packages = ctx.packages();
    if packages.is_empty() {
        return Err(ProfileError::NoPackages);
    }

    let mut output = BuildOutput {
        packages: packages.len(),
        ..BuildOutput::default()
    };
    match options.layout {
        OutputLayout::Merged => {
            let package_name = merged_package_name(packages, options)?;
            let (contents, skipped) = render(packages, package_name, options, cancel)?;
            output.skipped += skipped;
            output.files.push(OutputFile {
                path: PathBuf::new(),
                contents,
            });
        }
        OutputLayout::PerPackage => {
            let mut dirs = FxHashSet::default();
            for package in packages {
                let dir = package.package.profile_dir();
                if !dirs.insert(dir.clone()) {
                    return Err(ProfileError::config(format!(
                        "more than one selected package maps to {}",
                        dir.display()
                    )));
                }
                let single = std::slice::from_ref(package);
                let (contents, skipped) =
                    render(single, package.package_name.clone(), options, cancel)?;
                output.skipped += skipped;
                output.files.push(OutputFile {
                    path: dir.join(PROFILE_FILE_NAME),
                    contents,
                });
            }
        }
    }

    tracing::info!(
        packages = output.packages,
        files = output.files.len(),
        skipped = output.skipped,
        "profile built"
    );
    Ok(output)
}

fn merged_package_name(packages: &[PackageSymbols], options: &BuildOptions) -> Result<SmolStr> {
    if let Some(name) = &options.package_name {
        return Ok(go_identifier(name));
    }
    if let [single] = packages {
        return Ok(single.package_name.clone());
    }
    if options.profile_name.is_empty() {
        return Err(ProfileError::config(
            "a package name or profile name is required to merge several packages",
        ));
    }
    Ok(go_identifier(&options.profile_name.to_lowercase()))
}

fn render(
    packages: &[PackageSymbols],
    package_name: SmolStr,
    options: &BuildOptions,
    cancel: &CancellationToken,
) -> Result<(String, usize)> {
    let resolution = resolve(packages)?;
    if cancel.is_cancelled() {
        return Err(ProfileError::Cancelled);
    }
    let synthesized = synthesize(
        packages,
        &resolution,
        &SynthOptions {
            package_name,
            profile_name: options.profile_name.clone(),
        },
    );
    let contents =
        format_async(&synthesized, &options.format, cancel).ok_or(ProfileError::Cancelled)?;
    Ok((contents, synthesized.skipped.len()))
}

/// Write rendered files.
///
/// Without a target the merged file goes to `stdout`. With a target, merged
/// output is written to that file and per-package output below that
/// directory. Every file is first written to a temporary file next to its
/// destination; they are persisted into place only once all were written.
pub fn write_output(output: &BuildOutput, target: Option<&Path>, stdout: &mut dyn Write) -> Result<()> {
    let Some(target) = target else {
        for file in &output.files {
            stdout
                .write_all(file.contents.as_bytes())
                .map_err(|e| ProfileError::io("<stdout>", e))?;
        }
        return Ok(());
    };

    let mut staged = Vec::with_capacity(output.files.len());
    for file in &output.files {
        let path = if file.path.as_os_str().is_empty() {
            target.to_path_buf()
        } else {
            target.join(&file.path)
        };
        let temp = stage(&path, &file.contents)?;
        staged.push((temp, path));
    }

    for (temp, path) in staged {
        temp.persist(&path)
            .map_err(|e| ProfileError::io(&path, e.error))?;
        tracing::debug!(path = %path.display(), "wrote profile");
    }
    Ok(())
}

/// Temporary file holding `contents` in the directory of `path`
fn stage(path: &Path, contents: &str) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| ProfileError::io(&dir, e))?;
    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| ProfileError::io(&dir, e))?;
    temp.write_all(contents.as_bytes())
        .map_err(|e| ProfileError::io(temp.path(), e))?;
    Ok(temp)
}
