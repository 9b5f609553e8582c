//! Workflow wiring between parsed arguments and the release library.
//!
//! Arguments are kept free of clap so the workflows can be called
//! programmatically.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::{self, Config};
use crate::files::{FsFileEditor, VariableFile};
use crate::git::{Credentials, Git2Repository};
use crate::lint;
use crate::release::{ChangelogTarget, ReleaseOrchestrator, ReleaseOutcome, ReleaseSettings};

/// Arguments for the release workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<String>,
    pub git_host: Option<String>,
    pub git_group: Option<String>,
    pub git_project: Option<String>,
    /// Flattened SSH private key
    pub auth: Option<String>,
    pub setup_py: bool,
    pub no_changelog: bool,
    pub no_tag: bool,
    pub no_push: bool,
    pub dry_run: bool,
}

/// Arguments for the lint workflow
#[derive(Debug, Clone, PartialEq)]
pub struct LintWorkflowArgs {
    /// Repository to lint
    pub path: PathBuf,
    /// Lint only commits not reachable from this revision
    pub from: Option<String>,
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &ReleaseWorkflowArgs) {
    if let Some(host) = &args.git_host {
        config.repository.host = Some(host.clone());
    }
    if let Some(group) = &args.git_group {
        config.repository.group = Some(group.clone());
    }
    if let Some(project) = &args.git_project {
        config.repository.project = Some(project.clone());
    }
    if let Some(key) = &args.auth {
        config.auth.ssh_key = Some(key.clone());
    }
    if args.setup_py {
        let setup_py = VariableFile::new("setup.py", "__version__");
        if !config.release.variable_files.contains(&setup_py) {
            config.release.variable_files.push(setup_py);
        }
    }
    if args.no_changelog {
        config.release.changelog = false;
    }
    if args.no_tag {
        config.release.create_tag = false;
    }
    if args.no_push {
        config.release.push = false;
    }
}

/// Release settings for the orchestrator.
///
/// The project location is only required when the changelog is enabled,
/// since it is used for commit links.
pub fn release_settings(config: &Config, dry_run: bool) -> Result<ReleaseSettings> {
    let changelog = if config.release.changelog {
        Some(ChangelogTarget {
            path: config.release.changelog_path.clone(),
            location: config
                .repository
                .location()
                .context("changelog links need the repository location")?,
        })
    } else {
        None
    };

    Ok(ReleaseSettings {
        changelog,
        variable_files: config.release.variable_files.clone(),
        create_tag: config.release.create_tag,
        push: config.release.push,
        dry_run,
    })
}

/// Main release workflow
///
/// 1. Load configuration and apply overrides
/// 2. Clone (or reopen) the repository
/// 3. Run the release orchestrator against the clone
pub fn run_release_workflow(args: &ReleaseWorkflowArgs) -> Result<ReleaseOutcome> {
    let mut config =
        config::load_config(args.config_path.as_deref()).context("Error loading config")?;
    apply_overrides(&mut config, args);

    let settings = release_settings(&config, args.dry_run)?;
    let url = config.repository.clone_url()?;
    let destination = config.repository.destination()?;

    let repo = Git2Repository::clone_or_open(
        &url,
        &destination,
        &config.repository.remote,
        config.auth.credentials(),
        config.repository.fresh_clone,
    )
    .with_context(|| format!("Cannot prepare a clone of {}", url))?;
    let files = FsFileEditor::new(repo.workdir()?);

    info!(path = %destination.display(), dry_run = args.dry_run, "starting release");
    let outcome = ReleaseOrchestrator::new(&repo, &files, settings).run()?;
    Ok(outcome)
}

/// Lint workflow: check commit messages of a local repository.
///
/// Returns the number of commits checked.
pub fn run_lint_workflow(args: &LintWorkflowArgs) -> Result<usize> {
    let repo = Git2Repository::open(&args.path, "origin", Credentials::default())
        .with_context(|| format!("Cannot open repository at {}", args.path.display()))?;
    let checked = lint::lint_repository(&repo, args.from.as_deref())?;
    Ok(checked)
}
