//! Command-line surface: argument parsing and command dispatch.

pub mod orchestration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ui;
use orchestration::{LintWorkflowArgs, ReleaseWorkflowArgs};

#[derive(Parser, Debug)]
#[command(
    name = "semantic-release",
    version,
    about = "Release a git repository from its latest conventional commit"
)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Release the configured repository: bump, changelog, commit, tag, push
    Up(UpArgs),
    /// Check that commit messages follow the commit message convention
    Lint(LintArgs),
    /// List the recognized commit change types
    HelpCmt,
}

#[derive(Args, Debug)]
pub struct UpArgs {
    #[arg(long, help = "Git host name, e.g. gitlab.com")]
    pub git_host: Option<String>,

    #[arg(long, help = "Git group (namespace) name")]
    pub git_group: Option<String>,

    #[arg(long, help = "Git project name")]
    pub git_project: Option<String>,

    #[arg(long, help = "SSH private key on one line, line breaks written as '#'")]
    pub auth: Option<String>,

    #[arg(long, help = "Also update __version__ in setup.py")]
    pub setup_py: bool,

    #[arg(long, help = "Do not update the changelog")]
    pub no_changelog: bool,

    #[arg(long, help = "Do not create a release tag")]
    pub no_tag: bool,

    #[arg(long, help = "Commit and tag locally without pushing")]
    pub no_push: bool,

    #[arg(long, help = "Compute the new version without changing anything")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct LintArgs {
    #[arg(long, help = "Only lint commits not reachable from this revision")]
    pub from: Option<String>,

    #[arg(long, default_value = ".", help = "Path of the repository to lint")]
    pub path: PathBuf,
}

impl Cli {
    /// Run the selected command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Command::Up(args) => {
                let outcome = orchestration::run_release_workflow(&ReleaseWorkflowArgs {
                    config_path: self.config,
                    git_host: args.git_host,
                    git_group: args.git_group,
                    git_project: args.git_project,
                    auth: args.auth,
                    setup_py: args.setup_py,
                    no_changelog: args.no_changelog,
                    no_tag: args.no_tag,
                    no_push: args.no_push,
                    dry_run: args.dry_run,
                })?;
                ui::display_outcome(&outcome);
            }
            Command::Lint(args) => {
                let checked = orchestration::run_lint_workflow(&LintWorkflowArgs {
                    path: args.path,
                    from: args.from,
                })?;
                ui::display_success(&format!(
                    "{} commit(s) follow the commit message convention",
                    checked
                ));
            }
            Command::HelpCmt => ui::display_commit_types(),
        }
        Ok(())
    }
}
