//! Print the diff introduced by the latest commit of a git repository

use anyhow::{bail, Context, Result};
use clap::Parser;
use logbridge::facade::{self, Attr};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser, Debug)]
#[command(name = "commitgen", version, about)]
struct Cli {
    /// Path to project
    #[arg(long, default_value = ".")]
    path: PathBuf,
}

/// Produces the textual diff between HEAD and its first parent
trait DiffSource {
    fn head_diff(&self, repo: &Path) -> Result<String>;
}

/// Diff source that shells out to the `git` executable
struct GitCli;

impl GitCli {
    fn git(&self, repo: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(repo)
            .args(args)
            .output()
            .context("failed to run git")?;

        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl DiffSource for GitCli {
    fn head_diff(&self, repo: &Path) -> Result<String> {
        let parents = self
            .git(repo, &["rev-list", "--parents", "-n", "1", "HEAD"])
            .context("failed to get HEAD commit")?;
        if parents.split_whitespace().count() < 2 {
            bail!("commit has no parents");
        }

        self.git(repo, &["diff", "HEAD~1", "HEAD"])
            .context("failed to get patch")
    }
}

fn run(cli: &Cli, source: &dyn DiffSource) -> Result<()> {
    facade::debug(
        "reading diff",
        &[Attr::new("path", cli.path.display().to_string())],
    );

    let diff = source.head_diff(&cli.path)?;
    let files = diff.lines().filter(|l| l.starts_with("diff --git ")).count();
    facade::info(
        "diff retrieved",
        &[Attr::new("files", files), Attr::new("bytes", diff.len())],
    );

    log::info!("Git diff given to buffer:");
    log::info!("{}", diff);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let logger = logbridge::init_default().context("failed to initialize logging")?;

    let result = run(&cli, &GitCli);
    if let Err(ref e) = result {
        facade::error(
            "commitgen failed",
            &[Attr::new("cause", format!("{:#}", e))],
        );
    }

    logger.sync().context("failed to flush logs")?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDiff(&'static str);

    impl DiffSource for FixedDiff {
        fn head_diff(&self, _repo: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct NoParent;

    impl DiffSource for NoParent {
        fn head_diff(&self, _repo: &Path) -> Result<String> {
            bail!("commit has no parents")
        }
    }

    #[test]
    fn test_cli_defaults_to_current_dir() {
        let cli = Cli::parse_from(["commitgen"]);
        assert_eq!(cli.path, PathBuf::from("."));

        let cli = Cli::parse_from(["commitgen", "--path", "/tmp/repo"]);
        assert_eq!(cli.path, PathBuf::from("/tmp/repo"));
    }

    #[test]
    fn test_run_with_diff() {
        let cli = Cli::parse_from(["commitgen"]);
        let diff = "diff --git a/x b/x\n+added\n";
        assert!(run(&cli, &FixedDiff(diff)).is_ok());
    }

    #[test]
    fn test_run_propagates_source_errors() {
        let cli = Cli::parse_from(["commitgen"]);
        let err = run(&cli, &NoParent).unwrap_err();
        assert!(err.to_string().contains("no parents"));
    }
}
