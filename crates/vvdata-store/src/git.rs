//! Commit step: stage generated files, commit and optionally push.
//!
//! Every git invocation is best-effort. Failures are logged and reported
//! through [`CommitOutcome`], never raised.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Commit message used for generated updates.
pub const COMMIT_MESSAGE: &str = "Parsed updates from raw";

/// What the commit step achieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    pub committed: bool,
    pub pushed: bool,
}

/// Run `git -C <repo> <args>`, returning `None` if git could not be started.
fn git(repo: &Path, args: &[&str]) -> Option<Output> {
    match Command::new("git").arg("-C").arg(repo).args(args).output() {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::warn!("Failed to run git {}: {}", args.join(" "), e);
            None
        }
    }
}

fn succeeded(output: Option<Output>) -> bool {
    output.is_some_and(|o| o.status.success())
}

/// Express `path` relative to `root` when possible, for shorter pathspecs.
fn pathspec(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Stage `paths`, then commit and/or push.
///
/// Nothing runs when both `commit` and `push` are false. A failed `git add`
/// is ignored; `committed`/`pushed` reflect the exit status of each command.
pub fn commit_and_push(root: &Path, paths: &[PathBuf], commit: bool, push: bool) -> CommitOutcome {
    let mut outcome = CommitOutcome::default();
    if !commit && !push {
        return outcome;
    }

    let specs: Vec<String> = paths
        .iter()
        .map(|p| pathspec(root, p).display().to_string())
        .collect();
    let mut add_args = vec!["add", "--"];
    add_args.extend(specs.iter().map(String::as_str));

    match git(root, &add_args) {
        Some(o) if !o.status.success() => {
            tracing::debug!(
                "git add failed: {}",
                String::from_utf8_lossy(&o.stderr).trim()
            );
        }
        _ => {}
    }

    if commit {
        outcome.committed = succeeded(git(root, &["commit", "-m", COMMIT_MESSAGE]));
    }

    if push {
        outcome.pushed = succeeded(git(root, &["push"]));
    }

    outcome
}

/// Current HEAD commit of the repository containing `dir`, if any.
pub fn head_commit(dir: &Path) -> Option<String> {
    let output = git(dir, &["rev-parse", "HEAD"])?;
    if !output.status.success() {
        return None;
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!sha.is_empty()).then_some(sha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn disabled_step_does_nothing() {
        let temp = tempdir().unwrap();

        let outcome = commit_and_push(temp.path(), &[temp.path().join("vv")], false, false);

        assert_eq!(outcome, CommitOutcome::default());
    }

    #[test]
    fn pathspecs_are_relative_to_root() {
        let root = Path::new("/repo");

        assert_eq!(
            pathspec(root, Path::new("/repo/vv/data/mvr")),
            PathBuf::from("vv/data/mvr")
        );
        assert_eq!(
            pathspec(root, Path::new("/elsewhere/state.json")),
            PathBuf::from("/elsewhere/state.json")
        );
    }

    #[test]
    fn head_commit_outside_repository_is_none() {
        let temp = tempdir().unwrap();
        let not_a_dir = temp.path().join("missing");

        assert_eq!(head_commit(&not_a_dir), None);
    }
}
