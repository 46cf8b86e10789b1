//! `git` subprocess backend for the [`Vcs`] port.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use super::{Revision, Vcs};
use crate::error::{GateError, Result};

/// Runs `git` in a fixed working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Run `git <args>` and return stdout. Any non-zero exit is an error.
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(args = ?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| GateError::GitError(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GateError::GitError(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

const UNQUOTED_PATHS: &str = "core.quotePath=false";

fn range(base: &Revision) -> String {
    format!("{base}...HEAD")
}

/// Split `-z` output. Paths are returned verbatim, never C-quoted.
fn nul_separated(stdout: &str) -> Vec<String> {
    stdout
        .split('\0')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl Vcs for GitCli {
    fn ref_exists(&self, reference: &str) -> Result<bool> {
        let commitish = format!("{reference}^{{commit}}");
        let output = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &commitish])
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| GateError::GitError(format!("failed to run git: {e}")))?;
        Ok(output.status.success())
    }

    fn changed_paths(&self, base: &Revision) -> Result<Vec<String>> {
        let stdout = self.run(&[
            "-c",
            UNQUOTED_PATHS,
            "diff",
            "--name-only",
            "-z",
            &range(base),
        ])?;
        Ok(nul_separated(&stdout))
    }

    fn file_diff(&self, base: &Revision, path: &str) -> Result<String> {
        self.run(&[
            "--literal-pathspecs",
            "-c",
            UNQUOTED_PATHS,
            "diff",
            "-U0",
            &range(base),
            "--",
            path,
        ])
    }

    fn tracked_files(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["-c", UNQUOTED_PATHS, "ls-files", "-z"])?;
        Ok(nul_separated(&stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command as StdCommand;

    fn run_git(repo_dir: &Path, args: &[&str]) {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.name", "test-user"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        dir
    }

    #[test]
    fn ref_exists_distinguishes_head_and_missing_branch() {
        let repo = make_git_repo();
        let git = GitCli::new(repo.path());
        assert!(git.ref_exists("HEAD").unwrap());
        assert!(!git.ref_exists("HEAD~1").unwrap());
        assert!(!git.ref_exists("origin/main").unwrap());
    }

    #[test]
    fn changed_paths_and_zero_context_diff() {
        let repo = make_git_repo();
        std::fs::create_dir_all(repo.path().join("lib/core")).unwrap();
        std::fs::write(repo.path().join("lib/core/metrics.dart"), "a\nb\n").unwrap();
        run_git(repo.path(), &["add", "."]);
        run_git(repo.path(), &["commit", "-m", "add metrics"]);

        let git = GitCli::new(repo.path());
        let base = Revision::new("HEAD~1");
        let paths = git.changed_paths(&base).unwrap();
        assert_eq!(paths, vec!["lib/core/metrics.dart".to_string()]);

        let diff = git.file_diff(&base, "lib/core/metrics.dart").unwrap();
        assert!(diff.contains("@@"));
        assert!(diff.lines().any(|l| l == "+a"));
    }

    #[test]
    fn changed_paths_with_unknown_base_is_an_error() {
        let repo = make_git_repo();
        let git = GitCli::new(repo.path());
        let err = git
            .changed_paths(&Revision::new("does-not-exist"))
            .unwrap_err();
        assert!(matches!(err, GateError::GitError(_)));
    }

    #[test]
    fn non_ascii_paths_are_not_quoted() {
        let repo = make_git_repo();
        std::fs::create_dir_all(repo.path().join("lib/core")).unwrap();
        std::fs::write(repo.path().join("lib/core/métrique.dart"), "threshold = 0.5;\n").unwrap();
        run_git(repo.path(), &["add", "."]);
        run_git(repo.path(), &["commit", "-m", "add métrique"]);

        let git = GitCli::new(repo.path());
        let base = Revision::new("HEAD~1");
        assert_eq!(
            git.changed_paths(&base).unwrap(),
            vec!["lib/core/métrique.dart".to_string()]
        );
        let diff = git.file_diff(&base, "lib/core/métrique.dart").unwrap();
        assert!(diff.lines().any(|l| l == "+threshold = 0.5;"));
        assert_eq!(
            git.tracked_files().unwrap(),
            vec!["lib/core/métrique.dart".to_string()]
        );
    }

    #[test]
    fn nul_separated_keeps_spaces_and_newlines() {
        assert_eq!(
            nul_separated("a b.dart\0line\nbreak.md\0"),
            vec!["a b.dart".to_string(), "line\nbreak.md".to_string()]
        );
        assert!(nul_separated("").is_empty());
    }

    #[test]
    fn tracked_files_lists_committed_paths() {
        let repo = make_git_repo();
        std::fs::write(repo.path().join("model.onnx"), "weights").unwrap();
        run_git(repo.path(), &["add", "."]);
        run_git(repo.path(), &["commit", "-m", "track model"]);

        let git = GitCli::new(repo.path());
        assert_eq!(git.tracked_files().unwrap(), vec!["model.onnx".to_string()]);
    }
}
