pub mod parser;

use std::process::Command;

use crate::config::AppConfig;
use crate::errors::{AppError, GitError};
use crate::types::GitDiff;

/// Branches tried, in order, when no base-branch override is configured.
const BASE_BRANCH_CANDIDATES: [&str; 3] = ["main", "master", "develop"];

/// The resolved branch context for one run: what we are on, what we
/// compare against, and the merge base between the two.
#[derive(Debug, Clone)]
pub struct BranchContext {
    pub branch: String,
    pub base: String,
    pub merge_base: String,
}

/// Raw text outputs collected from git for one diff extraction.
#[derive(Debug, Clone, Default)]
pub struct DiffInputs {
    pub numstat: String,
    pub name_status: String,
    pub commit_log: String,
    pub raw_diff: String,
}

/// Execute a git command and capture its stdout.
///
/// Non-zero exit status maps to `GitError::CommandFailed` carrying the
/// full command line and both output streams.
pub fn execute_git(args: &[&str]) -> Result<String, AppError> {
    tracing::debug!("Running: git {}", args.join(" "));

    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(|e| AppError::IO(format!("executing 'git {}'", args.join(" ")), e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            status_code: output.status.code(),
            stdout,
            stderr,
        }
        .into());
    }

    Ok(stdout)
}

/// Quietly check whether a revision exists.
fn rev_exists(rev: &str) -> bool {
    Command::new("git")
        .args(["rev-parse", "--verify", "--quiet", rev])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// The branch `origin/HEAD` points at, if the remote advertises one.
/// Prefers the local branch of the same name when it exists so the
/// same-as-base check can fire; otherwise the remote-tracking ref is used
/// directly.
fn origin_head_branch() -> Option<String> {
    let output = Command::new("git")
        .args(["symbolic-ref", "--quiet", "refs/remotes/origin/HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let target = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let remote_branch = target.strip_prefix("refs/remotes/")?.to_string();

    let local = remote_branch.strip_prefix("origin/")?;
    if rev_exists(&format!("refs/heads/{}", local)) {
        return Some(local.to_string());
    }
    Some(remote_branch)
}

/// Name of the currently checked-out branch. A detached HEAD (git reports
/// the literal "HEAD") is a context error.
pub fn current_branch() -> Result<String, AppError> {
    let name = execute_git(&["rev-parse", "--abbrev-ref", "HEAD"])
        .map_err(|_| AppError::Git(GitError::BranchUnidentifiable))?
        .trim()
        .to_string();

    if name.is_empty() || name == "HEAD" {
        return Err(GitError::BranchUnidentifiable.into());
    }
    Ok(name)
}

/// Pick the base branch to compare against: the configured override if it
/// exists, then whatever `origin/HEAD` points at, then the first existing
/// well-known candidate.
pub fn detect_base_branch(override_branch: Option<&str>) -> Result<String, AppError> {
    if let Some(base) = override_branch {
        if rev_exists(base) {
            return Ok(base.to_string());
        }
        return Err(GitError::Other(format!("Configured base branch '{}' does not exist", base)).into());
    }

    if let Some(remote_default) = origin_head_branch() {
        if rev_exists(&remote_default) {
            return Ok(remote_default);
        }
    }

    for candidate in BASE_BRANCH_CANDIDATES {
        if rev_exists(candidate) {
            return Ok(candidate.to_string());
        }
    }
    Err(GitError::Other("No base branch found (tried main, master, develop)".to_string()).into())
}

/// Resolve the full branch context, surfacing the context errors from
/// which a run cannot recover.
pub fn resolve_branch_context(
    config: &AppConfig,
    base_override: Option<&str>,
) -> Result<BranchContext, AppError> {
    let branch = current_branch()?;
    let base = detect_base_branch(base_override.or(config.base_branch.as_deref()))?;

    if branch == base {
        return Err(GitError::SameAsBase { branch }.into());
    }

    let merge_base = execute_git(&["merge-base", &base, "HEAD"])?.trim().to_string();
    if merge_base.is_empty() {
        return Err(GitError::Other(format!("No merge base between '{}' and HEAD", base)).into());
    }

    Ok(BranchContext {
        branch,
        base,
        merge_base,
    })
}

/// Collect the three structured diff texts plus the raw unified diff
/// between the merge base and the branch tip.
pub fn collect_diff_inputs(context: &BranchContext) -> Result<DiffInputs, AppError> {
    let range = format!("{}..HEAD", context.merge_base);
    Ok(DiffInputs {
        numstat: execute_git(&["diff", "--numstat", &context.merge_base, "HEAD"])?,
        name_status: execute_git(&["diff", "--name-status", &context.merge_base, "HEAD"])?,
        commit_log: execute_git(&["log", "--oneline", &range])?,
        raw_diff: execute_git(&["diff", &context.merge_base, "HEAD"])?,
    })
}

/// Extract the structured diff for the given context. Zero changed files
/// is a context error: there is nothing to quiz on.
pub fn extract_diff(context: &BranchContext) -> Result<GitDiff, AppError> {
    let inputs = collect_diff_inputs(context)?;
    let diff = parser::parse_diff_inputs(&inputs);

    if diff.files.is_empty() {
        return Err(GitError::NoChanges {
            base: context.base.clone(),
            head: context.branch.clone(),
        }
        .into());
    }

    tracing::info!(
        "Extracted {} changed files, {} commits between {} and {}",
        diff.files.len(),
        diff.commits.len(),
        context.base,
        context.branch
    );
    Ok(diff)
}
