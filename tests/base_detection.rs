//! Base-branch detection against a real scratch repository. Kept in its
//! own test binary: the git helpers run in the process working directory,
//! so this test changes it and nothing else here may run concurrently.

use std::path::Path;
use std::process::Command;

use vibedebt::git_module::detect_base_branch;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args([
            "-c",
            "user.email=dev@example.com",
            "-c",
            "user.name=dev",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .status()
        .expect("git is available");
    assert!(status.success(), "git {:?} failed", args);
}

#[test]
fn test_detect_base_branch_follows_origin_head_then_candidates() {
    let prev = std::env::current_dir().unwrap();

    // Default branch named outside the well-known candidates; only
    // origin/HEAD knows it is the base.
    let repo = tempfile::tempdir().unwrap();
    git(repo.path(), &["init", "--quiet"]);
    git(repo.path(), &["checkout", "--quiet", "-B", "trunk"]);
    git(repo.path(), &["commit", "--allow-empty", "-m", "init"]);
    git(repo.path(), &["update-ref", "refs/remotes/origin/trunk", "HEAD"]);
    git(
        repo.path(),
        &[
            "symbolic-ref",
            "refs/remotes/origin/HEAD",
            "refs/remotes/origin/trunk",
        ],
    );
    git(repo.path(), &["checkout", "--quiet", "-b", "feature"]);

    std::env::set_current_dir(repo.path()).unwrap();
    let detected = detect_base_branch(None);
    std::env::set_current_dir(&prev).unwrap();
    assert_eq!(detected.unwrap(), "trunk");

    // Without origin/HEAD the well-known candidate list still applies.
    let repo = tempfile::tempdir().unwrap();
    git(repo.path(), &["init", "--quiet"]);
    git(repo.path(), &["checkout", "--quiet", "-B", "main"]);
    git(repo.path(), &["commit", "--allow-empty", "-m", "init"]);
    git(repo.path(), &["checkout", "--quiet", "-b", "feature"]);

    std::env::set_current_dir(repo.path()).unwrap();
    let detected = detect_base_branch(None);
    std::env::set_current_dir(&prev).unwrap();
    assert_eq!(detected.unwrap(), "main");
}
