//! Change publishing against real git repositories.
//!
//! A bare repository in a temp dir stands in for GitHub. The runner below
//! forwards everything to the real git CLI but swaps the token URL of the
//! push for the bare repository's path, recording what it replaced.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use ci_bot::publish::NO_CHANGES_MESSAGE;
use ci_bot::{
    BotError, ChangePublisher, GitCli, PublishConfig, PublishOutcome, VcsOutput, VcsRunner,
};
use tempfile::TempDir;

const TOKEN: &str = "ghs_integration_token";

struct LocalRemote {
    git: GitCli,
    remote: PathBuf,
    pushed_urls: RefCell<Vec<String>>,
}

impl VcsRunner for LocalRemote {
    fn run(&self, args: &[&str]) -> Result<VcsOutput, BotError> {
        if args.first() == Some(&"push") {
            self.pushed_urls.borrow_mut().push(args[1].to_string());
            let remote = self.remote.to_string_lossy().to_string();
            let mut redirected: Vec<&str> = args.to_vec();
            redirected[1] = &remote;
            return self.git.run(&redirected);
        }
        self.git.run(args)
    }
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Work tree with one commit, already pushed to a bare remote
struct Fixture {
    _dir: TempDir,
    work: PathBuf,
    remote: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let work = dir.path().join("work");
        let remote = dir.path().join("remote.git");
        fs::create_dir(&work).unwrap();
        fs::create_dir(&remote).unwrap();

        git(&remote, &["init", "--bare", "--quiet"]);
        git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        git(&work, &["init", "--quiet"]);
        git(&work, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        fs::write(work.join("kernel.rev"), "abc123\n").unwrap();
        git(&work, &["add", "."]);
        git(
            &work,
            &[
                "-c",
                "user.name=Setup",
                "-c",
                "user.email=setup@example.com",
                "commit",
                "--quiet",
                "-m",
                "initial",
            ],
        );
        git(&work, &["push", "--quiet", remote.to_str().unwrap(), "HEAD"]);

        Self {
            _dir: dir,
            work,
            remote,
        }
    }

    fn publisher(&self) -> ChangePublisher<LocalRemote> {
        let runner = LocalRemote {
            git: GitCli::new(&self.work),
            remote: self.remote.clone(),
            pushed_urls: RefCell::new(Vec::new()),
        };
        let config = PublishConfig::new("octo/kernel".parse().unwrap(), TOKEN).unwrap();
        ChangePublisher::new(runner, config)
    }

    fn remote_head(&self) -> String {
        git(&self.remote, &["rev-parse", "refs/heads/main"])
    }
}

#[test]
fn test_clean_tree_publishes_nothing() {
    let fixture = Fixture::new();
    let remote_before = fixture.remote_head();
    let publisher = fixture.publisher();

    let outcome = publisher.publish().unwrap();

    assert_eq!(outcome, PublishOutcome::NoOp);
    assert!(publisher.runner().pushed_urls.borrow().is_empty());
    assert_eq!(git(&fixture.work, &["rev-list", "--count", "HEAD"]), "1");
    assert_eq!(fixture.remote_head(), remote_before);
}

#[test]
fn test_dirty_tree_is_committed_and_pushed() {
    let fixture = Fixture::new();
    fs::write(fixture.work.join("kernel.rev"), "def456\n").unwrap();
    let publisher = fixture.publisher();

    let outcome = publisher.publish().unwrap();

    assert_eq!(outcome, PublishOutcome::Published);
    assert_eq!(git(&fixture.work, &["rev-list", "--count", "HEAD"]), "2");
    assert_eq!(
        git(&fixture.work, &["log", "-1", "--format=%s"]),
        "chore: auto update submodules"
    );
    assert_eq!(
        git(&fixture.work, &["log", "-1", "--format=%an <%ae>"]),
        "queen-of-love-and-hate[bot] <queen-of-love-and-hate@users.noreply.github.com>"
    );

    let local_head = git(&fixture.work, &["rev-parse", "HEAD"]);
    assert_eq!(fixture.remote_head(), local_head);

    let pushed = publisher.runner().pushed_urls.borrow();
    assert_eq!(
        *pushed,
        vec![format!(
            "https://x-access-token:{}@github.com/octo/kernel.git",
            TOKEN
        )]
    );
}

#[test]
fn test_untracked_files_alone_are_not_published() {
    // `git diff --quiet` only looks at tracked paths
    let fixture = Fixture::new();
    fs::write(fixture.work.join("notes.txt"), "scratch\n").unwrap();

    let outcome = fixture.publisher().publish().unwrap();

    assert_eq!(outcome, PublishOutcome::NoOp);
    assert_eq!(git(&fixture.work, &["rev-list", "--count", "HEAD"]), "1");
}

#[test]
fn test_missing_repository_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = PublishConfig::new("octo/kernel".parse().unwrap(), TOKEN).unwrap();
    let publisher = ChangePublisher::new(GitCli::new(dir.path()), config);

    let result = publisher.publish();

    assert!(matches!(result, Err(BotError::Configuration(_))));
}

#[test]
fn test_rejected_push_keeps_local_commit_and_hides_token() {
    let fixture = Fixture::new();
    fs::write(fixture.work.join("kernel.rev"), "def456\n").unwrap();
    let remote_before = fixture.remote_head();

    // Point the push at a path that is not a repository
    let runner = LocalRemote {
        git: GitCli::new(&fixture.work),
        remote: fixture.work.join("missing.git"),
        pushed_urls: RefCell::new(Vec::new()),
    };
    let config = PublishConfig::new("octo/kernel".parse().unwrap(), TOKEN).unwrap();
    let err = ChangePublisher::new(runner, config).publish().unwrap_err();

    assert!(matches!(err, BotError::VersionControl { .. }));
    assert_ne!(err.exit_code(), 0);
    assert!(!err.to_string().contains(TOKEN));
    assert_eq!(git(&fixture.work, &["rev-list", "--count", "HEAD"]), "2");
    assert_eq!(fixture.remote_head(), remote_before);
}

#[test]
fn test_binary_reports_clean_tree_on_stdout() {
    let fixture = Fixture::new();

    let output = Command::new(env!("CARGO_BIN_EXE_publish-changes"))
        .args(["--repo", "octo/kernel", "--token", TOKEN, "--repo-dir"])
        .arg(&fixture.work)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        NO_CHANGES_MESSAGE
    );
}
