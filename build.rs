use std::env;
use std::process::Command;

/// Sets `YUTORI_VERSION`: the package version for release builds, with a
/// `-dev+<hash>` suffix for debug builds made from a git checkout.
fn main() {
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let release = env::var("PROFILE").is_ok_and(|p| p == "release");

    let full_version = match git(&["rev-parse", "--short=8", "HEAD"]) {
        Some(hash) if !release => {
            let suffix = if worktree_dirty() { ".dirty" } else { "" };
            format!("{}-dev+{}{}", version, hash, suffix)
        }
        _ => version,
    };

    println!("cargo:rustc-env=YUTORI_VERSION={}", full_version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}

fn worktree_dirty() -> bool {
    git(&["status", "--porcelain", "--untracked-files=no"]).is_some()
}
