use std::path::PathBuf;
use std::process::Command;

fn git_sha(repo_root: &PathBuf) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = PathBuf::from(manifest_dir).join("..");

    let sha = git_sha(&repo_root).unwrap_or_else(|| "dev".to_string());
    println!("cargo:rustc-env=PAYCYCLE_BUILD_SHA={sha}");
    println!("cargo:rerun-if-changed=build.rs");
}
