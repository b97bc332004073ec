use std::process::Command;
use vergen::EmitBuilder;

// Emits VERGEN_BUILD_TIMESTAMP, plus VERGEN_GIT_SHA when built from a git checkout.
// Both are read with option_env! in the startup log.
fn main() {
    let in_git_checkout = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);

    let mut builder = EmitBuilder::builder();
    builder.build_timestamp();
    if in_git_checkout {
        builder.git_sha(true);
    }

    if let Err(e) = builder.emit() {
        println!("cargo:warning=unable to generate build metadata: {e}");
    }
}
