//! Build script: embeds version information.
use std::process::Command;

fn main() {
    // Prefer JTOOLS_VERSION if set (release builds), otherwise git describe.
    if let Ok(version) = std::env::var("JTOOLS_VERSION") {
        println!("cargo:rustc-env=JTOOLS_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=JTOOLS_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=JTOOLS_VERSION");
}
