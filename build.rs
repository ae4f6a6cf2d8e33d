//! Build script: embeds the bethini version string at compile time.

use std::process::Command;

fn main() {
    // BETHINI_VERSION from the environment wins (release builds set it);
    // local builds fall back to git describe.
    if let Ok(version) = std::env::var("BETHINI_VERSION") {
        println!("cargo:rustc-env=BETHINI_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=BETHINI_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=BETHINI_VERSION");
}
