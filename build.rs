use std::process::Command;

// Embeds the latest release tag (vX.Y.Z) as GIT_TAG for the version label.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");

    let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0", "--match", "v[0-9]*"])
        .output()
    else {
        return;
    };
    if !output.status.success() {
        return;
    }

    let tag = String::from_utf8_lossy(&output.stdout);
    let tag = tag.trim();
    if !tag.is_empty() {
        println!("cargo:rustc-env=GIT_TAG={tag}");
    }
}
