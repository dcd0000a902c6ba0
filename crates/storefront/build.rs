//! Build script for storefront crate.
//!
//! Fingerprints the static stylesheet and script so templates can reference
//! content-addressed copies that are safe to cache forever.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    fingerprint(&static_dir, "css", "main", "CSS_HASH");
    fingerprint(&static_dir, "js", "app", "JS_HASH");
}

/// Hash `static/{ext}/{stem}.{ext}` and copy it to `static/{ext}/derived/{stem}.{hash}.{ext}`.
///
/// Sets `env_var` for use with `env!(...)`. An unreadable asset yields an
/// empty hash so templates fall back to the unhashed file.
fn fingerprint(static_dir: &Path, ext: &str, stem: &str, env_var: &str) {
    let asset_path = static_dir.join(ext).join(format!("{stem}.{ext}"));
    println!("cargo:rerun-if-changed={}", asset_path.display());

    let content = match fs::read(&asset_path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", asset_path.display());
            println!("cargo:rustc-env={env_var}=");
            return;
        }
    };

    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = &hash[..8];
    println!("cargo:rustc-env={env_var}={short_hash}");

    let derived_dir = static_dir.join(ext).join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");
    let derived_path = derived_dir.join(format!("{stem}.{short_hash}.{ext}"));
    fs::copy(&asset_path, &derived_path).expect("Failed to copy asset to derived directory");
}
