use std::env;

fn main() {
    // Version string shown by the CLI and sent in the HTTP user agent
    let version = env::var("HEXROUTE_VERSION_OVERRIDE")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string()));
    println!("cargo:rustc-env=HEXROUTE_VERSION={}", version);

    println!("cargo:rerun-if-env-changed=HEXROUTE_VERSION_OVERRIDE");
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
