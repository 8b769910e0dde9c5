use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());

    // Generate C header from Rust exports
    let output_path = manifest_dir.join("include/cs2kit.h");

    let config = cbindgen::Config::from_file(manifest_dir.join("cbindgen.toml")).unwrap_or_default();

    match cbindgen::Builder::new()
        .with_crate(&manifest_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(&output_path);
        }
        Err(e) => println!("cargo:warning=cbindgen failed: {}", e),
    }

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap();
    if target_os == "linux" {
        // Only the cs2kit_* entry points are exported from the shared object
        let exports_map = manifest_dir.join("exports.map");
        println!("cargo:rerun-if-changed={}", exports_map.display());
        println!(
            "cargo:rustc-cdylib-link-arg=-Wl,--version-script={}",
            exports_map.display()
        );
    }
}
