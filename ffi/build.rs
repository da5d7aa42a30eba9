//! Generates `recipe_ffi.h` from the `extern "C"` surface.
//!
//! The header is written to `OUT_DIR`. Set `RECIPE_FFI_INCLUDE_DIR` to also
//! copy it somewhere the mobile shells can pick it up.

use std::env;
use std::path::PathBuf;

const HEADER: &str = "recipe_ffi.h";

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");
    println!("cargo:rerun-if-env-changed=RECIPE_FFI_INCLUDE_DIR");

    let (Ok(crate_dir), Ok(out_dir)) = (env::var("CARGO_MANIFEST_DIR"), env::var("OUT_DIR")) else {
        println!("cargo:warning=CARGO_MANIFEST_DIR or OUT_DIR unset; header not generated");
        return;
    };

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("RECIPE_FFI_H")
        .with_no_includes()
        .with_sys_include("stdbool.h")
        .with_sys_include("stdint.h")
        .generate()
    {
        Ok(bindings) => bindings,
        Err(e) => {
            println!("cargo:warning=header not generated: {e}");
            return;
        }
    };

    let generated = PathBuf::from(out_dir).join(HEADER);
    bindings.write_to_file(&generated);

    if let Some(dir) = env::var_os("RECIPE_FFI_INCLUDE_DIR") {
        let dir = PathBuf::from(dir);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            println!("cargo:warning=cannot create {}: {e}", dir.display());
            return;
        }
        if let Err(e) = std::fs::copy(&generated, dir.join(HEADER)) {
            println!("cargo:warning=cannot copy header to {}: {e}", dir.display());
        }
    }
}
