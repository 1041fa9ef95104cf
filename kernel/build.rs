fn main() {
    let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());

    std::fs::write(
        out_dir.join("link.ld"),
        include_bytes!("src/arch/aarch64/config/link.ld"),
    )
    .unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=-Tlink.ld");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/arch/aarch64/config/link.ld");
    println!("cargo:rerun-if-env-changed=LOG");
}
