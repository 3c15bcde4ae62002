fn main() {
    // UniFFI scaffolding comes from proc-macros in uniffi_bindings.rs, no UDL file
    println!("cargo:rerun-if-changed=src/uniffi_bindings.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
