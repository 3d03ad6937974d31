//! Build script for phaseflip-au.
//!
//! Links AudioToolbox on macOS targets for `AudioUnitRender`.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Build scripts run on the host, so check the target explicitly
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("macos") {
        println!("cargo:rustc-link-lib=framework=AudioToolbox");
        println!("cargo:rustc-link-lib=framework=CoreAudio");
    }
}
