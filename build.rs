fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    // Build timestamp exposed as `traceviewer::BUILD_DATE`
    let build_date = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    println!("cargo:rustc-env=BUILD_DATE={}", build_date);
}
