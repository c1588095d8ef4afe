use rustc_version::{Channel, version_meta};

fn has_cfg(name: &str) -> bool {
    std::env::var_os(format!("CARGO_CFG_{}", name.to_uppercase())).is_some()
}

fn make_overridable_cfg(name: &str, logic: impl FnOnce() -> &'static str) -> String {
    let env_name = format!("TRYFRAME_{}", name.to_uppercase());
    println!("cargo::rerun-if-env-changed={env_name}");
    let value = std::env::var(env_name).unwrap_or_else(|_| logic().to_string());
    println!("cargo::rustc-cfg={name}=\"{value}\"");
    value
}

fn main() {
    let is_nightly = version_meta().is_ok_and(|meta| meta.channel == Channel::Nightly);

    make_overridable_cfg("thread_local", || {
        if is_nightly && has_cfg("target_thread_local") {
            "attribute"
        } else {
            "std"
        }
    });

    // "skip" reproduces the historical behavior where an exception nobody catches aborts the
    // process immediately, without giving enclosing cleanup clauses a chance to run.
    let uncaught_cleanup = make_overridable_cfg("uncaught_cleanup", || "run");
    assert!(
        matches!(uncaught_cleanup.as_str(), "run" | "skip"),
        "TRYFRAME_UNCAUGHT_CLEANUP must be either \"run\" or \"skip\", got {uncaught_cleanup:?}",
    );
}
