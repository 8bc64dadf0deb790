//! Random data generators for ad-hoc fuzzing of resolver and lock-file code.

use rand::prelude::*;

/// Generate a random library identifier, `Acme.<Word><n>`.
#[must_use]
pub fn random_library_name() -> String {
    let mut rng = rand::thread_rng();
    let words = ["Core", "Widgets", "Http", "Json", "Collections", "Logging", "Net", "Data", "Utils", "Extensions"];
    let word = words.choose(&mut rng).unwrap();
    format!("Acme.{word}{}", rng.gen_range(1..1000))
}

/// Generate a random four-component version string.
#[must_use]
pub fn random_version_string() -> String {
    let mut rng = rand::thread_rng();
    format!("{}.{}.{}.{}", rng.gen_range(0..20), rng.gen_range(0..50), rng.gen_range(0..100), rng.gen_range(0..10))
}

/// Generate a random release-or-prerelease version string.
#[must_use]
pub fn random_version_string_with_prerelease() -> String {
    let mut rng = rand::thread_rng();
    let base = random_version_string();
    if rng.gen_bool(0.3) {
        let tags = ["alpha", "beta", "rc1", "preview"];
        format!("{base}-{}", tags.choose(&mut rng).unwrap())
    } else {
        base
    }
}

/// Generate a random framework moniker from the common generations.
#[must_use]
pub fn random_framework_moniker() -> String {
    let mut rng = rand::thread_rng();
    ["net6.0", "net7.0", "net8.0", "netstandard2.0", "netstandard2.1"].choose(&mut rng).unwrap().to_string()
}
