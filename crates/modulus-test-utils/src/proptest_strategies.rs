//! Proptest strategies for the core domain types (spec §4.1 versions,
//! §3 framework profiles).

use modulus_core::{FrameworkProfile, Version};
use proptest::prelude::*;

/// Strategy for the four numeric components of a [`Version`].
pub fn version_strategy() -> impl Strategy<Value = Version> {
    (0u64..1000, 0u64..1000, 0u64..1000, 0u64..1000).prop_map(|(major, minor, patch, revision)| Version {
        major,
        minor,
        patch,
        revision,
        pre: None,
    })
}

/// Strategy for a version that may carry a pre-release tag.
pub fn version_with_prerelease_strategy() -> impl Strategy<Value = Version> {
    (version_strategy(), proptest::option::of("[a-z]{2,8}(\\.[0-9]{1,3})?")).prop_map(|(mut version, pre)| {
        version.pre = pre;
        version
    })
}

/// Strategy for a plausible framework moniker, parsed into a profile.
pub fn framework_profile_strategy() -> impl Strategy<Value = FrameworkProfile> {
    prop_oneof![
        Just("net6.0".to_string()),
        Just("net7.0".to_string()),
        Just("net8.0".to_string()),
        Just("netstandard2.0".to_string()),
        Just("netstandard2.1".to_string()),
    ]
    .prop_map(|moniker| FrameworkProfile::parse_moniker(&moniker))
}

/// Strategy for a library identifier in the `Vendor.Word` shape the
/// fixtures use.
pub fn library_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z]{2,12}\\.[A-Z][a-zA-Z]{2,12}"
}

proptest! {
    #[test]
    fn version_strategy_values_always_parse_through_display(v in version_strategy()) {
        let rendered = v.to_string();
        let parsed = Version::parse(&rendered).unwrap();
        prop_assert_eq!(parsed, v);
    }

    #[test]
    fn framework_profile_strategy_identifiers_are_never_empty(p in framework_profile_strategy()) {
        prop_assert!(!p.identifier.is_empty());
    }
}
