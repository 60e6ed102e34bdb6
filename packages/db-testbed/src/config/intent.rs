//! Operator intent for container-backed provisioning.
//!
//! Container startup costs seconds; suites that only touch the database
//! incidentally want a way out. Intent is resolved from two inputs: the
//! `USE_TESTCONTAINERS` environment variable, and an override supplied
//! through [`TestbedConfig`](crate::config::TestbedConfig) for callers that
//! cannot reach the environment (CI wrappers, harness bootstrap code). The
//! environment variable always wins when present; the override is consulted
//! only when it is absent.

use std::env;
use std::fmt;

use tracing::info;

/// Environment variable consulted first when resolving intent.
pub const USE_TESTCONTAINERS_ENV: &str = "USE_TESTCONTAINERS";

/// The only token that disables container provisioning. Compared
/// case-insensitively after trimming; every other value means "enabled".
const DISABLE_TOKEN: &str = "false";

/// Where a disable decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableSource {
    /// `USE_TESTCONTAINERS` in the process environment.
    EnvVar,
    /// The override value supplied through the testbed configuration.
    OverrideProperty,
}

impl fmt::Display for DisableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVar => write!(f, "{USE_TESTCONTAINERS_ENV} environment variable"),
            Self::OverrideProperty => write!(f, "use.testcontainers override"),
        }
    }
}

/// Resolved operator decision on whether to attempt a container start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningIntent {
    /// Attempt the containerized engine.
    Enabled,
    /// Skip straight to the in-memory fallback.
    Disabled(DisableSource),
}

impl ProvisioningIntent {
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled(_))
    }
}

/// Resolve intent from the process environment plus the configured override.
///
/// The environment variable wins whenever it is present, even with a value
/// that re-enables provisioning; the override is consulted only when the
/// variable is absent. With neither present, provisioning is enabled. Logs
/// when the decision is to disable, and has no other side effects.
pub fn resolve_intent(override_value: Option<&str>) -> ProvisioningIntent {
    let env_value = env::var(USE_TESTCONTAINERS_ENV).ok();
    let intent = resolve_intent_from(env_value.as_deref(), override_value);
    if let ProvisioningIntent::Disabled(source) = intent {
        info!(%source, "container provisioning disabled by operator");
    }
    intent
}

/// Pure resolution core, separated from the environment read so the
/// precedence rules can be tested without touching process state.
pub fn resolve_intent_from(
    env_value: Option<&str>,
    override_value: Option<&str>,
) -> ProvisioningIntent {
    if let Some(value) = env_value {
        return intent_of(value, DisableSource::EnvVar);
    }
    if let Some(value) = override_value {
        return intent_of(value, DisableSource::OverrideProperty);
    }
    ProvisioningIntent::Enabled
}

fn intent_of(value: &str, source: DisableSource) -> ProvisioningIntent {
    if value.trim().eq_ignore_ascii_case(DISABLE_TOKEN) {
        ProvisioningIntent::Disabled(source)
    } else {
        ProvisioningIntent::Enabled
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use proptest::prelude::*;
    use serial_test::serial;
    use testbed_test_support::env::EnvGuard;

    use super::{
        resolve_intent, resolve_intent_from, DisableSource, ProvisioningIntent,
        USE_TESTCONTAINERS_ENV,
    };

    /// Helper to get proptest config from environment
    fn proptest_config() -> ProptestConfig {
        let cases = env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(32); // Low default for fast CI

        ProptestConfig {
            cases,
            ..ProptestConfig::default()
        }
    }

    #[test]
    fn test_absent_everywhere_enables() {
        assert_eq!(
            resolve_intent_from(None, None),
            ProvisioningIntent::Enabled
        );
    }

    /// Table-driven test: env values that disable vs. enable
    #[test]
    fn test_env_value_table() {
        let disabling = ["false", "FALSE", "False", " false ", "\tFaLsE\t"];
        for value in disabling {
            assert_eq!(
                resolve_intent_from(Some(value), None),
                ProvisioningIntent::Disabled(DisableSource::EnvVar),
                "value {value:?} must disable"
            );
        }

        let enabling = ["true", "TRUE", "1", "0", "", "   ", "no", "falsey"];
        for value in enabling {
            assert_eq!(
                resolve_intent_from(Some(value), None),
                ProvisioningIntent::Enabled,
                "value {value:?} must enable"
            );
        }
    }

    #[test]
    fn test_override_consulted_only_when_env_absent() {
        // Env present and non-false: provisioning stays on even though the
        // override says off. The variable short-circuits the override.
        assert_eq!(
            resolve_intent_from(Some("true"), Some("false")),
            ProvisioningIntent::Enabled
        );

        assert_eq!(
            resolve_intent_from(None, Some("false")),
            ProvisioningIntent::Disabled(DisableSource::OverrideProperty)
        );
        assert_eq!(
            resolve_intent_from(None, Some(" FALSE ")),
            ProvisioningIntent::Disabled(DisableSource::OverrideProperty)
        );
        assert_eq!(
            resolve_intent_from(None, Some("true")),
            ProvisioningIntent::Enabled
        );
    }

    #[test]
    fn test_env_false_beats_override_true() {
        assert_eq!(
            resolve_intent_from(Some("false"), Some("true")),
            ProvisioningIntent::Disabled(DisableSource::EnvVar)
        );
    }

    #[test]
    fn test_disable_source_names_its_origin() {
        assert!(DisableSource::EnvVar
            .to_string()
            .contains(USE_TESTCONTAINERS_ENV));
        assert!(DisableSource::OverrideProperty
            .to_string()
            .contains("override"));
    }

    #[test]
    #[serial]
    fn test_resolve_intent_reads_environment() {
        let _guard = EnvGuard::set(USE_TESTCONTAINERS_ENV, "false");
        assert_eq!(
            resolve_intent(Some("true")),
            ProvisioningIntent::Disabled(DisableSource::EnvVar)
        );
    }

    #[test]
    #[serial]
    fn test_resolve_intent_falls_through_to_override() {
        let _guard = EnvGuard::unset(USE_TESTCONTAINERS_ENV);
        assert_eq!(
            resolve_intent(Some(" False")),
            ProvisioningIntent::Disabled(DisableSource::OverrideProperty)
        );
        assert_eq!(resolve_intent(None), ProvisioningIntent::Enabled);
    }

    proptest! {
        #![proptest_config(proptest_config())]

        /// Property: any casing of "false" with surrounding whitespace
        /// disables, from either input.
        #[test]
        fn prop_cased_padded_false_disables(
            caps in proptest::collection::vec(any::<bool>(), 5),
            left_pad in 0usize..4,
            right_pad in 0usize..4,
        ) {
            let token: String = "false"
                .chars()
                .zip(caps.iter())
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
                .collect();
            let padded = format!(
                "{}{}{}",
                " ".repeat(left_pad),
                token,
                " ".repeat(right_pad)
            );

            prop_assert_eq!(
                resolve_intent_from(Some(&padded), None),
                ProvisioningIntent::Disabled(DisableSource::EnvVar)
            );
            prop_assert_eq!(
                resolve_intent_from(None, Some(&padded)),
                ProvisioningIntent::Disabled(DisableSource::OverrideProperty)
            );
        }

        /// Property: values that do not trim to "false" always enable.
        #[test]
        fn prop_non_false_values_enable(value in "[a-zA-Z0-9 ]{0,8}") {
            prop_assume!(!value.trim().eq_ignore_ascii_case("false"));

            prop_assert_eq!(
                resolve_intent_from(Some(&value), None),
                ProvisioningIntent::Enabled
            );
            prop_assert_eq!(
                resolve_intent_from(None, Some(&value)),
                ProvisioningIntent::Enabled
            );
        }
    }
}
