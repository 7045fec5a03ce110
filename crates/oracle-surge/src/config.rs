//! File based module configuration.
//!
//! The embedding host decides the module wide lane defaults once at startup
//! and hands the validated result to [`SurgeHook::new`]. Percentages are
//! decimal strings so the file round trips exactly into 18 decimal fixed
//! point values.
//!
//! [`SurgeHook::new`]: crate::hook::SurgeHook::new

use {
    crate::{math::fixed_point::Bfp, pool::LaneDefaults},
    anyhow::{Context, Result},
    serde::Deserialize,
    std::path::Path,
};

/// Lane defaults as read from a TOML file. The cap deviation is not
/// configurable; fresh lanes always start fully open at 1.0.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookConfig {
    pub default_threshold_percentage: Bfp,
    pub default_max_fee_percentage: Bfp,
}

impl HookConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        toml::from_str(&content).context("invalid hook configuration")
    }

    /// Validated defaults ready to hand to the engine.
    pub fn into_defaults(self) -> Result<LaneDefaults> {
        LaneDefaults::try_new(
            self.default_threshold_percentage,
            self.default_max_fee_percentage,
        )
        .context("invalid lane defaults")
    }
}
