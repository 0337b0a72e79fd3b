use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Host platform an adapter bundle is built for.
///
/// Determined once per bundle and never changes afterwards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Plain browser context.
    Web,
    /// Next.js, either its browser side or the generic server-side case.
    Nextjs,
    /// React Native runtime.
    ReactNative,
}

impl Platform {
    /// Returns `true` for platforms that may expose browser globals
    /// (`localStorage`, a `fetch` polyfill).
    #[must_use]
    pub const fn is_browser_like(self) -> bool {
        matches!(self, Self::Web | Self::Nextjs)
    }
}
