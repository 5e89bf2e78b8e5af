//! Provider capability descriptions.

use crate::models::AssetKind;

/// Describes the capabilities of a market data provider.
///
/// Used by callers to decide which provider handles which asset kind and
/// whether a historical series can be requested at all.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Asset kinds this provider supports.
    pub asset_kinds: &'static [AssetKind],

    /// Whether the provider supports latest-quote fetching.
    pub supports_latest: bool,

    /// Whether the provider supports historical quote fetching.
    pub supports_historical: bool,
}

impl ProviderCapabilities {
    pub fn supports_kind(&self, kind: AssetKind) -> bool {
        self.asset_kinds.contains(&kind)
    }
}
