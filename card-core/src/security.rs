//! Anti-counterfeiting feature toggles.
//!
//! Toggling a feature never touches geometry; the profile is pure
//! configuration read by pricing and print collaborators.

use serde::{Deserialize, Serialize};

/// Pricing tier of a security feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    /// Included in the base price.
    Standard,
    /// Carries a surcharge.
    Premium,
}

/// The fixed set of security features a card can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityFeature {
    /// Holographic overlay.
    Hologram,
    /// Background watermark.
    Watermark,
    /// Microprinted text.
    Microtext,
    /// Signed verification code.
    SecureCode,
    /// Ultraviolet-reactive ink.
    UvInk,
}

impl SecurityFeature {
    /// Every feature, in display order.
    pub const ALL: [SecurityFeature; 5] = [
        SecurityFeature::Hologram,
        SecurityFeature::Watermark,
        SecurityFeature::Microtext,
        SecurityFeature::SecureCode,
        SecurityFeature::UvInk,
    ];

    /// Pricing tier.
    #[must_use]
    pub const fn tier(self) -> CostTier {
        match self {
            Self::Hologram | Self::UvInk => CostTier::Premium,
            Self::Watermark | Self::Microtext | Self::SecureCode => CostTier::Standard,
        }
    }
}

/// Enabled/disabled state of every security feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct SecurityProfile {
    /// Holographic overlay.
    pub hologram: bool,
    /// Background watermark.
    pub watermark: bool,
    /// Microprinted text.
    pub microtext: bool,
    /// Signed verification code.
    pub secure_code: bool,
    /// Ultraviolet-reactive ink.
    pub uv_ink: bool,
}

impl SecurityProfile {
    fn flag_mut(&mut self, feature: SecurityFeature) -> &mut bool {
        match feature {
            SecurityFeature::Hologram => &mut self.hologram,
            SecurityFeature::Watermark => &mut self.watermark,
            SecurityFeature::Microtext => &mut self.microtext,
            SecurityFeature::SecureCode => &mut self.secure_code,
            SecurityFeature::UvInk => &mut self.uv_ink,
        }
    }

    /// Whether `feature` is enabled.
    #[must_use]
    pub fn is_enabled(&self, feature: SecurityFeature) -> bool {
        match feature {
            SecurityFeature::Hologram => self.hologram,
            SecurityFeature::Watermark => self.watermark,
            SecurityFeature::Microtext => self.microtext,
            SecurityFeature::SecureCode => self.secure_code,
            SecurityFeature::UvInk => self.uv_ink,
        }
    }

    /// Flip one feature.
    #[must_use]
    pub fn toggled(mut self, feature: SecurityFeature) -> Self {
        let flag = self.flag_mut(feature);
        *flag = !*flag;
        self
    }

    /// Enabled features, in display order.
    pub fn enabled(&self) -> impl Iterator<Item = SecurityFeature> + '_ {
        SecurityFeature::ALL
            .into_iter()
            .filter(|f| self.is_enabled(*f))
    }

    /// Number of enabled features.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    /// Enabled features that carry a surcharge.
    pub fn premium_features(&self) -> impl Iterator<Item = SecurityFeature> + '_ {
        self.enabled().filter(|f| f.tier() == CostTier::Premium)
    }

    /// Highest tier among enabled features.
    #[must_use]
    pub fn tier(&self) -> CostTier {
        self.enabled()
            .map(SecurityFeature::tier)
            .max()
            .unwrap_or(CostTier::Standard)
    }
}
