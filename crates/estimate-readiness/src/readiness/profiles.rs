use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::domain::{FieldSpec, FieldTier, Trade};
use super::policy::PresencePolicy;

/// Version stamp of the profiles compiled into the engine.
pub const STANDARD_PROFILE_VERSION: &str = "2024.1";

/// Largest weight a single field may carry in a loaded profile.
pub const MAX_FIELD_WEIGHT: u32 = 10_000;

/// Ordered field configuration for one trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeProfile {
    pub trade: Trade,
    pub fields: Vec<FieldSpec>,
}

impl TradeProfile {
    pub fn new(trade: Trade, fields: Vec<FieldSpec>) -> Self {
        Self { trade, fields }
    }

    /// Sum of every field weight; the denominator of the confidence ratio.
    pub fn max_score(&self) -> u64 {
        self.fields.iter().map(|field| u64::from(field.weight)).sum()
    }

    /// Paths that are reported when unsupplied (critical and important tiers).
    pub fn tracked_paths(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|field| field.tier.is_tracked())
            .map(|field| field.path.as_str())
    }

    pub fn fields_in_tier(&self, tier: FieldTier) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(move |field| field.tier == tier)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.max_score() == 0 {
            return Err(ProfileError::ZeroTotalWeight(self.trade));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.path.trim().is_empty() {
                return Err(ProfileError::EmptyPath(self.trade));
            }
            if field.weight == 0 {
                return Err(ProfileError::ZeroWeight {
                    trade: self.trade,
                    path: field.path.clone(),
                });
            }
            if field.weight > MAX_FIELD_WEIGHT {
                return Err(ProfileError::WeightTooLarge {
                    trade: self.trade,
                    path: field.path.clone(),
                    weight: field.weight,
                });
            }
            if !seen.insert(field.path.as_str()) {
                return Err(ProfileError::DuplicatePath {
                    trade: self.trade,
                    path: field.path.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Versioned set holding exactly one profile per trade.
///
/// Construct through [`ProfileSet::standard`] or one of the loaders; every
/// loader validates, so a `ProfileSet` in hand always has a non-zero weight
/// total for each trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileSetDocument")]
pub struct ProfileSet {
    version: String,
    profiles: [TradeProfile; 3],
}

/// Unvalidated on-disk shape of a profile set.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSetDocument {
    pub version: String,
    pub profiles: Vec<TradeProfile>,
}

impl ProfileSet {
    pub fn standard() -> Self {
        Self {
            version: STANDARD_PROFILE_VERSION.to_string(),
            profiles: [hvac_profile(), plumbing_profile(), electrical_profile()],
        }
    }

    pub fn new(
        version: impl Into<String>,
        profiles: Vec<TradeProfile>,
    ) -> Result<Self, ProfileError> {
        Self::try_from(ProfileSetDocument {
            version: version.into(),
            profiles,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        let document: ProfileSetDocument = serde_json::from_str(raw)?;
        Self::try_from(document)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn profile(&self, trade: Trade) -> &TradeProfile {
        &self.profiles[trade.index()]
    }

    pub fn profiles(&self) -> &[TradeProfile] {
        &self.profiles
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<ProfileSetDocument> for ProfileSet {
    type Error = ProfileError;

    fn try_from(document: ProfileSetDocument) -> Result<Self, Self::Error> {
        let mut slots: [Option<TradeProfile>; 3] = [None, None, None];

        for profile in document.profiles {
            profile.validate()?;
            let slot = &mut slots[profile.trade.index()];
            if slot.is_some() {
                return Err(ProfileError::DuplicateTrade(profile.trade));
            }
            *slot = Some(profile);
        }

        let [hvac, plumbing, electrical] = slots;
        Ok(Self {
            version: document.version,
            profiles: [
                hvac.ok_or(ProfileError::MissingTrade(Trade::Hvac))?,
                plumbing.ok_or(ProfileError::MissingTrade(Trade::Plumbing))?,
                electrical.ok_or(ProfileError::MissingTrade(Trade::Electrical))?,
            ],
        })
    }
}

/// Problems found while loading or validating trade profiles.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile set has no {0} profile")]
    MissingTrade(Trade),
    #[error("profile set defines {0} more than once")]
    DuplicateTrade(Trade),
    #[error("{0} profile has zero total weight")]
    ZeroTotalWeight(Trade),
    #[error("{trade} field '{path}' has zero weight")]
    ZeroWeight { trade: Trade, path: String },
    #[error("{trade} field '{path}' weight {weight} exceeds the maximum of {max}", max = MAX_FIELD_WEIGHT)]
    WeightTooLarge {
        trade: Trade,
        path: String,
        weight: u32,
    },
    #[error("{0} profile contains a field with an empty path")]
    EmptyPath(Trade),
    #[error("{trade} field '{path}' is listed more than once")]
    DuplicatePath { trade: Trade, path: String },
    #[error("failed to read profile set {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid profile set document: {0}")]
    Parse(#[from] serde_json::Error),
}

fn field(path: &str, weight: u32, tier: FieldTier, policy: PresencePolicy) -> FieldSpec {
    FieldSpec::new(path, weight, tier, policy)
}

fn hvac_profile() -> TradeProfile {
    use FieldTier::{Critical, Important, NiceToHave};
    use PresencePolicy::{Simple, StrictArray};

    TradeProfile::new(
        Trade::Hvac,
        vec![
            field("squareFootage", 15, Critical, StrictArray),
            field("yearBuilt", 15, Critical, StrictArray),
            field("hvacData.currentSystems", 15, Critical, StrictArray),
            field("hvacData.climateZone", 15, Critical, StrictArray),
            field("hvacData.buildingConstruction", 6, Important, Simple),
            field("hvacData.ceilingHeight", 6, Important, Simple),
            field("hvacData.windowCount", 6, Important, Simple),
            field("hvacData.windowType", 6, Important, Simple),
            field("hvacData.insulationQuality", 6, Important, Simple),
            field("hvacData.utilityCosts", 5, NiceToHave, Simple),
            field("hvacData.ductworkAccess", 5, NiceToHave, Simple),
        ],
    )
}

fn plumbing_profile() -> TradeProfile {
    use FieldTier::{Critical, Important, NiceToHave};
    use PresencePolicy::Simple;

    TradeProfile::new(
        Trade::Plumbing,
        vec![
            field("plumbingData.fullBathrooms", 18, Critical, Simple),
            field("plumbingData.halfBathrooms", 12, Critical, Simple),
            field("plumbingData.kitchens", 15, Critical, Simple),
            field("yearBuilt", 15, Critical, Simple),
            field("propertyType", 10, Critical, Simple),
            field("plumbingData.pipeMaterial", 5, Important, Simple),
            field("plumbingData.waterHeaterType", 5, Important, Simple),
            field("plumbingData.waterHeaterAge", 5, Important, Simple),
            field("plumbingData.accessPoints", 5, Important, Simple),
            field("plumbingData.waterPressureIssues", 5, Important, Simple),
            field("plumbingData.fixtureQuality", 3, NiceToHave, Simple),
            field("plumbingData.washerDryerHookup", 2, NiceToHave, Simple),
        ],
    )
}

// Important-tier electrical fields accept an empty list as an answer ("none").
fn electrical_profile() -> TradeProfile {
    use FieldTier::{Critical, Important, NiceToHave};
    use PresencePolicy::{LenientArray, Simple, StrictArray};

    TradeProfile::new(
        Trade::Electrical,
        vec![
            field("electricalData.panelCapacity", 20, Critical, StrictArray),
            field("electricalData.panelAge", 15, Critical, StrictArray),
            field("electricalData.majorAppliances", 15, Critical, StrictArray),
            field("yearBuilt", 10, Critical, StrictArray),
            field("electricalData.outdoorElectrical", 10, Important, LenientArray),
            field("electricalData.smartFeatures", 10, Important, LenientArray),
            field("electricalData.highDemandFacilities", 10, Important, LenientArray),
            field("squareFootage", 5, NiceToHave, Simple),
            field("propertyType", 5, NiceToHave, Simple),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_profiles_validate_and_total_one_hundred() {
        let set = ProfileSet::standard();
        assert_eq!(set.version(), STANDARD_PROFILE_VERSION);
        for trade in Trade::ordered() {
            let profile = set.profile(trade);
            assert_eq!(profile.trade, trade);
            profile.validate().expect("standard profile is valid");
            assert_eq!(profile.max_score(), 100, "{trade} weight total");
        }
    }

    #[test]
    fn standard_tiers_match_published_weights() {
        let set = ProfileSet::standard();

        let hvac = set.profile(Trade::Hvac);
        assert_eq!(hvac.fields_in_tier(FieldTier::Critical).count(), 4);
        assert!(hvac
            .fields_in_tier(FieldTier::Important)
            .all(|field| field.weight == 6));
        assert_eq!(hvac.tracked_paths().count(), 9);

        let plumbing = set.profile(Trade::Plumbing);
        assert!(plumbing
            .fields
            .iter()
            .all(|field| field.presence_policy == PresencePolicy::Simple));
        assert_eq!(plumbing.tracked_paths().count(), 10);

        let electrical = set.profile(Trade::Electrical);
        assert!(electrical
            .fields_in_tier(FieldTier::Important)
            .all(|field| field.presence_policy == PresencePolicy::LenientArray));
        assert!(electrical
            .fields_in_tier(FieldTier::Critical)
            .all(|field| field.presence_policy == PresencePolicy::StrictArray));
    }

    #[test]
    fn json_round_trip_preserves_the_set() {
        let set = ProfileSet::standard();
        let encoded = serde_json::to_string(&set).expect("profile set encodes");
        let decoded = ProfileSet::from_json(&encoded).expect("profile set decodes");
        assert_eq!(decoded, set);

        let via_serde: ProfileSet = serde_json::from_str(&encoded).expect("try_from decode");
        assert_eq!(via_serde, set);
    }

    #[test]
    fn rejects_zero_weight_profiles() {
        let mut profiles = ProfileSet::standard().profiles().to_vec();
        profiles[1].fields.clear();

        let err = ProfileSet::new("broken", profiles).expect_err("empty plumbing rejected");
        assert!(matches!(err, ProfileError::ZeroTotalWeight(Trade::Plumbing)));
    }

    #[test]
    fn rejects_zero_weight_field() {
        let mut profiles = ProfileSet::standard().profiles().to_vec();
        profiles[0].fields[0].weight = 0;

        let err = ProfileSet::new("broken", profiles).expect_err("zero weight rejected");
        match err {
            ProfileError::ZeroWeight { trade, path } => {
                assert_eq!(trade, Trade::Hvac);
                assert_eq!(path, "squareFootage");
            }
            other => panic!("expected zero weight error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_oversized_weights_from_documents() {
        let mut profiles = ProfileSet::standard().profiles().to_vec();
        profiles[0].fields[0].weight = u32::MAX;
        profiles[0].fields[1].weight = u32::MAX;
        let document = serde_json::json!({ "version": "huge", "profiles": profiles });

        let err = ProfileSet::from_json(&document.to_string()).expect_err("oversized weight");
        match err {
            ProfileError::WeightTooLarge {
                trade,
                path,
                weight,
            } => {
                assert_eq!(trade, Trade::Hvac);
                assert_eq!(path, "squareFootage");
                assert_eq!(weight, u32::MAX);
            }
            other => panic!("expected weight too large, got {other:?}"),
        }
    }

    #[test]
    fn max_score_does_not_wrap() {
        let profile = TradeProfile::new(
            Trade::Plumbing,
            vec![
                FieldSpec::new("a", u32::MAX, FieldTier::Critical, PresencePolicy::Simple),
                FieldSpec::new("b", u32::MAX, FieldTier::Critical, PresencePolicy::Simple),
            ],
        );
        assert_eq!(profile.max_score(), 2 * u64::from(u32::MAX));
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::WeightTooLarge { .. })
        ));
    }

    #[test]
    fn accepts_weights_at_the_cap() {
        let mut profiles = ProfileSet::standard().profiles().to_vec();
        profiles[2].fields[0].weight = MAX_FIELD_WEIGHT;
        ProfileSet::new("heavy", profiles).expect("weight at the cap is valid");
    }

    #[test]
    fn rejects_missing_and_duplicate_trades() {
        let mut profiles = ProfileSet::standard().profiles().to_vec();
        profiles.pop();
        let err = ProfileSet::new("short", profiles.clone()).expect_err("missing electrical");
        assert!(matches!(err, ProfileError::MissingTrade(Trade::Electrical)));

        profiles.push(profiles[0].clone());
        let err = ProfileSet::new("dup", profiles).expect_err("duplicate hvac");
        assert!(matches!(err, ProfileError::DuplicateTrade(Trade::Hvac)));
    }

    #[test]
    fn rejects_duplicate_paths_within_a_profile() {
        let mut profiles = ProfileSet::standard().profiles().to_vec();
        let repeated = profiles[2].fields[0].clone();
        profiles[2].fields.push(repeated);

        let err = ProfileSet::new("dup-path", profiles).expect_err("duplicate path");
        assert!(matches!(err, ProfileError::DuplicatePath { trade: Trade::Electrical, .. }));
    }

    #[test]
    fn malformed_documents_surface_parse_errors() {
        let err = ProfileSet::from_json("{\"version\": 3}").expect_err("bad document");
        assert!(matches!(err, ProfileError::Parse(_)));

        let err = ProfileSet::from_path("/nonexistent/profiles.json").expect_err("no file");
        assert!(matches!(err, ProfileError::Io { .. }));
    }
}
