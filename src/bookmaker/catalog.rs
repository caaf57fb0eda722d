//! Static bookmaker metadata keyed by identifier.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::limits::BookmakerLimits;
use crate::error::CatalogError;
use crate::market::BookmakerId;

/// Metadata for one bookmaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmakerProfile {
    /// Exact identifier used by outcomes.
    pub id: BookmakerId,
    /// Display name.
    pub display_name: String,
    /// Typical bookmaker margin (0.05 = 5%).
    pub commission_rate: Decimal,
    /// Smallest accepted stake.
    pub min_stake: Decimal,
    /// Largest accepted stake.
    pub max_stake: Decimal,
}

impl BookmakerProfile {
    /// Stake limits for this bookmaker.
    pub fn limits(&self) -> BookmakerLimits {
        BookmakerLimits {
            bookmaker_id: self.id.clone(),
            min_stake: self.min_stake,
            max_stake: self.max_stake,
        }
    }
}

fn profile(
    id: &str,
    display_name: &str,
    commission_rate: Decimal,
    min_stake: Decimal,
    max_stake: Decimal,
) -> BookmakerProfile {
    BookmakerProfile {
        id: BookmakerId::new(id),
        display_name: display_name.to_string(),
        commission_rate,
        min_stake,
        max_stake,
    }
}

static BUILTIN: Lazy<BookmakerCatalog> = Lazy::new(|| {
    let profiles = [
        profile("betano", "Betano.pt", Decimal::new(5, 2), Decimal::new(10, 2), Decimal::new(10_000, 0)),
        profile("888starz", "888Starz", Decimal::new(4, 2), Decimal::new(20, 2), Decimal::new(50_000, 0)),
        profile("placard", "Placard.pt", Decimal::new(6, 2), Decimal::new(5, 2), Decimal::new(5_000, 0)),
        profile("betclic", "Betclic.pt", Decimal::new(55, 3), Decimal::new(10, 2), Decimal::new(15_000, 0)),
    ];
    BookmakerCatalog {
        profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
    }
});

/// Keyed table of bookmaker profiles.
///
/// Lookups are exact by [`BookmakerId`]; names are never normalised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmakerCatalog {
    profiles: BTreeMap<BookmakerId, BookmakerProfile>,
}

impl BookmakerCatalog {
    /// The built-in catalog of Portuguese bookmakers.
    pub fn builtin() -> &'static BookmakerCatalog {
        &BUILTIN
    }

    /// Build a catalog, validating limits and rejecting duplicate ids.
    pub fn from_profiles(
        profiles: impl IntoIterator<Item = BookmakerProfile>,
    ) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for profile in profiles {
            profile.limits().validate()?;
            if map.contains_key(&profile.id) {
                return Err(CatalogError::Duplicate(profile.id));
            }
            map.insert(profile.id.clone(), profile);
        }
        Ok(Self { profiles: map })
    }

    /// Load a catalog from a JSON array of profiles.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: shown.clone(),
            source,
        })?;
        let profiles: Vec<BookmakerProfile> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: shown.clone(),
                source,
            })?;
        let catalog = Self::from_profiles(profiles)?;
        info!(path = %shown, bookmakers = catalog.len(), "Loaded bookmaker catalog");
        Ok(catalog)
    }

    /// Load from `path` if given, otherwise clone the built-in catalog.
    pub fn load_or_builtin(path: Option<&str>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("Using built-in bookmaker catalog");
                Ok(Self::builtin().clone())
            }
        }
    }

    /// Look up a bookmaker by exact id.
    pub fn get(&self, id: &BookmakerId) -> Option<&BookmakerProfile> {
        self.profiles.get(id)
    }

    /// Limits for every bookmaker in the catalog.
    pub fn limits(&self) -> Vec<BookmakerLimits> {
        self.profiles.values().map(BookmakerProfile::limits).collect()
    }

    /// Iterate profiles ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &BookmakerProfile> {
        self.profiles.values()
    }

    /// Number of bookmakers.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
