// SPDX-FileCopyrightText: 2026 Nowgo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The model catalog: an immutable, ordered set of model profiles.
//!
//! Built once at startup from `[catalog]` configuration and shared by
//! reference (`Arc<Catalog>`) with every decision. Catalog order is
//! significant: selection ties go to the earlier entry.

use std::collections::HashSet;

use nowgo_config::model::CatalogConfig;
use nowgo_core::NowgoError;
use serde::Serialize;

/// Cost, quality, speed and capacity profile of one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelProfile {
    /// Unique model identifier.
    pub id: String,
    /// Human-readable summary.
    pub description: String,
    /// USD per 1K tokens.
    pub cost_per_1k_tokens: f64,
    /// Relative quality, 0.0-1.0.
    pub quality_score: f64,
    /// Relative speed, 0.0-1.0.
    pub speed_score: f64,
    /// Maximum context size in tokens.
    pub max_tokens: u32,
}

/// Immutable model catalog with designated flagship, mid-tier and baseline models.
#[derive(Debug, Clone)]
pub struct Catalog {
    models: Vec<ModelProfile>,
    flagship: usize,
    mid_tier: usize,
    baseline: usize,
}

impl Catalog {
    /// Build a catalog whose savings baseline is the flagship.
    pub fn new(
        models: Vec<ModelProfile>,
        flagship: &str,
        mid_tier: &str,
    ) -> Result<Self, NowgoError> {
        Self::with_baseline(models, flagship, mid_tier, flagship)
    }

    /// Build a catalog with an explicit savings baseline.
    ///
    /// Fails with [`NowgoError::InvalidCatalog`] if the set is empty, an id
    /// repeats, a profile is out of range, or a designated id is absent.
    pub fn with_baseline(
        models: Vec<ModelProfile>,
        flagship: &str,
        mid_tier: &str,
        baseline: &str,
    ) -> Result<Self, NowgoError> {
        if models.is_empty() {
            return Err(NowgoError::InvalidCatalog(
                "catalog must contain at least one model".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.id.as_str()) {
                return Err(NowgoError::InvalidCatalog(format!(
                    "duplicate model id `{}`",
                    model.id
                )));
            }
            check_profile(model)?;
        }

        let position = |id: &str, role: &str| {
            models.iter().position(|m| m.id == id).ok_or_else(|| {
                NowgoError::InvalidCatalog(format!("{role} model `{id}` is not in the catalog"))
            })
        };
        let flagship = position(flagship, "flagship")?;
        let mid_tier = position(mid_tier, "mid-tier")?;
        let baseline = position(baseline, "baseline")?;

        Ok(Self {
            models,
            flagship,
            mid_tier,
            baseline,
        })
    }

    /// Build the catalog described by the `[catalog]` config section.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, NowgoError> {
        let models = config
            .models
            .iter()
            .map(|m| ModelProfile {
                id: m.id.clone(),
                description: m.description.clone(),
                cost_per_1k_tokens: m.cost_per_1k_tokens,
                quality_score: m.quality_score,
                speed_score: m.speed_score,
                max_tokens: m.max_tokens,
            })
            .collect();
        Self::with_baseline(
            models,
            &config.flagship,
            &config.mid_tier,
            config.baseline_model(),
        )
    }

    /// Look up a model by id.
    ///
    /// An unknown id means the caller produced an id the catalog never issued.
    pub fn lookup(&self, id: &str) -> Result<&ModelProfile, NowgoError> {
        self.get(id).ok_or_else(|| NowgoError::ModelNotFound {
            model: id.to_string(),
        })
    }

    /// Look up a model by id, returning `None` if absent.
    pub fn get(&self, id: &str) -> Option<&ModelProfile> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Whether `id` is in the catalog.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All profiles in catalog order.
    pub fn all(&self) -> &[ModelProfile] {
        &self.models
    }

    /// Profiles whose cost is at most `ceiling`, in catalog order.
    pub fn filter_by_max_cost(&self, ceiling: f64) -> Vec<&ModelProfile> {
        self.models
            .iter()
            .filter(|m| m.cost_per_1k_tokens <= ceiling)
            .collect()
    }

    /// The globally cheapest model (earliest entry on ties).
    pub fn cheapest(&self) -> &ModelProfile {
        first_min(&self.models, |m| m.cost_per_1k_tokens).unwrap_or(&self.models[0])
    }

    /// The designated highest-quality model.
    pub fn flagship(&self) -> &ModelProfile {
        &self.models[self.flagship]
    }

    /// The designated mid-tier model.
    pub fn mid_tier(&self) -> &ModelProfile {
        &self.models[self.mid_tier]
    }

    /// The default savings baseline.
    pub fn baseline(&self) -> &ModelProfile {
        &self.models[self.baseline]
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Always false: construction rejects empty catalogs.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn check_profile(model: &ModelProfile) -> Result<(), NowgoError> {
    let invalid = |what: &str| {
        Err(NowgoError::InvalidCatalog(format!(
            "model `{}` has invalid {what}",
            model.id
        )))
    };

    if !model.cost_per_1k_tokens.is_finite() || model.cost_per_1k_tokens < 0.0 {
        return invalid("cost_per_1k_tokens");
    }
    if !(0.0..=1.0).contains(&model.quality_score) {
        return invalid("quality_score");
    }
    if !(0.0..=1.0).contains(&model.speed_score) {
        return invalid("speed_score");
    }
    if model.max_tokens == 0 {
        return invalid("max_tokens");
    }
    Ok(())
}

/// First profile with the smallest `key`; earlier entries win ties.
pub fn first_min<'a, I, F>(models: I, key: F) -> Option<&'a ModelProfile>
where
    I: IntoIterator<Item = &'a ModelProfile>,
    F: Fn(&ModelProfile) -> f64,
{
    models.into_iter().fold(None, |best, m| match best {
        Some(b) if key(b) <= key(m) => Some(b),
        _ => Some(m),
    })
}

/// First profile with the largest `key`; earlier entries win ties.
pub fn first_max<'a, I, F>(models: I, key: F) -> Option<&'a ModelProfile>
where
    I: IntoIterator<Item = &'a ModelProfile>,
    F: Fn(&ModelProfile) -> f64,
{
    models.into_iter().fold(None, |best, m| match best {
        Some(b) if key(b) >= key(m) => Some(b),
        _ => Some(m),
    })
}
