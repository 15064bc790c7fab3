use std::sync::RwLock;

use tracing::{info, warn};

use crate::db::repositories::settings_repository::SettingsRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::scoring::PointWeights;
use crate::models::settings::{ScoringPreset, ScoringRules, ScoringRulesUpdate};
use crate::services::scoring_engine::ScoringEngine;

const KEY_SCORING_RULES: &str = "scoring_rules";

/// Owns the active point-weight table. Rules are stored in `app_settings` and
/// cached after the first read.
pub struct ScoringRulesService {
    db: DbPool,
    cache: RwLock<Option<ScoringRules>>,
}

impl ScoringRulesService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<ScoringRules> {
        if let Ok(guard) = self.cache.read() {
            if let Some(rules) = guard.as_ref() {
                return Ok(rules.clone());
            }
        }

        let rules = self.load_rules_from_db()?;
        self.store_in_cache(&rules);
        Ok(rules)
    }

    pub fn weights(&self) -> AppResult<PointWeights> {
        Ok(self.get()?.weights)
    }

    pub fn engine(&self) -> AppResult<ScoringEngine> {
        Ok(ScoringEngine::new(self.weights()?))
    }

    pub fn update(&self, input: ScoringRulesUpdate) -> AppResult<ScoringRules> {
        let rules = resolve_update(input)?;
        self.persist(&rules)?;
        info!(
            target: "app::scoring",
            preset = rules.preset.as_str(),
            "scoring rules updated"
        );
        Ok(rules)
    }

    /// Installs a custom table read from a YAML rule file.
    pub fn load_yaml(&self, raw: &str) -> AppResult<ScoringRules> {
        let weights = PointWeights::from_yaml_str(raw)?;
        self.update(ScoringRulesUpdate {
            preset: Some(ScoringPreset::Custom),
            weights: Some(weights),
        })
    }

    /// Drops stored rules so the default preset applies again.
    pub fn reset(&self) -> AppResult<ScoringRules> {
        self.db
            .with_connection(|conn| SettingsRepository::delete(conn, KEY_SCORING_RULES))?;
        let rules = ScoringRules::default();
        self.store_in_cache(&rules);
        info!(target: "app::scoring", preset = rules.preset.as_str(), "scoring rules reset");
        Ok(rules)
    }

    fn persist(&self, rules: &ScoringRules) -> AppResult<()> {
        self.db.with_connection(|conn| {
            SettingsRepository::put_json(conn, KEY_SCORING_RULES, rules)
        })?;
        self.store_in_cache(rules);
        Ok(())
    }

    fn load_rules_from_db(&self) -> AppResult<ScoringRules> {
        let stored: Option<ScoringRules> = self
            .db
            .with_connection(|conn| SettingsRepository::get_json(conn, KEY_SCORING_RULES))?;

        let Some(mut rules) = stored else {
            let rules = ScoringRules::default();
            info!(
                target: "app::scoring",
                preset = rules.preset.as_str(),
                "no scoring rules stored, using default preset"
            );
            return Ok(rules);
        };

        if let Some(expected) = rules.preset.weights() {
            if expected != rules.weights {
                warn!(
                    target: "app::scoring",
                    preset = rules.preset.as_str(),
                    "stored weights differ from preset table, using preset table"
                );
                rules.weights = expected;
            }
        }

        Ok(rules)
    }

    fn store_in_cache(&self, rules: &ScoringRules) {
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(rules.clone());
        }
    }
}

fn resolve_update(input: ScoringRulesUpdate) -> AppResult<ScoringRules> {
    match (input.preset, input.weights) {
        (None, None) => Err(AppError::validation("no scoring rule change supplied")),
        (Some(ScoringPreset::Custom), None) => Err(AppError::validation(
            "a custom scoring preset needs a weight table",
        )),
        (None, Some(weights)) | (Some(ScoringPreset::Custom), Some(weights)) => {
            weights.validate()?;
            Ok(ScoringRules {
                preset: ScoringPreset::Custom,
                weights,
            })
        }
        (Some(preset), weights) => {
            let table = preset.weights().ok_or_else(|| {
                AppError::other(format!("preset {} has no built-in table", preset.as_str()))
            })?;
            if let Some(weights) = weights {
                if weights != table {
                    return Err(AppError::validation_with_details(
                        "weights do not match the selected preset",
                        serde_json::json!({ "preset": preset.as_str() }),
                    ));
                }
            }
            Ok(ScoringRules {
                preset,
                weights: table,
            })
        }
    }
}
