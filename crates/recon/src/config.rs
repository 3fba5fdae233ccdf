use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::history::HistoryEntryId;
use crate::identity::{IdentityAuthority, ReconId};
use crate::model::Recon;

// ---------------------------------------------------------------------------
// Per-column reconciliation configuration
// ---------------------------------------------------------------------------

/// Entity type a column is reconciled against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconType {
    pub id: String,
    pub name: String,
}

/// Per-column reconciliation configuration.
///
/// Records which catalog service the column was reconciled against and is
/// the only place operations go to create new recon records for that
/// column. The engine never needs the service's transport, just the
/// identifier space the column's entities live in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconColumnConfig {
    /// Reconciliation service endpoint.
    pub service: String,
    /// Base IRI of the entity identifier space.
    pub identifier_space: String,
    /// Base IRI of the property/schema space.
    pub schema_space: String,
    /// Expected entity type, if the column was restricted to one.
    #[serde(default)]
    pub entity_type: Option<ReconType>,
    /// Candidates scoring at or above this are auto-matched.
    #[serde(default = "default_auto_match_threshold")]
    pub auto_match_threshold: f64,
}

fn default_auto_match_threshold() -> f64 {
    100.0
}

impl ReconColumnConfig {
    /// Parse from TOML, then validate.
    pub fn from_toml(text: &str) -> Result<Self, ReconError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.service.is_empty() {
            return Err(ReconError::ConfigValidation("service must not be empty".into()));
        }
        if self.identifier_space.is_empty() || self.schema_space.is_empty() {
            return Err(ReconError::ConfigValidation(
                "identifier_space and schema_space must not be empty".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.auto_match_threshold) {
            return Err(ReconError::ConfigValidation(format!(
                "auto_match_threshold {} outside 0..=100",
                self.auto_match_threshold
            )));
        }
        Ok(())
    }

    /// Fresh record for a cell of this column, minting its identity from
    /// the authority.
    pub fn new_recon(
        &self,
        history_entry: HistoryEntryId,
        authority: &dyn IdentityAuthority,
    ) -> Recon {
        Recon::new(authority.mint(), history_entry)
    }

    /// Fresh record adopting an identity the authority minted ahead of
    /// time (e.g. by a value-dedup aggregation pass).
    pub fn recon_with_id(&self, id: ReconId, history_entry: HistoryEntryId) -> Recon {
        Recon::new(id, history_entry)
    }
}
