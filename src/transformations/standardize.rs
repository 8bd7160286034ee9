use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::domain::Table;

fn default_version() -> u32 {
    1
}

/// One raw-token-to-canonical-token substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

/// Versioned substitution table mapping non-canonical category spellings to
/// canonical ones.
///
/// The mapping is configuration, not stage logic: new spelling variants ship
/// as data (TOML) without touching the normalizer. It never adapts to
/// variants absent from the table.
///
/// # Examples
///
/// ```
/// use telco_cleanse::transformations::CanonicalMap;
///
/// let map = CanonicalMap::default();
/// assert_eq!(map.canonical("Wanita"), Some("Female"));
/// assert_eq!(map.canonical("Female"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMap {
    #[serde(default = "default_version")]
    pub version: u32,
    pub replacements: Vec<Replacement>,
}

impl Default for CanonicalMap {
    fn default() -> Self {
        let pairs = [
            ("Wanita", "Female"),
            ("Laki-Laki", "Male"),
            ("Churn", "Yes"),
            ("Iya", "Yes"),
        ];
        Self {
            version: default_version(),
            replacements: pairs
                .into_iter()
                .map(|(from, to)| Replacement {
                    from: from.to_string(),
                    to: to.to_string(),
                })
                .collect(),
        }
    }
}

impl CanonicalMap {
    /// The canonical spelling for a token, `None` when the token is already
    /// canonical or unknown.
    pub fn canonical(&self, token: &str) -> Option<&str> {
        self.replacements
            .iter()
            .find(|r| r.from == token)
            .map(|r| r.to.as_str())
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("failed to parse canonical map TOML")
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read canonical map file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}

/// Rewrites every string cell whose exact value appears in the map.
///
/// The replace is deliberately global: a token is rewritten regardless of
/// which column holds it, identifier and outcome label included. Returns the
/// table and the number of cells rewritten.
pub fn standardize_categories(mut table: Table, map: &CanonicalMap) -> (Table, usize) {
    let mut rewrites = 0;
    for rec in &mut table.rows {
        for cell in rec.text_cells_mut() {
            if let Some(canonical) = map.canonical(cell) {
                *cell = canonical.to_string();
                rewrites += 1;
            }
        }
        if let Some(churn) = rec.churn.as_mut() {
            if let Some(canonical) = map.canonical(churn) {
                *churn = canonical.to_string();
                rewrites += 1;
            }
        }
    }
    (table, rewrites)
}
