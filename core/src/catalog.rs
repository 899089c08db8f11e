//! Denomination to visual-asset table.
//!
//! Every token is constructed through the catalog, so a denomination without
//! an asset (or an asset file that does not exist on disk) fails at setup
//! instead of producing a half-drawn scene.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use till_types::{Cents, Denomination, MonetaryUnit, UnknownDenomination};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    UnknownDenomination(#[from] UnknownDenomination),
    #[error("no asset mapped for {0}")]
    Unmapped(Denomination),
    #[error("could not load currency image for {denomination}: {}", path.display())]
    Missing {
        denomination: Denomination,
        path: PathBuf,
    },
}

/// Visual identity of one denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Image file name, relative to the asset directory.
    pub file_name: String,
    /// Short label used when images are not drawn (terminal front end).
    pub label: String,
}

impl Asset {
    #[must_use]
    pub fn new(file_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetCatalog {
    entries: HashMap<Denomination, Asset>,
    dir: Option<PathBuf>,
}

impl AssetCatalog {
    /// The standard table: one image per denomination, no directory checks.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(Denomination::DESCENDING.into_iter().map(|d| (d, default_asset(d))))
    }

    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (Denomination, Asset)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            dir: None,
        }
    }

    /// Bind the catalog to an asset directory, verifying every mapped image exists.
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref().to_path_buf();
        for denomination in Denomination::DESCENDING {
            let Some(asset) = self.entries.get(&denomination) else {
                continue;
            };
            let path = dir.join(&asset.file_name);
            if !path.is_file() {
                tracing::error!(path = %path.display(), "Currency image missing");
                return Err(AssetError::Missing { denomination, path });
            }
        }
        self.dir = Some(dir);
        Ok(self)
    }

    pub fn resolve(&self, denomination: Denomination) -> Result<&Asset, AssetError> {
        self.entries
            .get(&denomination)
            .ok_or(AssetError::Unmapped(denomination))
    }

    /// Validate a face value into a unit that has a drawable asset.
    pub fn unit(&self, face_value: Cents) -> Result<MonetaryUnit, AssetError> {
        let unit = MonetaryUnit::new(face_value)?;
        self.resolve(unit.denomination())?;
        Ok(unit)
    }

    #[must_use]
    pub fn label(&self, denomination: Denomination) -> &str {
        self.entries
            .get(&denomination)
            .map_or("?", |asset| asset.label.as_str())
    }

    #[must_use]
    pub fn image_path(&self, denomination: Denomination) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        let asset = self.entries.get(&denomination)?;
        Some(dir.join(&asset.file_name))
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn default_asset(denomination: Denomination) -> Asset {
    match denomination {
        Denomination::FiveDollar => Asset::new("5dollar.png", "$5"),
        Denomination::OneDollar => Asset::new("1dollar.png", "$1"),
        Denomination::Quarter => Asset::new("quarter.png", "25c"),
        Denomination::Dime => Asset::new("dime.png", "10c"),
        Denomination::Nickel => Asset::new("nickel.png", "5c"),
        Denomination::Penny => Asset::new("penny.png", "1c"),
    }
}
