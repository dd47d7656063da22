use serde::{Deserialize, Serialize};

/// Name of the backing document collection.
pub const COLLECTION: &str = "patentes";

/// Every stored plate key is exactly this many characters.
pub const PLATE_LEN: usize = 6;

/// A plate and the user it is associated with.
///
/// The plate doubles as the document id, so saving a record with an existing
/// plate replaces the previous one entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateRecord {
    #[serde(rename = "patente", default)]
    pub plate: String,
    #[serde(rename = "usuario", default)]
    pub user: String,
    #[serde(rename = "estado", default)]
    pub linked: bool,
}

impl PlateRecord {
    /// Build a record, normalizing the plate into its storage key form.
    pub fn new(plate: &str, user: impl Into<String>, linked: bool) -> Self {
        Self {
            plate: normalize_plate(plate),
            user: user.into(),
            linked,
        }
    }

    /// Fill in the plate from the document key when the stored field is missing.
    pub fn with_key(mut self, key: &str) -> Self {
        if self.plate.is_empty() {
            self.plate = normalize_plate(key);
        }
        self
    }
}

/// Lowercase a raw plate so it can be used as a storage key.
pub fn normalize_plate(raw: &str) -> String {
    raw.to_lowercase()
}

/// Whether `raw` has the length every plate key must have.
///
/// Workflows do not check this themselves; callers are expected to.
pub fn has_plate_len(raw: &str) -> bool {
    raw.chars().count() == PLATE_LEN
}
