use std::{collections::HashMap, path::Path, sync::Arc};

use crate::{
    composition::model::FontFamily,
    foundation::error::{ThumbkitError, ThumbkitResult},
};

/// Where fonts are discovered.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// Directory scanned for `.ttf`/`.otf`/`.ttc` files before system fonts are consulted.
    pub fonts_dir: Option<std::path::PathBuf>,
    pub load_system_fonts: bool,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            fonts_dir: None,
            load_system_fonts: true,
        }
    }
}

/// Font bytes resolved for one overlay family.
#[derive(Clone)]
pub struct FontFace {
    pub family: FontFamily,
    /// Family name of the face actually selected (may be a generic fallback).
    pub resolved_name: String,
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("resolved_name", &self.resolved_name)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Font database keyed by [`FontFamily`], backed by `fontdb`.
pub struct FontBook {
    db: usvg::fontdb::Database,
    resolved: HashMap<FontFamily, FontFace>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::empty()
    }
}

impl FontBook {
    /// A book with no fonts; populate with [`FontBook::load_dir`] or
    /// [`FontBook::register_bytes`].
    pub fn empty() -> Self {
        Self {
            db: usvg::fontdb::Database::new(),
            resolved: HashMap::new(),
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn from_settings(settings: &FontSettings) -> Self {
        let mut book = Self::empty();
        if let Some(dir) = &settings.fonts_dir {
            book.load_dir(dir);
        }
        if settings.load_system_fonts {
            book.db.load_system_fonts();
        }
        tracing::debug!(faces = book.db.len(), "font database ready");
        book
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn load_dir(&mut self, dir: &Path) {
        let Ok(rd) = std::fs::read_dir(dir) else {
            tracing::warn!(dir = %dir.display(), "font directory is not readable");
            return;
        };

        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            if let Err(err) = self.db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable font file");
            }
        }
        self.resolved.clear();
    }

    pub fn register_bytes(&mut self, bytes: Vec<u8>) {
        self.db.load_font_data(bytes);
        self.resolved.clear();
    }

    /// Face for `family`, falling back to a generic family of the same flavor and then to any
    /// face in the database.
    pub fn resolve(&mut self, family: FontFamily) -> ThumbkitResult<FontFace> {
        if let Some(face) = self.resolved.get(&family) {
            return Ok(face.clone());
        }

        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let generic = match family {
            FontFamily::PlayfairDisplay => Family::Serif,
            FontFamily::Lobster => Family::Cursive,
            _ => Family::SansSerif,
        };
        let families = [Family::Name(family.family_name()), generic, Family::SansSerif];
        let query = Query {
            families: &families,
            weight: Weight::BOLD,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };

        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| {
                ThumbkitError::render(format!(
                    "no font available for family '{}'",
                    family.family_name()
                ))
            })?;

        let resolved_name = self
            .db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "unknown".to_string());
        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| ThumbkitError::render("font face data is not accessible"))?;

        if resolved_name != family.family_name() {
            tracing::debug!(
                requested = family.family_name(),
                resolved = %resolved_name,
                "font family fell back"
            );
        }

        let face = FontFace {
            family,
            resolved_name,
            bytes: Arc::new(bytes),
            index,
        };
        self.resolved.insert(family, face.clone());
        Ok(face)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
