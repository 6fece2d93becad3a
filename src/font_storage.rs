use std::{collections::HashMap, path::Path, sync::Arc};

use crate::font::{BakeConfig, BakedFont, bake};

/// Outline fonts that bitmap fonts are baked from.
///
/// Faces are indexed by `fontdb`; a face is parsed into a `fontdue::Font` the
/// first time it is needed and kept for later bakes.
pub struct FontStorage {
    font_db: fontdb::Database,
    /// Parsed faces, a subset of `font_db`.
    parsed: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            parsed: HashMap::default(),
        }
    }

    /// The underlying face database, e.g. to set generic family names.
    pub fn database(&self) -> &fontdb::Database {
        &self.font_db
    }

    /// Mutable access to the face database.
    pub fn database_mut(&mut self) -> &mut fontdb::Database {
        &mut self.font_db
    }
}

/// Loading faces.
impl FontStorage {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        self.font_db.load_fonts_dir(dir)
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Removes a face and its parsed font.
    pub fn remove_face(&mut self, id: fontdb::ID) {
        self.font_db.remove_face(id);
        self.parsed.remove(&id);
    }

    /// Checks if no face is known.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Number of known faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }

    /// Iterates over the known faces.
    pub fn faces(&self) -> impl Iterator<Item = &fontdb::FaceInfo> {
        self.font_db.faces()
    }

    /// Face info for an ID.
    pub fn face(&self, id: fontdb::ID) -> Option<&fontdb::FaceInfo> {
        self.font_db.face(id)
    }
}

/// Parsing and baking.
impl FontStorage {
    /// Finds the best face for `query` and parses it.
    pub fn query(&mut self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        let id = self.font_db.query(query)?;
        self.font(id).map(|font| (id, font))
    }

    /// The parsed face `id`, parsing it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.parsed.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let parsed = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            ..Default::default()
                        },
                    )
                })?;

                match parsed {
                    Ok(font) => Some(Arc::clone(entry.insert(Arc::new(font)))),
                    Err(e) => {
                        log::error!("Failed to parse font (id: {id:?}): {e}");
                        None
                    }
                }
            }
        }
    }

    /// Bakes face `id` into a bitmap font.
    pub fn bake(&mut self, id: fontdb::ID, config: &BakeConfig) -> Option<BakedFont> {
        let font = self.font(id)?;
        bake::bake(&font, config)
    }

    /// Bakes the best face for `query`.
    pub fn bake_query(&mut self, query: &fontdb::Query, config: &BakeConfig) -> Option<BakedFont> {
        let (_, font) = self.query(query)?;
        bake::bake(&font, config)
    }
}
