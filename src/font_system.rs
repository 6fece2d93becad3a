use std::{path::Path, sync::Arc};

use parking_lot::Mutex;

use crate::{
    font::{BakeConfig, BakedFont},
    font_storage::FontStorage,
};

/// Thread-safe entry point for loading and baking fonts.
///
/// Wraps a [`FontStorage`] in a `Mutex` so it can be shared between threads,
/// e.g. to bake fonts in the background while the main thread lays out text.
///
/// The storage is public for callers that need several operations under one
/// lock or borrowed access to face info.
pub struct FontSystem {
    pub font_storage: Mutex<FontStorage>,
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSystem {
    /// Creates a font system with an empty storage.
    pub fn new() -> Self {
        Self {
            font_storage: Mutex::new(FontStorage::new()),
        }
    }
}

/// font storage initialization
impl FontSystem {
    /// Loads the system fonts into the storage.
    pub fn load_system_fonts(&self) {
        self.font_storage.lock().load_system_fonts();
    }

    /// Loads a font from binary data.
    pub fn load_font_binary(&self, data: impl Into<Vec<u8>>) {
        self.font_storage.lock().load_font_binary(data);
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&self, path: impl AsRef<Path>) -> Result<(), std::io::Error> {
        self.font_storage.lock().load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&self, dir: impl AsRef<Path>) {
        self.font_storage.lock().load_fonts_dir(dir)
    }

    /// Removes a face by ID.
    pub fn remove_face(&self, id: fontdb::ID) {
        self.font_storage.lock().remove_face(id);
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_storage.lock().is_empty()
    }

    /// Number of known faces.
    pub fn len(&self) -> usize {
        self.font_storage.lock().len()
    }
}

/// font querying
impl FontSystem {
    /// Finds the best face for `query` and parses it.
    pub fn query(&self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<fontdue::Font>)> {
        self.font_storage.lock().query(query)
    }

    /// The parsed face `id`, parsing it on first use.
    pub fn font(&self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        self.font_storage.lock().font(id)
    }

    /// Returns face info for an ID.
    ///
    /// # Performance
    /// The info is cloned so the lock is not held by the caller. Lock
    /// `font_storage` directly for borrowed access.
    pub fn face(&self, id: fontdb::ID) -> Option<fontdb::FaceInfo> {
        self.font_storage.lock().face(id).cloned()
    }
}

/// baking
impl FontSystem {
    /// Bakes face `id` into a bitmap font.
    ///
    /// Only parsing happens under the lock; rasterization runs after it is
    /// released.
    pub fn bake_font(&self, id: fontdb::ID, config: &BakeConfig) -> Option<BakedFont> {
        let font = self.font(id)?;
        crate::font::bake::bake(&font, config)
    }

    /// Bakes the best face for `query`.
    pub fn bake_query(&self, query: &fontdb::Query, config: &BakeConfig) -> Option<BakedFont> {
        let (id, font) = self.query(query)?;
        log::debug!("baking face {id:?} at {}px", config.font_size);
        crate::font::bake::bake(&font, config)
    }
}
