//! Image-backed symbol atlas.
//!
//! Reads only the header of each symbol image to learn its intrinsic size,
//! which is all the reels need to fit symbols into their cells. Decoding and
//! uploading the pixels is left to whatever renders the machine.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::reel::{SymbolAtlas, SymbolId};

/// Symbol images resolved from disk, indexed by [`SymbolId`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageAtlas {
    entries: Vec<(PathBuf, (u32, u32))>,
}

impl ImageAtlas {
    /// Resolve every symbol image. Fails on the first image that cannot be
    /// read, since reels must not be built from unresolved symbols.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        Self::load_from(Path::new(""), paths)
    }

    /// Like [`load`](Self::load), resolving relative paths against `base`.
    pub fn load_from<P: AsRef<Path>>(base: &Path, paths: &[P]) -> Result<Self> {
        let entries = paths
            .iter()
            .map(|path| {
                let path = base.join(path.as_ref());
                let size = image::image_dimensions(&path).map_err(|source| Error::Asset {
                    path: path.clone(),
                    source,
                })?;
                Ok((path, size))
            })
            .collect::<Result<Vec<_>>>()?;
        log::info!("Loaded {} symbol images", entries.len());
        Ok(Self { entries })
    }

    pub fn path(&self, symbol: SymbolId) -> Option<&Path> {
        self.entries.get(symbol.index()).map(|(path, _)| path.as_path())
    }
}

impl SymbolAtlas for ImageAtlas {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn natural_size(&self, symbol: SymbolId) -> Option<(u32, u32)> {
        self.entries.get(symbol.index()).map(|(_, size)| *size)
    }
}
