//! Texture atlas.
//!
//! An `Atlas` packs named rectangular tiles into a fixed-size area using
//! shelves: tiles are placed left to right on the first shelf tall enough to
//! hold them, and a new shelf is opened below the last one when none fits.
//! The atlas only manages placement; pixels live in the texture it refers to.

use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::resource::Handle;

/// Descriptor for creating an atlas
#[derive(Debug, Clone)]
pub struct AtlasDesc {
    /// Debug name
    pub name: String,
    /// Atlas width in pixels
    pub width: u32,
    /// Atlas height in pixels
    pub height: u32,
    /// Empty border kept around every tile, in pixels
    pub padding: u32,
    /// Texture holding the atlas pixels (may be `Handle::INVALID`)
    pub texture: Handle,
}

/// A placed tile, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasTile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// UV region of a tile within the atlas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRegion {
    /// U coordinate (left edge, 0.0..1.0)
    pub u: f32,
    /// V coordinate (top edge, 0.0..1.0)
    pub v: f32,
    /// Width in UV space (0.0..1.0)
    pub width: f32,
    /// Height in UV space (0.0..1.0)
    pub height: f32,
}

#[derive(Debug, Clone, Copy)]
struct Shelf {
    y: u32,
    height: u32,
    cursor: u32,
}

/// Shelf-packed texture atlas
#[derive(Debug)]
pub struct Atlas {
    name: String,
    width: u32,
    height: u32,
    padding: u32,
    texture: Handle,
    shelves: Vec<Shelf>,
    tiles: Vec<AtlasTile>,
    tile_names: FxHashMap<String, usize>,
}

impl Atlas {
    pub fn new(desc: AtlasDesc) -> Self {
        Self {
            name: desc.name,
            width: desc.width,
            height: desc.height,
            padding: desc.padding,
            texture: desc.texture,
            shelves: Vec::new(),
            tiles: Vec::new(),
            tile_names: FxHashMap::default(),
        }
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texture(&self) -> Handle {
        self.texture
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Placed tile by id
    pub fn tile(&self, id: usize) -> Option<AtlasTile> {
        self.tiles.get(id).copied()
    }

    /// Tile id by name
    pub fn tile_id(&self, name: &str) -> Option<usize> {
        self.tile_names.get(name).copied()
    }

    /// Normalised UV region of a tile
    pub fn tile_region(&self, id: usize) -> Option<AtlasRegion> {
        let tile = self.tiles.get(id)?;
        let (w, h) = (self.width as f32, self.height as f32);
        Some(AtlasRegion {
            u: tile.x as f32 / w,
            v: tile.y as f32 / h,
            width: tile.width as f32 / w,
            height: tile.height as f32 / h,
        })
    }

    // ===== PACKING =====

    /// Place a `width` x `height` tile and return its id
    pub fn add_tile(&mut self, name: &str, width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource(format!(
                "atlas '{}': tile '{}' cannot be {}x{}",
                self.name, name, width, height
            )));
        }
        if self.tile_names.contains_key(name) {
            return Err(Error::InvalidResource(format!(
                "atlas '{}' already has a tile named '{}'",
                self.name, name
            )));
        }

        let border = self.padding.checked_mul(2);
        let padded = |size: u32| border.and_then(|b| size.checked_add(b));
        let cell = padded(width).zip(padded(height));
        let (x, y) = cell.and_then(|(w, h)| self.place(w, h)).ok_or_else(|| {
            Error::InvalidResource(format!(
                "atlas '{}' has no room for a {}x{} tile",
                self.name, width, height
            ))
        })?;

        let id = self.tiles.len();
        self.tiles.push(AtlasTile {
            x: x + self.padding,
            y: y + self.padding,
            width,
            height,
        });
        self.tile_names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Forget every tile
    pub fn clear(&mut self) {
        self.shelves.clear();
        self.tiles.clear();
        self.tile_names.clear();
    }

    /// Reserve a padded cell, returning its top-left corner
    fn place(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width > self.width {
            return None;
        }

        let atlas_width = self.width;
        if let Some(shelf) = self
            .shelves
            .iter_mut()
            .find(|s| s.height >= height && s.cursor.checked_add(width).is_some_and(|end| end <= atlas_width))
        {
            let x = shelf.cursor;
            shelf.cursor += width;
            return Some((x, shelf.y));
        }

        let y = self.shelves.last().map(|s| s.y + s.height).unwrap_or(0);
        if y.checked_add(height)? > self.height {
            return None;
        }
        self.shelves.push(Shelf { y, height, cursor: width });
        Some((0, y))
    }
}

#[cfg(test)]
#[path = "atlas_tests.rs"]
mod tests;
