//! Model data block
//!
//! Palette, texture and model overrides applied on top of an object's
//! setup. Serialized as a self-describing block: counts first, then the
//! entries, then alignment.

use serde::{Deserialize, Serialize};

use crate::net::buffer::PacketBuffer;

/// Marker byte that opens every model data block
pub const MODEL_DATA_MARKER: u8 = 0x11;

/// Resource prefix of palette ids
pub const PALETTE_TYPE: u32 = 0x0400_0000;

/// Resource prefix of texture ids
pub const TEXTURE_TYPE: u32 = 0x0500_0000;

/// Resource prefix of model (gfx object) ids
pub const MODEL_TYPE: u32 = 0x0100_0000;

/// A palette swap over a range of the base palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPalette {
    pub palette_id: u32,
    pub offset: u8,
    pub length: u8,
}

/// A texture replacement on one model part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTexture {
    pub part_index: u8,
    pub old_texture: u32,
    pub new_texture: u32,
}

/// A model replacement on one part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub part_index: u8,
    pub model_id: u32,
}

/// Visual overrides for an object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelData {
    /// Base palette, written only when there are palette swaps
    pub palette_guid: u32,
    pub palettes: Vec<ModelPalette>,
    pub textures: Vec<ModelTexture>,
    pub models: Vec<Model>,
}

impl ModelData {
    /// Create an empty model data block
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a palette swap
    pub fn add_palette(&mut self, palette_id: u32, offset: u8, length: u8) {
        self.palettes.push(ModelPalette {
            palette_id,
            offset,
            length,
        });
    }

    /// Add a texture replacement
    pub fn add_texture(&mut self, part_index: u8, old_texture: u32, new_texture: u32) {
        self.textures.push(ModelTexture {
            part_index,
            old_texture,
            new_texture,
        });
    }

    /// Add a model replacement
    pub fn add_model(&mut self, part_index: u8, model_id: u32) {
        self.models.push(Model {
            part_index,
            model_id,
        });
    }

    /// Write the block
    ///
    /// Counts are single bytes on the wire; lists longer than 255 entries are
    /// cut to fit.
    pub fn serialize(&self, buf: &mut PacketBuffer) {
        let palettes = &self.palettes[..self.palettes.len().min(u8::MAX as usize)];
        let textures = &self.textures[..self.textures.len().min(u8::MAX as usize)];
        let models = &self.models[..self.models.len().min(u8::MAX as usize)];

        buf.write_u8(MODEL_DATA_MARKER);
        buf.write_u8(palettes.len() as u8);
        buf.write_u8(textures.len() as u8);
        buf.write_u8(models.len() as u8);

        if !palettes.is_empty() {
            buf.write_packed_dword_of_known_type(self.palette_guid, PALETTE_TYPE);
        }

        for palette in palettes {
            buf.write_packed_dword_of_known_type(palette.palette_id, PALETTE_TYPE);
            buf.write_u8(palette.offset);
            buf.write_u8(palette.length);
        }

        for texture in textures {
            buf.write_u8(texture.part_index);
            buf.write_packed_dword_of_known_type(texture.old_texture, TEXTURE_TYPE);
            buf.write_packed_dword_of_known_type(texture.new_texture, TEXTURE_TYPE);
        }

        for model in models {
            buf.write_u8(model.part_index);
            buf.write_packed_dword_of_known_type(model.model_id, MODEL_TYPE);
        }

        buf.align();
    }
}
