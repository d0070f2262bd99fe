//! Colour-coded entity picking
//!
//! Each pickable entity is drawn in a flat colour that encodes its id in the
//! 24 RGB bits. Reading the pixel under the cursor back from the pick target
//! and decoding it yields the entity, or nothing for the black background.

use pitlane_core::EntityId;

/// Largest id that fits in 24 bits of colour
pub const MAX_PICK_ID: u32 = 0x00FF_FFFF;

/// RGBA8 colour of one pick-target pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PickColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Clear colour of the pick target; never produced by `encode_id`
pub const BACKGROUND: PickColor = PickColor {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};

impl PickColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

/// Encode an id as an opaque colour. Returns `None` for 0 and ids above 24 bits.
pub fn encode_id(id: u32) -> Option<PickColor> {
    if id == 0 || id > MAX_PICK_ID {
        return None;
    }
    Some(PickColor::new(
        (id >> 16) as u8,
        (id >> 8) as u8,
        id as u8,
        255,
    ))
}

/// Inverse of [`encode_id`]. Alpha is ignored; black means no entity.
pub fn decode_color(color: PickColor) -> Option<u32> {
    let id = (color.r as u32) << 16 | (color.g as u32) << 8 | color.b as u32;
    (id != 0).then_some(id)
}

/// A read-back pick image, tightly packed RGBA8, row 0 at the top
#[derive(Clone, Debug)]
pub struct PickBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PickBuffer {
    /// Wrap read-back pixels. Returns `None` if the byte count does not match the size.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            log::warn!(
                "Pick buffer of {} bytes does not match {}x{}",
                pixels.len(),
                width,
                height
            );
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<PickColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[offset..offset + 4];
        Some(PickColor::new(px[0], px[1], px[2], px[3]))
    }

    /// Entity under pixel (x, y), or `None` for background and out-of-bounds
    pub fn entity_at(&self, x: u32, y: u32) -> Option<EntityId> {
        self.color_at(x, y)
            .and_then(decode_color)
            .map(EntityId::from_raw)
    }
}
