//! Flattening a fetched symbol onto a padded background.

use crate::options::HexColor;
use crate::source::ReadyImage;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

/// Draws `source` scaled to `size`x`size` at `(margin, margin)` on a background-filled
/// surface of `size + 2 * margin` pixels per side.
pub fn compose(source: &DynamicImage, size: u32, margin: u32, background: HexColor) -> RgbaImage {
    let edge = size + 2 * margin;
    let mut surface = RgbaImage::from_pixel(edge, edge, background.to_rgba());

    let symbol = source.to_rgba8();
    let symbol = if symbol.dimensions() == (size, size) {
        symbol
    } else {
        imageops::resize(&symbol, size, size, FilterType::Nearest)
    };
    imageops::overlay(&mut surface, &symbol, margin as i64, margin as i64);

    surface
}

/// How a fetched symbol is placed on the displayed surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Scaled to `size`x`size` with `margin` pixels of background around it.
    Padded { size: u32, margin: u32 },
    /// Shown exactly as fetched, whatever its dimensions.
    AsFetched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Key {
    image_id: u64,
    layout: Layout,
    background: HexColor,
}

/// The last composite together with the inputs it was built from.
///
/// A lookup with any differing input rebuilds the surface instead of reusing it.
#[derive(Debug, Default)]
pub struct CompositeCache {
    entry: Option<(Key, RgbaImage)>,
}

impl CompositeCache {
    pub fn get_or_compose(
        &mut self,
        source: &ReadyImage,
        layout: Layout,
        background: HexColor,
    ) -> &RgbaImage {
        let key = Key {
            image_id: source.id(),
            layout,
            background,
        };

        if !matches!(&self.entry, Some((cached, _)) if *cached == key) {
            self.entry = None;
        }

        let (_, surface) = self.entry.get_or_insert_with(|| {
            tracing::debug!(?layout, %background, image_id = key.image_id, "recompositing");
            let surface = match layout {
                Layout::Padded { size, margin } => {
                    compose(source.image(), size, margin, background)
                }
                Layout::AsFetched => source.image().to_rgba8(),
            };
            (key, surface)
        });
        surface
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
