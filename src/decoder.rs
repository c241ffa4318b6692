use tracing::debug;

/// Finds a QR symbol in a raw RGBA pixel buffer.
pub trait QrDecoder {
    /// `pixels` holds `width * height` RGBA quadruplets in row-major order.
    /// Returns the embedded text, or `None` when no readable symbol is present.
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String>;
}

/// [`QrDecoder`] backed by `rqrr`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String> {
        let (w, h) = (width as usize, height as usize);
        if w == 0 || h == 0 || pixels.len() < w * h * 4 {
            return None;
        }

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| {
            let i = (y * w + x) * 4;
            luma(pixels[i], pixels[i + 1], pixels[i + 2])
        });
        let grids = prepared.detect_grids();
        debug!(grids = grids.len(), width, height, "scanned for QR grids");

        grids
            .iter()
            .filter_map(|grid| grid.decode().ok())
            .map(|(_meta, content)| content)
            .find(|content| !content.is_empty())
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}
