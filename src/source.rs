use crate::encoder::request_url;
use crate::error::{QrError, Result};
use crate::options::{GenerationRequest, HexColor, Strategy};
use crate::platform::Platform;
use image::{DynamicImage, ImageBuffer, Rgba};
use qrcode::QrCode;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    Remote(String),
    Local,
}

/// A generated symbol whose pixels are fully decoded.
///
/// Sources hand one of these out only after decoding succeeded, so holders never
/// observe a half-loaded image.
#[derive(Clone, Debug)]
pub struct ReadyImage {
    id: u64,
    origin: Origin,
    image: DynamicImage,
}

impl ReadyImage {
    pub fn new(origin: Origin, image: DynamicImage) -> Self {
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            origin,
            image,
        }
    }

    /// Identity of this image; two loads of the same URL get different ids.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Something that turns a request into a rendered symbol.
pub trait QrImageSource {
    fn load(&self, request: &GenerationRequest, strategy: Strategy) -> Result<ReadyImage>;
}

/// Delegates rendering to an HTTP endpoint speaking the qrserver query format.
pub struct RemoteService<'a, P: Platform + ?Sized> {
    platform: &'a P,
    endpoint: String,
}

impl<'a, P: Platform + ?Sized> RemoteService<'a, P> {
    pub fn new(platform: &'a P, endpoint: impl Into<String>) -> Self {
        Self {
            platform,
            endpoint: endpoint.into(),
        }
    }
}

impl<P: Platform + ?Sized> QrImageSource for RemoteService<'_, P> {
    fn load(&self, request: &GenerationRequest, strategy: Strategy) -> Result<ReadyImage> {
        let url = request_url(&self.endpoint, request, strategy);
        let body = self.platform.fetch(&url)?;
        if body.is_empty() {
            return Err(QrError::EmptyBody(url));
        }

        let image = image::load_from_memory(&body)?;
        debug!(
            url = %url,
            width = image.width(),
            height = image.height(),
            "remote image ready"
        );
        Ok(ReadyImage::new(Origin::Remote(url), image))
    }
}

/// Renders symbols in-process with the `qrcode` crate, mimicking the remote service's output.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalRenderer;

impl QrImageSource for LocalRenderer {
    fn load(&self, request: &GenerationRequest, strategy: Strategy) -> Result<ReadyImage> {
        let options = request.options();
        let modules = symbol_modules(request.text(), options.ec_level.into())?;
        let image = rasterize(
            &modules,
            options.size,
            strategy.remote_margin(request),
            options.foreground,
            options.background,
        )?;
        debug!(modules = modules.len(), size = options.size, "local image ready");
        Ok(ReadyImage::new(Origin::Local, DynamicImage::ImageRgba8(image)))
    }
}

pub fn symbol_modules(text: &str, ec_level: qrcode::EcLevel) -> Result<Vec<Vec<bool>>> {
    let code = QrCode::with_error_correction_level(text, ec_level)?;

    let colors = code.to_colors();
    let width = code.width();

    let mut modules = vec![vec![false; width]; width];
    for y in 0..width {
        for x in 0..width {
            modules[y][x] = matches!(colors[y * width + x], qrcode::Color::Dark);
        }
    }

    Ok(modules)
}

/// Draws `modules` into a `size`x`size` square with `margin` pixels of background on each side.
///
/// Fails when fewer than one pixel per module is left inside the margin.
fn rasterize(
    modules: &[Vec<bool>],
    size: u32,
    margin: u32,
    foreground: HexColor,
    background: HexColor,
) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>> {
    let count = modules.len() as u32;
    let inner = size.saturating_sub(2 * margin);
    if inner < count {
        return Err(QrError::SymbolTooLarge {
            modules: count,
            room: inner,
        });
    }
    let (dark, light) = (foreground.to_rgba(), background.to_rgba());

    Ok(ImageBuffer::from_fn(size, size, |x, y| {
        if x < margin || y < margin || x >= margin + inner || y >= margin + inner {
            return light;
        }
        let mx = ((x - margin) * count / inner) as usize;
        let my = ((y - margin) * count / inner) as usize;
        match modules.get(my).and_then(|row| row.get(mx)) {
            Some(true) => dark,
            _ => light,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{QrDecoder, RqrrDecoder};
    use crate::options::GeneratorOptions;

    #[test]
    fn local_renderer_honours_size_and_colors() {
        let options = GeneratorOptions {
            foreground: HexColor::new(200, 0, 0),
            background: HexColor::new(0, 0, 200),
            size: 200,
            margin: 20,
            ..Default::default()
        };
        let request = GenerationRequest::new("hello", options).unwrap();

        let ready = LocalRenderer.load(&request, Strategy::Remote).unwrap();
        let rgba = ready.image().to_rgba8();

        assert_eq!(ready.origin(), &Origin::Local);
        assert_eq!(rgba.dimensions(), (200, 200));
        assert_eq!(*rgba.get_pixel(5, 5), Rgba([0, 0, 200, 255]));
        // Top-left finder pattern starts dark right inside the margin.
        assert_eq!(*rgba.get_pixel(21, 21), Rgba([200, 0, 0, 255]));
    }

    #[test]
    fn composite_strategy_renders_edge_to_edge() {
        let request = GenerationRequest::new("hello", GeneratorOptions::default()).unwrap();
        let rgba = LocalRenderer
            .load(&request, Strategy::Composite)
            .unwrap()
            .image()
            .to_rgba8();
        assert_eq!(*rgba.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn each_load_gets_a_fresh_id() {
        let request = GenerationRequest::new("hello", GeneratorOptions::default()).unwrap();
        let a = LocalRenderer.load(&request, Strategy::Composite).unwrap();
        let b = LocalRenderer.load(&request, Strategy::Composite).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn tightest_fit_keeps_every_finder() {
        let options = GeneratorOptions {
            size: 100,
            margin: 39,
            ..Default::default()
        };
        let request = GenerationRequest::new("hello", options).unwrap();
        let rgba = LocalRenderer
            .load(&request, Strategy::Remote)
            .unwrap()
            .image()
            .to_rgba8();

        let dark = Rgba([0, 0, 0, 255]);
        // Corners of the 21-module symbol squeezed into 22 pixels.
        assert_eq!(*rgba.get_pixel(39, 39), dark);
        assert_eq!(*rgba.get_pixel(60, 39), dark);
        assert_eq!(*rgba.get_pixel(39, 60), dark);
    }

    #[test]
    fn margin_eating_the_symbol_is_an_error() {
        for margin in [90, 100] {
            let options = GeneratorOptions {
                size: 100,
                margin,
                ..Default::default()
            };
            let request = GenerationRequest::new("hello", options).unwrap();
            assert!(matches!(
                LocalRenderer.load(&request, Strategy::Remote),
                Err(QrError::SymbolTooLarge { modules: 21, room: 0 })
            ));
        }
    }

    #[test]
    fn long_text_in_small_size_is_an_error() {
        let options = GeneratorOptions {
            size: 100,
            ..Default::default()
        };
        let request = GenerationRequest::new(&"a".repeat(1200), options).unwrap();
        assert!(matches!(
            LocalRenderer.load(&request, Strategy::Composite),
            Err(QrError::SymbolTooLarge { room: 100, .. })
        ));
    }

    #[test]
    fn largest_options_still_decode() {
        let options = GeneratorOptions {
            size: 1024,
            margin: 100,
            ..Default::default()
        };
        let request = GenerationRequest::new("https://example.com", options).unwrap();
        let rgba = LocalRenderer
            .load(&request, Strategy::Remote)
            .unwrap()
            .image()
            .to_rgba8();

        assert_eq!(
            RqrrDecoder.decode(rgba.as_raw(), rgba.width(), rgba.height()),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn symbol_is_square() {
        let modules = symbol_modules("https://example.com", qrcode::EcLevel::M).unwrap();
        assert!(modules.len() >= 21);
        assert!(modules.iter().all(|row| row.len() == modules.len()));
    }
}
