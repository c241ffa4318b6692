use crate::error::{QrError, Result};
use image::Rgba;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Bounds the generator accepts for the symbol edge, in pixels.
pub const SIZE_RANGE: RangeInclusive<u32> = 100..=1024;
/// Bounds the generator accepts for the padding around the symbol, in pixels.
pub const MARGIN_RANGE: RangeInclusive<u32> = 0..=100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl EcLevel {
    pub fn code(self) -> char {
        match self {
            EcLevel::L => 'L',
            EcLevel::M => 'M',
            EcLevel::Q => 'Q',
            EcLevel::H => 'H',
        }
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(v: EcLevel) -> Self {
        match v {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// An opaque RGB color written as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const BLACK: HexColor = HexColor([0, 0, 0]);
    pub const WHITE: HexColor = HexColor([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Hex digits without the leading `#`, as the remote service expects them.
    pub fn query_value(&self) -> String {
        let [r, g, b] = self.0;
        format!("{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }
}

impl FromStr for HexColor {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(QrError::Color(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| QrError::Color(s.to_string()))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.query_value())
    }
}

/// How a generated symbol reaches the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// The remote service renders size, margin and colors; the image is shown as fetched.
    Remote,
    /// The remote service renders a marginless symbol; padding and background are drawn locally.
    #[default]
    Composite,
}

impl Strategy {
    /// Margin forwarded to the remote service for `request`.
    pub fn remote_margin(self, request: &GenerationRequest) -> u32 {
        match self {
            Strategy::Remote => request.options.margin,
            Strategy::Composite => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub ec_level: EcLevel,
    pub foreground: HexColor,
    pub background: HexColor,
    pub size: u32,
    pub margin: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::M,
            foreground: HexColor::BLACK,
            background: HexColor::WHITE,
            size: 300,
            margin: 10,
        }
    }
}

impl GeneratorOptions {
    /// Returns a copy with size and margin pulled into their accepted ranges.
    pub fn clamped(self) -> Self {
        Self {
            size: self.size.clamp(*SIZE_RANGE.start(), *SIZE_RANGE.end()),
            margin: self.margin.clamp(*MARGIN_RANGE.start(), *MARGIN_RANGE.end()),
            ..self
        }
    }
}

/// Everything needed to produce one symbol. Built fresh for every generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    text: String,
    options: GeneratorOptions,
}

impl GenerationRequest {
    /// Returns `None` when `text` is empty or whitespace only.
    pub fn new(text: &str, options: GeneratorOptions) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            options: options.clamped(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }
}
