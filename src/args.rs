use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use qr_editor::encoder::DEFAULT_ENDPOINT;
use qr_editor::messages::Locale;
use qr_editor::options::{EcLevel, GeneratorOptions, HexColor, Strategy};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug)]
#[clap(rename_all = "UPPER")]
pub enum EcArg {
    L,
    M,
    Q,
    H,
}

impl From<EcArg> for EcLevel {
    fn from(v: EcArg) -> Self {
        match v {
            EcArg::L => EcLevel::L,
            EcArg::M => EcLevel::M,
            EcArg::Q => EcLevel::Q,
            EcArg::H => EcLevel::H,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StrategyArg {
    /// Fetch a marginless symbol and pad it locally
    Composite,
    /// Let the remote service render margin and background
    Remote,
}

impl From<StrategyArg> for Strategy {
    fn from(v: StrategyArg) -> Self {
        match v {
            StrategyArg::Composite => Strategy::Composite,
            StrategyArg::Remote => Strategy::Remote,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LangArg {
    En,
    Ko,
}

impl From<LangArg> for Locale {
    fn from(v: LangArg) -> Self {
        match v {
            LangArg::En => Locale::En,
            LangArg::Ko => Locale::Ko,
        }
    }
}

#[derive(Parser)]
#[command(name = "qr-editor")]
#[command(about = "Generate QR codes through a remote renderer and read QR codes from images")]
pub struct Args {
    /// Language of status messages
    #[arg(short, long, global = true, default_value = "en")]
    pub lang: LangArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a QR code and save it as qrcode-<timestamp>.png
    Generate(GenerateArgs),
    /// Read the text embedded in QR code images
    Decode(DecodeArgs),
}

#[derive(ClapArgs)]
pub struct GenerateArgs {
    /// Text to encode in the QR code
    #[arg(short, long)]
    pub text: String,

    /// QR code error correction level (L, M, Q, H)
    #[arg(short = 'e', long, default_value = "M")]
    pub error_correction: EcArg,

    /// Foreground color as #rrggbb
    #[arg(long, default_value = "#000000")]
    pub fg: HexColor,

    /// Background color as #rrggbb
    #[arg(long, default_value = "#ffffff")]
    pub bg: HexColor,

    /// Edge of the symbol in pixels (clamped to 100..=1024)
    #[arg(short, long, default_value = "300")]
    pub size: u32,

    /// Padding around the symbol in pixels (clamped to 0..=100)
    #[arg(short, long, default_value = "10")]
    pub margin: u32,

    /// Where margin and background are drawn
    #[arg(long, default_value = "composite")]
    pub strategy: StrategyArg,

    /// Render the symbol in-process instead of calling the remote service
    #[arg(long)]
    pub offline: bool,

    /// Remote QR generation endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Directory the PNG is saved into
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,
}

impl GenerateArgs {
    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            ec_level: self.error_correction.into(),
            foreground: self.fg,
            background: self.bg,
            size: self.size,
            margin: self.margin,
        }
    }
}

#[derive(ClapArgs)]
pub struct DecodeArgs {
    /// Image files to read
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat the files as one drop: only the first is used, and only if it is an image
    #[arg(long)]
    pub dropped: bool,

    /// Also print each image as a data URL
    #[arg(long)]
    pub preview: bool,
}
