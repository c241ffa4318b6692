mod args;

use anyhow::{bail, Context, Result};
use args::{Args, Command, DecodeArgs, GenerateArgs};
use chrono::Utc;
use clap::Parser;
use qr_editor::decoder::RqrrDecoder;
use qr_editor::editor::{Editor, Tab};
use qr_editor::intake;
use qr_editor::messages::Locale;
use qr_editor::platform::NativePlatform;
use qr_editor::source::{LocalRenderer, RemoteService};
use qr_editor::viewer::{DecodeState, Viewer};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let locale: Locale = args.lang.into();
    let platform = NativePlatform::new().context("Failed to set up the HTTP client")?;

    match args.command {
        Command::Generate(generate_args) => generate(&platform, &generate_args, locale),
        Command::Decode(decode_args) => decode(&platform, &decode_args, locale),
    }
}

fn generate(platform: &NativePlatform, args: &GenerateArgs, locale: Locale) -> Result<()> {
    let mut editor = Editor::new(args.options(), args.strategy.into(), locale);
    editor.select(Tab::Create);
    let generator = &mut editor.generator;

    let resolution = if args.offline {
        generator.generate(&args.text, &LocalRenderer)
    } else {
        println!("Requesting QR code from: {}", args.endpoint);
        generator.generate(&args.text, &RemoteService::new(platform, args.endpoint.as_str()))
    };
    if resolution.is_none() {
        println!("Nothing to encode: the text is blank.");
        return Ok(());
    }
    if let Some(notice) = generator.notice() {
        bail!("{notice}");
    }

    let path = generator
        .download(platform, &args.out_dir, Utc::now())
        .with_context(|| locale.download_failed())?;

    println!("Saved to: {}", path.display());
    Ok(())
}

fn decode(platform: &NativePlatform, args: &DecodeArgs, locale: Locale) -> Result<()> {
    let mut editor = Editor::new(Default::default(), Default::default(), locale);
    editor.select(Tab::Check);

    if args.dropped {
        let Some(upload) = intake::from_drop(platform, &args.files)? else {
            return Ok(());
        };
        editor.viewer.process(&upload, &RqrrDecoder);
        return report(&[(upload.path.as_path(), &editor.viewer)], args.preview);
    }

    let viewers = args
        .files
        .par_iter()
        .map(|path| -> Result<Viewer> {
            let upload = intake::from_picker(platform, path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let mut viewer = Viewer::new(locale);
            viewer.process(&upload, &RqrrDecoder);
            Ok(viewer)
        })
        .collect::<Result<Vec<_>>>()?;

    let rows: Vec<(&Path, &Viewer)> = args
        .files
        .iter()
        .map(PathBuf::as_path)
        .zip(&viewers)
        .collect();
    report(&rows, args.preview)
}

fn report(results: &[(&Path, &Viewer)], preview: bool) -> Result<()> {
    let mut failed = 0;
    for (path, viewer) in results {
        match viewer.state() {
            DecodeState::Decoded(text) => println!("{}: {}", path.display(), text),
            DecodeState::NotFound(message) | DecodeState::Unreadable(message) => {
                failed += 1;
                println!("{}: {}", path.display(), message);
            }
            DecodeState::Idle => {}
        }
        if preview {
            if let Some(p) = viewer.preview() {
                println!("{}", p.data_url());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} images had no readable QR code", results.len());
    }
    Ok(())
}
