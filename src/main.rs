use anyhow::Result;
use std::env;
use std::path::Path;
use textgrab::{Extractor, OcrConfig, ProgressReporter, SourceDocument};
use tracing::info;

/// Map a file extension to the MIME string an uploader would declare.
fn mime_for_path(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "gif" => Ok("image/gif"),
        "tif" | "tiff" => Ok("image/tiff"),
        "pdf" => Ok("application/pdf"),
        other => Err(anyhow::anyhow!(
            "unrecognized file extension: {:?} (expected jpg, jpeg, png, gif, tif, tiff or pdf)",
            other
        )),
    }
}

fn print_usage() {
    eprintln!("Usage: textgrab [--json] <file>");
    eprintln!();
    eprintln!("Extracts text from an image (via OCR) or a PDF (via its text layer).");
    eprintln!("  --json    print the full extraction result as JSON");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut json_output = false;
    let mut file_argument = None;
    for argument in env::args().skip(1) {
        match argument.as_str() {
            "--json" => json_output = true,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ => file_argument = Some(argument),
        }
    }

    let Some(file_path) = file_argument else {
        print_usage();
        std::process::exit(2);
    };

    let config = OcrConfig::default();
    config.validate()?;

    let path = Path::new(&file_path);
    let mime = mime_for_path(path)?;
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;

    info!(file = %path.display(), mime, size = bytes.len(), "starting extraction");

    let document = SourceDocument::from_upload(bytes, mime)?;
    let extractor = Extractor::new(config);

    let show_progress = !json_output;
    let progress = ProgressReporter::new(move |fraction| {
        if show_progress {
            eprint!("\rProcessing... {}%", (fraction * 100.0).round() as u32);
        }
    });

    let result = extractor.process(&document, &progress).await?;
    if show_progress {
        eprintln!();
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.text);
        eprintln!();
        eprintln!(
            "Confidence: {:.2}%  Type: {}  Characters: {}",
            result.confidence,
            result.media_type,
            result.char_count()
        );
    }

    Ok(())
}
