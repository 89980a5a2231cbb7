use crate::cli::GenerateArgs;
use crate::error::Result;

#[cfg(feature = "pdf")]
use std::path::{Path, PathBuf};

#[cfg(feature = "pdf")]
use tracing::{info, warn};

#[cfg(feature = "pdf")]
use crate::builder::{report_file_name, ReportBuilder};
#[cfg(feature = "pdf")]
use crate::decode::decode_file;
#[cfg(feature = "pdf")]
use crate::error::ReportError;
#[cfg(feature = "pdf")]
use crate::pdf::{render, PdfMeasure};
#[cfg(feature = "pdf")]
use crate::settings::{load_settings, shellexpand_path};

pub fn run(args: GenerateArgs) -> Result<()> {
    #[cfg(not(feature = "pdf"))]
    {
        let _ = args;
        return Err(crate::error::ReportError::Other(
            "PDF export requires the 'pdf' feature: build with `cargo build --features pdf`".into(),
        ));
    }

    #[cfg(feature = "pdf")]
    {
        export(args).map(|_| ())
    }
}

#[cfg(feature = "pdf")]
fn write_pdf(bytes: &[u8], path: &Path) -> Result<String> {
    if path.is_dir() {
        return Err(ReportError::Other(format!(
            "{} is a directory; pass a file name to --output",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    let display = format!("{}", path.display());
    println!("Wrote {display}");
    Ok(display)
}

/// Decode, build, render and write. Returns the written path, or `None` when
/// the export held nothing to report.
#[cfg(feature = "pdf")]
pub fn export(args: GenerateArgs) -> Result<Option<String>> {
    let settings = load_settings();
    let input = PathBuf::from(shellexpand_path(&args.file));
    let rows = decode_file(&input)?;
    info!(file = %input.display(), rows = rows.len(), "decoded export");

    let mut title = settings.title();
    if let Some(t) = args.title {
        title.title = t;
    }
    if let Some(s) = args.subtitle {
        title.subtitle = s;
    }

    let geometry = settings.layout;
    let builder = ReportBuilder::new(Box::new(PdfMeasure))
        .with_geometry(geometry)
        .with_title(title.clone());
    let built = builder.build(&rows);

    if built.report.is_empty() {
        warn!(file = %input.display(), "no reportable rows");
        println!("No transactions found in {}; nothing to export.", input.display());
        return Ok(None);
    }

    let bytes = render(&built.instructions, builder.geometry(), &title.subtitle)?;
    let path = match args.output {
        Some(out) => PathBuf::from(shellexpand_path(&out)),
        None => PathBuf::from(shellexpand_path(&settings.output_dir)).join(report_file_name(
            &built.report.date_range,
            &settings.filename_prefix,
        )),
    };
    write_pdf(&bytes, &path).map(Some)
}
