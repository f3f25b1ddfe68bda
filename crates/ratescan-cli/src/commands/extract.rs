//! Extract command - run the cascade on a single saved page, without
//! touching the catalog.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use console::style;
use tracing::info;

use ratescan_core::{extract_product, ProductConfig, ProductRecord, RawContent, SourceKind};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (saved HTML, JSON payload, or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Source kind (default: inferred from the file extension)
    #[arg(short, long, value_enum)]
    kind: Option<KindArg>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Product heading for the PDF section locator
    #[arg(long)]
    section: Option<String>,

    /// Check the record against its invariants
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum KindArg {
    StructuredJson,
    TableHtml,
    FreeText,
    PdfText,
}

impl From<KindArg> for SourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::StructuredJson => SourceKind::StructuredJson,
            KindArg::TableHtml => SourceKind::TableHtml,
            KindArg::FreeText => SourceKind::FreeText,
            KindArg::PdfText => SourceKind::PdfText,
        }
    }
}

pub async fn run(args: ExtractArgs, _config_path: Option<&str>) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let kind = match args.kind {
        Some(kind) => kind.into(),
        None => SourceKind::from_extension(extension).ok_or_else(|| {
            anyhow::anyhow!("Cannot infer source kind from '.{extension}'; pass --kind")
        })?,
    };

    let id = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("product")
        .to_string();

    info!(input = %args.input.display(), ?kind, "extracting");

    let content = if extension.eq_ignore_ascii_case("pdf") {
        pdf_extract::extract_text_from_mem(&fs::read(&args.input)?)
            .map_err(|e| anyhow::anyhow!("failed to extract PDF text: {e}"))?
    } else {
        fs::read_to_string(&args.input)?
    };
    let raw = RawContent::new(kind, content);

    let mut product =
        ProductConfig::new(id.as_str(), format!("file://{}", args.input.display()), kind);
    product.section_hint = args.section;

    let record = extract_product(&product, &raw, Utc::now())?;

    if args.validate {
        let issues = record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_record(&id, &record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

pub fn format_record(
    id: &str,
    record: &ProductRecord,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(id, record),
        OutputFormat::Text => Ok(format_text(id, record)),
    }
}

fn format_csv(id: &str, record: &ProductRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["id", "rate", "term_months", "updated_at"])?;
    wtr.write_record([
        id.to_string(),
        record.rate.map(|r| r.to_string()).unwrap_or_default(),
        record.term_months.to_string(),
        record.updated_at.to_rfc3339(),
    ])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(id: &str, record: &ProductRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Product: {}\n", id));
    if let Some(description) = &record.description {
        output.push_str(&format!("  {}\n", description));
    }
    match record.rate {
        Some(rate) => output.push_str(&format!("  Rate:  from {rate}%\n")),
        None => output.push_str("  Rate:  not found\n"),
    }
    match record.term_months {
        0 => output.push_str("  Term:  not found\n"),
        months => output.push_str(&format!("  Term:  up to {months} months\n")),
    }
    output.push_str(&format!("  As of: {}\n", record.updated_at.to_rfc3339()));

    output
}
