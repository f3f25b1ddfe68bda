//! Show command - print the current catalog.

use std::path::PathBuf;

use clap::Args;
use console::style;

use ratescan_core::catalog;

use super::extract::OutputFormat;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Catalog path (overrides the configured path)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ShowArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let catalog_path = args.catalog.unwrap_or(config.catalog_path);

    let catalog = catalog::load(&catalog_path)?;
    if catalog.is_empty() {
        println!(
            "{} Catalog at {} is empty. Run 'ratescan update' first.",
            style("ℹ").blue(),
            catalog_path.display()
        );
        return Ok(());
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["id", "rate", "term_months", "updated_at"])?;
            for (id, record) in &catalog {
                wtr.write_record([
                    id.clone(),
                    record.rate.map(|r| r.to_string()).unwrap_or_default(),
                    record.term_months.to_string(),
                    record.updated_at.to_rfc3339(),
                ])?;
            }
            print!("{}", String::from_utf8(wtr.into_inner()?)?);
        }
        OutputFormat::Text => {
            for (id, record) in &catalog {
                print!("{}", super::extract::format_record(id, record, OutputFormat::Text)?);
            }
        }
    }

    Ok(())
}
