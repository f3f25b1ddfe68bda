//! Update command - refresh the catalog from configured product pages.

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use ratescan_core::pipeline::{run_product, RunReport};
use ratescan_core::{catalog, ContentFetcher, ProductConfig};

use crate::fetcher::{FileFetcher, HttpFetcher};

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product ids to re-extract (default: every configured product)
    ids: Vec<String>,

    /// Catalog path (overrides the configured path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Read saved pages from this directory instead of the network
    #[arg(long)]
    pages_dir: Option<PathBuf>,
}

pub async fn run(args: UpdateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let products = select_products(&config.products, &args.ids)?;
    if products.is_empty() {
        anyhow::bail!("No products configured. Run 'ratescan config init' to create a config.");
    }

    let pb = ProgressBar::new(products.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Extraction runs per product; the merge below is the single write.
    let now = Utc::now();
    let report = match &args.pages_dir {
        Some(dir) => {
            let fetcher = FileFetcher::new(dir.clone());
            collect_outcomes(&fetcher, &products, now, &pb).await
        }
        None => {
            let fetcher = HttpFetcher::new(&config.fetch)?;
            collect_outcomes(&fetcher, &products, now, &pb).await
        }
    };
    pb.finish_and_clear();

    for (id, record) in &report.updated {
        println!(
            "{} {}: rate {}, term {} months",
            style("✓").green(),
            id,
            record
                .rate
                .map(|r| format!("{r}%"))
                .unwrap_or_else(|| "not found".to_string()),
            record.term_months,
        );
    }
    for (id, failure) in &report.failures {
        println!("{} {}: {}", style("✗").red(), id, failure);
    }

    let catalog_path = args.output.unwrap_or(config.catalog_path);
    let existing = catalog::load(&catalog_path)?;
    let merged = catalog::merge(&existing, report.updated.clone());
    catalog::save(&catalog_path, &merged)?;

    println!();
    println!(
        "{} {} updated, {} failed; catalog written to {}",
        style("ℹ").blue(),
        report.succeeded(),
        report.failed(),
        catalog_path.display(),
    );

    Ok(())
}

async fn collect_outcomes<F: ContentFetcher>(
    fetcher: &F,
    products: &[ProductConfig],
    now: chrono::DateTime<Utc>,
    pb: &ProgressBar,
) -> RunReport {
    let mut report = RunReport::default();

    for product in products {
        pb.set_message(product.id.clone());
        let outcome = run_product(fetcher, product, now).await;
        if let Err(failure) = &outcome {
            debug!(product = %product.id, %failure, "product skipped");
        }
        report.record(&product.id, outcome);
        pb.inc(1);
    }

    report
}

/// Keep every configured product, or the requested subset. Unknown ids are
/// an error rather than a silent no-op.
fn select_products(
    configured: &[ProductConfig],
    ids: &[String],
) -> anyhow::Result<Vec<ProductConfig>> {
    if ids.is_empty() {
        return Ok(configured.to_vec());
    }

    let mut selected = Vec::with_capacity(ids.len());
    for id in ids {
        match configured.iter().find(|p| &p.id == id) {
            Some(product) => selected.push(product.clone()),
            None => anyhow::bail!("Unknown product id: {id}"),
        }
    }
    Ok(selected)
}
