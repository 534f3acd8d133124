mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use hubscope::{AnalyticsSnapshot, CategoryCount, PipelineConfig, Session};

use cli::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };
    config
        .normalize
        .excluded_countries
        .extend(cli.exclude_country.iter().cloned());
    if let Some(top) = cli.top {
        config.top_countries = top;
    }

    let mut session = Session::new(config);
    session
        .load_path(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    session.set_criteria(cli.criteria());

    if cli.facets {
        if let Some(ds) = session.dataset() {
            let facets = ds.facets();
            print_list("Countries", &facets.countries);
            print_list("Regions", &facets.regions);
            print_list("Types", &facets.hub_types);
        }
    }

    println!("{}", session.status_line());

    if let Some(snapshot) = session.snapshot() {
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?
            );
        } else {
            print_snapshot(&snapshot);
        }
    }

    if let Some(path) = &cli.export {
        let written = session
            .export_visible(path)
            .with_context(|| format!("exporting to {}", path.display()))?;
        println!("Exported {written} hubs to {}", path.display());
    }

    Ok(())
}

fn print_list(title: &str, values: &[String]) {
    println!("{title} ({}):", values.len());
    for v in values {
        println!("  {v}");
    }
}

fn print_snapshot(snap: &AnalyticsSnapshot) {
    println!("Total:        {}", snap.total);
    println!("Geocoded:     {} ({}%)", snap.geocoded, snap.geocoded_pct);
    println!("With website: {} ({}%)", snap.with_website, snap.with_website_pct);
    println!("With email:   {} ({}%)", snap.with_email, snap.with_email_pct);
    print_table("Top countries", &snap.top_countries);
    print_table("Types", &snap.hub_types);
    print_table("Regions", &snap.regions);
}

fn print_table(title: &str, table: &[CategoryCount]) {
    println!("{title}:");
    let width = table.iter().map(|c| c.label.chars().count()).max().unwrap_or(0);
    for entry in table {
        println!("  {:<width$}  {}", entry.label, entry.count);
    }
}
