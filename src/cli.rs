use std::path::PathBuf;

use clap::Parser;

use hubscope::FilterCriteria;

#[derive(Parser)]
#[command(
    name = "hubscope",
    version,
    about = "Filter and summarize a technology hub dataset",
    long_about = "Load a hub dataset (.csv, .tsv, .json, .parquet), apply filters,\n\
                  print coverage statistics and distributions, and optionally\n\
                  export the filtered subset."
)]
pub struct Cli {
    /// Dataset to load.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// JSON pipeline configuration (exclusions, ranking length, region table).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Drop rows from this country (repeatable, case-insensitive).
    #[arg(long = "exclude-country", value_name = "NAME")]
    pub exclude_country: Vec<String>,

    /// Keep only hubs in this exact country.
    #[arg(long)]
    pub country: Option<String>,

    /// Keep only hubs in this exact region.
    #[arg(long)]
    pub region: Option<String>,

    /// Keep only hubs of this exact type.
    #[arg(long = "type", value_name = "TYPE")]
    pub hub_type: Option<String>,

    /// Case-insensitive search over name, city, country and type.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Number of countries in the ranking.
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Write the filtered hubs to this file (.csv or .tsv).
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Print the analytics snapshot as JSON.
    #[arg(long)]
    pub json: bool,

    /// List the available country, region and type choices.
    #[arg(long)]
    pub facets: bool,
}

impl Cli {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            country: self.country.clone(),
            region: self.region.clone(),
            hub_type: self.hub_type.clone(),
            query: self.query.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_to_criteria() {
        let cli = Cli::parse_from([
            "hubscope",
            "hubs.csv",
            "--type",
            "Incubator",
            "-q",
            "lagos",
            "--exclude-country",
            "France",
            "--exclude-country",
            "Spain",
        ]);
        let criteria = cli.criteria();
        assert_eq!(criteria.hub_type.as_deref(), Some("Incubator"));
        assert_eq!(criteria.query.as_deref(), Some("lagos"));
        assert!(criteria.country.is_none());
        assert_eq!(cli.exclude_country, vec!["France", "Spain"]);
    }
}
