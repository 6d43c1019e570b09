//! Print the listings statement for a filter set
//!
//! Useful for checking which predicates a request will produce without a
//! database at hand.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use listings_server::{FilterSet, FilterValue, JsonFileSource, PropertyQuery};

/// Arguments for the sql command
#[derive(Parser, Debug)]
pub struct SqlArgs {
    /// Year filter
    #[arg(long)]
    pub year: Option<String>,

    /// City filter
    #[arg(long)]
    pub city: Option<String>,

    /// Status filter (pre_venta, en_venta, vendido)
    #[arg(long)]
    pub state: Option<String>,

    /// Read filters from a JSON document instead of flags
    #[arg(long, conflicts_with_all = ["year", "city", "state"])]
    pub from_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SqlArgs {
    fn flag_filters(&self) -> FilterSet {
        FilterSet {
            year: self.year.as_deref().map(FilterValue::from_text),
            city: self.city.clone().map(FilterValue::Text),
            state: self.state.clone().map(FilterValue::Text),
        }
    }
}

/// Print the statement built from flags or a filter document
pub async fn run_sql(args: SqlArgs) -> Result<()> {
    let filters = match &args.from_file {
        Some(path) => JsonFileSource::new(path)
            .read()
            .await
            .with_context(|| format!("failed to load filters from {}", path.display()))?,
        None => args.flag_filters(),
    };

    let query = PropertyQuery::build(&filters);

    if args.json {
        let out = serde_json::json!({
            "sql": query.sql.trim(),
            "params": query.params,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", query);
    }
    Ok(())
}
