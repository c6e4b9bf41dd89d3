//! Settings for the demo binary, read from an optional `sigill.toml`
//! in the working directory with `SIGILL_*` environment overrides.
//! The library itself takes no configuration.

use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "https://api.census.gov/data/2023/acs/acs5/subject/variables?get=NAME,S2802_C03_022E&for=county:*&in=state:44";
const DEFAULT_HEADER: [&str; 4] = ["NAME", "S2802_C03_022E", "state", "county"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Where the tabular dataset is fetched from.
    pub endpoint: String,
    /// The header row the dataset must lead with.
    pub expected_header: Vec<String>,
}

impl Settings {
    pub fn load() -> crate::error::Result<Settings> {
        let header: Vec<String> = DEFAULT_HEADER.iter().map(|s| s.to_string()).collect();
        let settings = Config::builder()
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("expected_header", header)?
            .add_source(File::with_name("sigill").required(false))
            .add_source(Environment::with_prefix("SIGILL"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
