// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use serde::Deserialize;
use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error as DError;

#[derive(Debug, Clone, DError, PartialEq)]
#[error("Unknown aggregation '{0}', expected one of: first, last, mean")]
pub struct UnknownAggregation(pub String);

/// How duplicated (user, item) observations collapse into a single matrix cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    First,
    Last,
    Mean,
}

impl Default for Aggregation {
    fn default() -> Self {
        Self::Last
    }
}

impl FromStr for Aggregation {
    type Err = UnknownAggregation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "mean" => Ok(Self::Mean),
            other => Err(UnknownAggregation(other.into())),
        }
    }
}

impl Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::First => write!(f, "first"),
            Aggregation::Last => write!(f, "last"),
            Aggregation::Mean => write!(f, "mean"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub items: PathBuf,
    pub ratings: PathBuf,
    pub items_delimiter: char,
    pub ratings_delimiter: char,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            items: "data/movies.csv".into(),
            ratings: "data/ratings.tsv".into(),
            items_delimiter: ',',
            ratings_delimiter: '\t',
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub aggregation: Aggregation,
    pub top_n: usize,

    // Keep the first rows of every stage around so they can be printed
    pub keep_previews: bool,
    pub preview_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aggregation: Aggregation::default(),
            top_n: 5,
            keep_previews: false,
            preview_rows: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub source: SourceConfig,
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            source: SourceConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let parsed: Self = toml::from_str(&contents)?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;

    #[test]
    fn load_example_config() -> Result<(), Error> {
        let expected = Config {
            log_level: "debug".into(),
            source: SourceConfig {
                items: "data/movies.csv".into(),
                ratings: "data/ratings.tsv".into(),
                items_delimiter: ',',
                ratings_delimiter: '\t',
            },
            engine: EngineConfig {
                aggregation: Aggregation::Mean,
                top_n: 10,
                keep_previews: true,
                preview_rows: 3,
            },
        };

        let loaded = Config::load("example.toml")?;
        assert_eq!(expected, loaded);

        Ok(())
    }

    #[test]
    fn empty_config_is_default() -> Result<(), Error> {
        let parsed: Config = toml::from_str("")?;
        assert_eq!(parsed, Config::default());

        let parsed: Config = toml::from_str("[engine]\ntop_n = 3")?;
        assert_eq!(parsed.engine.top_n, 3);
        assert_eq!(parsed.engine.aggregation, Aggregation::Last);
        assert_eq!(parsed.source, SourceConfig::default());

        Ok(())
    }

    #[test]
    fn parse_aggregation() {
        assert_eq!("first".parse(), Ok(Aggregation::First));
        assert_eq!(" Mean ".parse(), Ok(Aggregation::Mean));
        assert_eq!(
            "median".parse::<Aggregation>(),
            Err(UnknownAggregation("median".into()))
        );
    }

    #[test]
    fn reject_unknown_aggregation_in_file() {
        let parsed: Result<Config, _> = toml::from_str("[engine]\naggregation = \"sum\"");
        assert!(parsed.is_err());
    }
}
