// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod models;

use anyhow::Error;
use config::SourceConfig;
use controller::{error::ErrorKind, Controller, RawItem, RawRating};
use models::{items::read_items, ratings::read_ratings};
use std::{
    io::Read,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Memory(Vec<u8>),
}

impl Source {
    fn open(&self, builder: &csv::ReaderBuilder) -> Result<csv::Reader<Box<dyn Read + '_>>, Error> {
        let reader: Box<dyn Read + '_> = match self {
            Source::File(path) => Box::new(std::fs::File::open(path)?),
            Source::Memory(bytes) => Box::new(bytes.as_slice()),
        };

        Ok(builder.from_reader(reader))
    }

    fn describe(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Memory(bytes) => format!("<memory, {} bytes>", bytes.len()),
        }
    }
}

fn delimiter(c: char) -> Result<u8, ErrorKind> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(ErrorKind::InvalidDelimiter(c))
    }
}

/// MovieLens style dataset: a comma separated item file with a header row and
/// a tab separated, headerless rating file.
pub struct MovieLensController {
    items: Source,
    ratings: Source,
    items_delimiter: u8,
    ratings_delimiter: u8,
}

impl MovieLensController {
    pub fn new() -> Result<Self, Error> {
        Self::with_config(&SourceConfig::default())
    }

    pub fn with_config(config: &SourceConfig) -> Result<Self, Error> {
        Ok(Self {
            items: Source::File(config.items.clone()),
            ratings: Source::File(config.ratings.clone()),
            items_delimiter: delimiter(config.items_delimiter)?,
            ratings_delimiter: delimiter(config.ratings_delimiter)?,
        })
    }

    pub fn with_paths(items: impl AsRef<Path>, ratings: impl AsRef<Path>) -> Result<Self, Error> {
        let config = SourceConfig {
            items: items.as_ref().to_path_buf(),
            ratings: ratings.as_ref().to_path_buf(),
            ..Default::default()
        };

        Self::with_config(&config)
    }

    pub fn from_bytes(items: impl Into<Vec<u8>>, ratings: impl Into<Vec<u8>>) -> Self {
        Self {
            items: Source::Memory(items.into()),
            ratings: Source::Memory(ratings.into()),
            items_delimiter: b',',
            ratings_delimiter: b'\t',
        }
    }
}

impl Controller for MovieLensController {
    fn name(&self) -> &str {
        "movie-lens"
    }

    fn items(&self) -> Result<Vec<RawItem>, Error> {
        log::info!("Reading items from {}", self.items.describe());

        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(true)
            .flexible(true)
            .delimiter(self.items_delimiter)
            .quote(b'"')
            .trim(csv::Trim::Headers);

        read_items(self.items.open(&builder)?)
    }

    fn ratings(&self) -> Result<Vec<RawRating>, Error> {
        log::info!("Reading ratings from {}", self.ratings.describe());

        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.ratings_delimiter)
            .trim(csv::Trim::All);

        read_ratings(self.ratings.open(&builder)?)
    }
}
