// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod error;
pub mod join;
pub mod maped_distance;
pub mod matrix;
pub mod normalize;
pub mod recommend;
pub mod similarity_matrix;

pub use config::{Aggregation, EngineConfig};
pub use error::ErrorKind;
pub use maped_distance::MapedDistance;

use anyhow::Error;
use controller::{Controller, RawItem, RawRating};
use join::{merge, JoinedRecord};
use matrix::pivot;
use normalize::{normalize, DropReport, ItemRecord, RatingRecord};
use similarity_matrix::SimilarityMatrix;
use std::fmt::{self, Display};

/// Pipeline stages, each one only reachable from the previous one.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Start,
    Normalized,
    Joined,
    Pivoted,
    SimilarityReady,
    Querying,
    End,
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Normalized => "normalize",
            Stage::Joined => "merge",
            Stage::Pivoted => "pivot",
            Stage::SimilarityReady => "similarity",
            Stage::Querying => "query",
            Stage::End => "end",
        };

        write!(f, "{}", name)
    }
}

fn advance(from: Stage, to: Stage, produced: usize) -> Result<Stage, ErrorKind> {
    if produced == 0 {
        log::warn!("{} stage produced nothing, stopping", to);
        return Err(ErrorKind::EmptyResult(to));
    }

    log::info!("{} -> {} ({} entries)", from, to, produced);
    Ok(to)
}

/// What every stage kept and dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub drops: DropReport,
    pub items: usize,
    pub ratings: usize,
    pub joined: usize,
    pub users: usize,
    pub titles: usize,
}

/// First rows of the intermediate stages, only kept on demand.
#[derive(Debug, Clone, Default)]
pub struct Previews {
    pub items: Vec<ItemRecord>,
    pub ratings: Vec<RatingRecord>,
    pub joined: Vec<JoinedRecord>,
}

fn head<T: Clone>(rows: &[T], n: usize) -> Vec<T> {
    rows.iter().take(n).cloned().collect()
}

/// Pipeline context, built once from the raw rows and then queried as many
/// times as needed.
pub struct Engine {
    stage: Stage,
    config: EngineConfig,
    similarity: SimilarityMatrix,
    report: PipelineReport,
    previews: Option<Previews>,
}

impl Engine {
    pub fn with_controller<C: Controller>(controller: &C, config: &EngineConfig) -> Result<Self, Error> {
        log::info!("Loading rows from {}", controller.name());

        let items = controller.items()?;
        let ratings = controller.ratings()?;

        Ok(Self::build(items, ratings, config)?)
    }

    pub fn build(
        items: Vec<RawItem>,
        ratings: Vec<RawRating>,
        config: &EngineConfig,
    ) -> Result<Self, ErrorKind> {
        let mut report = PipelineReport::default();

        let normalized = normalize(items, ratings);
        report.drops = normalized.report.clone();
        report.items = normalized.items.len();
        report.ratings = normalized.ratings.len();

        let produced = normalized.items.len().min(normalized.ratings.len());
        let stage = advance(Stage::Start, Stage::Normalized, produced)?;

        let joined = merge(&normalized.items, &normalized.ratings);
        report.joined = joined.len();
        let stage = advance(stage, Stage::Joined, joined.len())?;

        let previews = if config.keep_previews {
            Some(Previews {
                items: head(&normalized.items, config.preview_rows),
                ratings: head(&normalized.ratings, config.preview_rows),
                joined: head(&joined, config.preview_rows),
            })
        } else {
            None
        };
        drop(normalized);

        let ratings = pivot(&joined, config.aggregation);
        drop(joined);

        let (users, titles) = ratings.shape();
        report.users = users;
        report.titles = titles;
        let stage = advance(stage, Stage::Pivoted, users * titles)?;

        let similarity = SimilarityMatrix::from_ratings(&ratings);
        drop(ratings);
        let stage = advance(stage, Stage::SimilarityReady, similarity.len())?;

        Ok(Self {
            stage,
            config: config.clone(),
            similarity,
            report,
            previews,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Mark the start of the query loop, only valid once the similarity
    /// matrix is ready.
    pub fn begin_queries(&mut self) {
        if self.stage == Stage::SimilarityReady {
            log::info!("{} -> {}", self.stage, Stage::Querying);
            self.stage = Stage::Querying;
        }
    }

    pub fn finish(&mut self) {
        if self.stage != Stage::End {
            log::info!("{} -> {}", self.stage, Stage::End);
            self.stage = Stage::End;
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn report(&self) -> &PipelineReport {
        &self.report
    }

    pub fn previews(&self) -> Option<&Previews> {
        self.previews.as_ref()
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn recommend_scored(&self, title: &str, n: usize) -> Result<Vec<MapedDistance>, ErrorKind> {
        recommend::recommend(title, &self.similarity, n)
    }

    /// Top `n` similar titles, empty if `title` isn't known.
    pub fn recommend(&self, title: &str, n: usize) -> Vec<String> {
        match self.recommend_scored(title, n) {
            Ok(ranked) => ranked.into_iter().map(MapedDistance::into_title).collect(),
            Err(e) => {
                log::warn!("{}", e);
                vec![]
            }
        }
    }

    /// Same as `recommend` using the configured amount of results.
    pub fn top_n(&self, title: &str) -> Vec<String> {
        self.recommend(title, self.config.top_n)
    }

    pub fn similarity_between(&self, a: &str, b: &str) -> Result<f64, ErrorKind> {
        for title in &[a, b] {
            if !self.similarity.contains(title) {
                return Err(ErrorKind::UnknownQuery((*title).into()));
            }
        }

        self.similarity
            .get(a, b)
            .ok_or_else(|| ErrorKind::UnknownQuery(a.into()))
    }

    /// Known titles containing `fragment`, ignoring case.
    pub fn search(&self, fragment: &str) -> Vec<&str> {
        let fragment = fragment.to_lowercase();

        self.similarity
            .titles()
            .iter()
            .filter(|title| title.to_lowercase().contains(&fragment))
            .map(String::as_str)
            .collect()
    }
}
