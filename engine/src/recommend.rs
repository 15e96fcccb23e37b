// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::{error::ErrorKind, maped_distance::MapedDistance, similarity_matrix::SimilarityMatrix};
use std::cmp::Ordering;

/// The `n` titles most similar to `query`, best first and never including
/// `query` itself. Equal scores keep the order titles have in the matrix.
pub fn recommend(
    query: &str,
    similarity: &SimilarityMatrix,
    n: usize,
) -> Result<Vec<MapedDistance>, ErrorKind> {
    let query_idx = similarity
        .index_of(query)
        .ok_or_else(|| ErrorKind::UnknownQuery(query.into()))?;

    let scores = similarity
        .scores_for(query)
        .ok_or_else(|| ErrorKind::UnknownQuery(query.into()))?;

    let mut ranked: Vec<(usize, f64)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(idx, _)| *idx != query_idx)
        .collect();

    // sort_by is stable, ties stay in title order
    ranked.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    ranked.truncate(n);

    let titles = similarity.titles();
    Ok(ranked
        .into_iter()
        .map(|(idx, score)| MapedDistance(titles[idx].clone(), score))
        .collect())
}
