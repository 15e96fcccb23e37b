// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::matrix::RatingMatrix;
use num_traits::float::Float;
use std::{collections::HashMap, ops::AddAssign};

fn dot<V>(a: &[V], b: &[V]) -> V
where
    V: Float + AddAssign,
{
    let mut acc = V::zero();
    for (x, y) in a.iter().zip(b) {
        acc += (*x) * (*y);
    }

    acc
}

fn norm<V>(a: &[V]) -> V
where
    V: Float + AddAssign,
{
    dot(a, a).sqrt()
}

// A zero norm means the vector carries no ratings at all, it's similar to nothing
fn cosine_from_parts<V: Float>(dot_prod: V, a_norm: V, b_norm: V) -> V {
    if a_norm.is_zero() || b_norm.is_zero() {
        return V::zero();
    }

    let cos_sim = dot_prod / (a_norm * b_norm);
    if cos_sim.is_nan() {
        V::zero()
    } else {
        cos_sim.max(-V::one()).min(V::one())
    }
}

/// Cosine of the angle between two dense vectors of the same length, zero if
/// either of them is all zeros.
pub fn cosine_similarity<V>(a: &[V], b: &[V]) -> V
where
    V: Float + AddAssign,
{
    cosine_from_parts(dot(a, b), norm(a), norm(b))
}

/// Symmetric title × title cosine similarities over the rating matrix columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    titles: Vec<String>,
    index: HashMap<String, usize>,

    // Row-major, titles.len() * titles.len()
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_ratings(ratings: &RatingMatrix) -> Self {
        let titles = ratings.titles().to_vec();
        let n = titles.len();

        let columns = ratings.columns();
        let norms: Vec<f64> = columns.iter().map(|column| norm(column.as_slice())).collect();

        let mut scores = vec![0.0; n * n];
        for i in 0..n {
            scores[i * n + i] = if norms[i] > 0.0 { 1.0 } else { 0.0 };

            for j in (i + 1)..n {
                let dot_prod = dot(columns[i].as_slice(), columns[j].as_slice());
                let sim = cosine_from_parts(dot_prod, norms[i], norms[j]);
                scores[i * n + j] = sim;
                scores[j * n + i] = sim;
            }
        }

        let index = titles
            .iter()
            .enumerate()
            .map(|(idx, title)| (title.clone(), idx))
            .collect();

        log::debug!("Computed {} similarities for {} titles", n * n, n);

        Self {
            titles,
            index,
            scores,
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.index.get(title).copied()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.index.contains_key(title)
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let row = self.index_of(a)?;
        let col = self.index_of(b)?;

        Some(self.scores[row * self.len() + col])
    }

    /// Similarities of `title` against every title, in `titles()` order.
    pub fn scores_for(&self, title: &str) -> Option<&[f64]> {
        let n = self.len();
        let row = self.index_of(title)?;

        Some(&self.scores[row * n..(row + 1) * n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{join::JoinedRecord, matrix::pivot};
    use assert_approx_eq::assert_approx_eq;
    use config::Aggregation;
    use std::collections::BTreeMap;

    fn matrix(rows: &[(i64, &str, f64)]) -> RatingMatrix {
        let joined: Vec<_> = rows
            .iter()
            .map(|(user_id, title, rating)| JoinedRecord {
                user_id: *user_id,
                item_id: 0,
                rating: *rating,
                timestamp: 0,
                title: title.to_string(),
                fields: BTreeMap::new(),
            })
            .collect();

        pivot(&joined, Aggregation::Last)
    }

    #[test]
    fn cosine_of_vectors() {
        assert_approx_eq!(cosine_similarity(&[5.0, 4.0], &[1.0, 5.0]), 25.0 / 1066f64.sqrt());
        assert_approx_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]), 0.0);
        assert_approx_eq!(cosine_similarity(&[2.0, 2.0], &[4.0, 4.0]), 1.0);
        assert_approx_eq!(cosine_similarity(&[0.0, 0.0], &[4.0, 4.0]), 0.0);
        assert_approx_eq!(cosine_similarity(&[1.0f32, -1.0], &[-1.0, 1.0]), -1.0f32);
    }

    #[test]
    fn two_titles_scenario() {
        let ratings = matrix(&[
            (1, "A (2000)", 5.0),
            (1, "B (2001)", 1.0),
            (2, "A (2000)", 4.0),
            (2, "B (2001)", 5.0),
        ]);

        let sim = SimilarityMatrix::from_ratings(&ratings);

        assert_eq!(sim.len(), 2);
        assert_eq!(sim.titles(), ratings.titles());
        assert_approx_eq!(sim.get("A (2000)", "B (2001)").unwrap(), 0.765_705, 1e-6);
        assert_approx_eq!(sim.get("A (2000)", "A (2000)").unwrap(), 1.0);
    }

    #[test]
    fn symmetric_with_unit_diagonal() {
        let ratings = matrix(&[
            (1, "A", 5.0),
            (1, "C", 3.0),
            (2, "B", 2.0),
            (2, "C", 4.5),
            (3, "A", 1.0),
            (3, "B", 4.0),
            (3, "D", 2.0),
        ]);

        let sim = SimilarityMatrix::from_ratings(&ratings);

        for a in sim.titles() {
            assert_eq!(sim.get(a, a), Some(1.0));

            for b in sim.titles() {
                let ab = sim.get(a, b).unwrap();
                assert_eq!(ab, sim.get(b, a).unwrap());
                assert!((0.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn all_zero_column_is_similar_to_nothing() {
        let ratings = matrix(&[(1, "A", 3.0), (2, "B", 0.0), (2, "A", 1.0)]);
        let sim = SimilarityMatrix::from_ratings(&ratings);

        assert_eq!(sim.get("B", "B"), Some(0.0));
        assert_eq!(sim.get("A", "B"), Some(0.0));
        assert_eq!(sim.get("A", "A"), Some(1.0));
    }

    #[test]
    fn lookups() {
        let ratings = matrix(&[(1, "A", 3.0), (1, "B", 4.0)]);
        let sim = SimilarityMatrix::from_ratings(&ratings);

        assert!(sim.contains("A"));
        assert!(!sim.contains("a"));
        assert_eq!(sim.index_of("B"), Some(1));
        assert_eq!(sim.get("A", "Z"), None);
        assert_eq!(sim.scores_for("B").map(<[f64]>::len), Some(2));
        assert_eq!(sim.scores_for("Z"), None);
    }

    #[test]
    fn empty_ratings_is_empty_matrix() {
        let sim = SimilarityMatrix::from_ratings(&RatingMatrix::default());

        assert!(sim.is_empty());
        assert_eq!(sim.len(), 0);
    }
}
