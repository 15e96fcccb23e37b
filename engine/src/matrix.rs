// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::join::JoinedRecord;
use config::Aggregation;
use std::collections::BTreeSet;

/// Dense user × title ratings, rows and columns are kept sorted. A cell
/// nobody rated holds 0.0, the same value as an explicit zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingMatrix {
    users: Vec<i64>,
    titles: Vec<String>,

    // Row-major, users.len() * titles.len()
    values: Vec<f64>,
}

impl RatingMatrix {
    pub fn users(&self) -> &[i64] {
        &self.users
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.users.len(), self.titles.len())
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() || self.titles.is_empty()
    }

    pub fn get(&self, user: i64, title: &str) -> Option<f64> {
        let row = self.users.binary_search(&user).ok()?;
        let col = self
            .titles
            .binary_search_by(|probe| probe.as_str().cmp(title))
            .ok()?;

        Some(self.values[row * self.titles.len() + col])
    }

    pub fn row(&self, idx: usize) -> Option<&[f64]> {
        let width = self.titles.len();
        if idx < self.users.len() {
            Some(&self.values[idx * width..(idx + 1) * width])
        } else {
            None
        }
    }

    pub fn column(&self, idx: usize) -> Option<impl Iterator<Item = f64> + '_> {
        if idx < self.titles.len() {
            Some(self.values.iter().skip(idx).step_by(self.titles.len()).copied())
        } else {
            None
        }
    }

    /// Every title column as its own contiguous vector over users.
    pub fn columns(&self) -> Vec<Vec<f64>> {
        let (rows, cols) = self.shape();
        let mut columns = vec![Vec::with_capacity(rows); cols];

        for row in self.values.chunks(cols.max(1)) {
            for (column, val) in columns.iter_mut().zip(row) {
                column.push(*val);
            }
        }

        columns
    }
}

/// Pivot joined rows into a dense matrix, duplicated (user, title) cells are
/// collapsed with the given aggregation.
pub fn pivot(joined: &[JoinedRecord], aggregation: Aggregation) -> RatingMatrix {
    let users: Vec<i64> = joined
        .iter()
        .map(|j| j.user_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let titles: Vec<String> = joined
        .iter()
        .map(|j| j.title.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect();

    let width = titles.len();
    let mut values = vec![0.0; users.len() * width];
    let mut counts = vec![0u32; users.len() * width];

    for record in joined {
        // Both searches hit since the axes come from these same rows
        let (row, col) = match (
            users.binary_search(&record.user_id),
            titles.binary_search(&record.title),
        ) {
            (Ok(row), Ok(col)) => (row, col),
            _ => continue,
        };

        let idx = row * width + col;
        match aggregation {
            Aggregation::First if counts[idx] > 0 => {}
            Aggregation::First | Aggregation::Last => values[idx] = record.rating,
            Aggregation::Mean => values[idx] += record.rating,
        }

        counts[idx] += 1;
    }

    if aggregation == Aggregation::Mean {
        for (val, count) in values.iter_mut().zip(&counts) {
            if *count > 1 {
                *val /= f64::from(*count);
            }
        }
    }

    let duplicates: u32 = counts.iter().filter(|c| **c > 1).map(|c| c - 1).sum();
    if duplicates > 0 {
        log::debug!(
            "Collapsed {} duplicated (user, title) rating(s) using {}",
            duplicates,
            aggregation
        );
    }

    RatingMatrix {
        users,
        titles,
        values,
    }
}
