// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod items;
pub mod ratings;

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|pos| pos.line()).unwrap_or_default()
}
