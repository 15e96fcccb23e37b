// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::{Controller, RawItem, RawRating, Result};

/// Controller over rows that already live in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryController {
    items: Vec<RawItem>,
    ratings: Vec<RawRating>,
}

impl MemoryController {
    pub fn new(items: Vec<RawItem>, ratings: Vec<RawRating>) -> Self {
        Self { items, ratings }
    }
}

impl Controller for MemoryController {
    fn name(&self) -> &str {
        "memory"
    }

    fn items(&self) -> Result<Vec<RawItem>> {
        Ok(self.items.clone())
    }

    fn ratings(&self) -> Result<Vec<RawRating>> {
        Ok(self.ratings.clone())
    }
}
