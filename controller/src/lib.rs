// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod entity;
pub mod error;
pub mod memory;

use anyhow::Error;
use common_macros::hash_map;
use std::collections::{BTreeMap, HashMap};

pub use entity::{entities_table, Entity, ToTable};
pub use memory::MemoryController;

pub type Result<T> = std::result::Result<T, Error>;

/// An item row exactly as the source produced it, the key is left untouched
/// since it may be a composite field (ex. "1,Toy Story").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub item_id: String,
    pub title: String,
    pub fields: BTreeMap<String, String>,
}

impl RawItem {
    pub fn new(item_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            title: title.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, val: impl Into<String>) -> Self {
        self.fields.insert(key.into(), val.into());
        self
    }
}

impl Entity for RawItem {
    type Id = String;

    fn get_id(&self) -> Self::Id {
        self.item_id.clone()
    }

    fn get_data(&self) -> HashMap<String, String> {
        let mut data = hash_map! {
            "title".into() => self.title.clone(),
        };

        data.extend(self.fields.clone());
        data
    }
}

/// A rating row, only the item key stays raw.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRating {
    pub user_id: i64,
    pub item_id: String,
    pub rating: f64,
    pub timestamp: i64,
}

impl RawRating {
    pub fn new(user_id: i64, item_id: impl Into<String>, rating: f64, timestamp: i64) -> Self {
        Self {
            user_id,
            item_id: item_id.into(),
            rating,
            timestamp,
        }
    }
}

pub trait Controller {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Get all item rows
    fn items(&self) -> Result<Vec<RawItem>>;

    /// Get all rating rows
    fn ratings(&self) -> Result<Vec<RawRating>>;
}
