// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::normalize::{ItemRecord, RatingRecord};
use common_macros::hash_map;
use controller::Entity;
use std::collections::{BTreeMap, HashMap};

/// A rating together with the metadata of the item it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub user_id: i64,
    pub item_id: i64,
    pub rating: f64,
    pub timestamp: i64,
    pub title: String,
    pub fields: BTreeMap<String, String>,
}

impl Entity for JoinedRecord {
    type Id = i64;

    fn get_id(&self) -> Self::Id {
        self.user_id
    }

    fn get_data(&self) -> HashMap<String, String> {
        let mut data = hash_map! {
            "item_id".into() => self.item_id.to_string(),
            "rating".into() => self.rating.to_string(),
            "title".into() => self.title.clone(),
        };

        data.extend(self.fields.clone());
        data
    }
}

/// Inner join on `item_id`. Output follows the ratings order, a key repeated
/// on both sides expands into every combination.
pub fn merge(items: &[ItemRecord], ratings: &[RatingRecord]) -> Vec<JoinedRecord> {
    let mut by_id: HashMap<i64, Vec<&ItemRecord>> = HashMap::new();
    for item in items {
        by_id.entry(item.item_id).or_default().push(item);
    }

    let mut joined = Vec::with_capacity(ratings.len());
    let mut unmatched = 0;

    for rating in ratings {
        let matches = match by_id.get(&rating.item_id) {
            Some(matches) => matches,
            None => {
                unmatched += 1;
                continue;
            }
        };

        for item in matches {
            joined.push(JoinedRecord {
                user_id: rating.user_id,
                item_id: rating.item_id,
                rating: rating.rating,
                timestamp: rating.timestamp,
                title: item.title.clone(),
                fields: item.fields.clone(),
            });
        }
    }

    if unmatched > 0 {
        log::debug!("{} rating(s) refer to unknown items", unmatched);
    }

    joined
}
