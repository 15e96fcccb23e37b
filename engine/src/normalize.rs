// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use common_macros::hash_map;
use controller::{Entity, RawItem, RawRating};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error as DError;

#[derive(Debug, Clone, DError, PartialEq)]
pub enum ParseError {
    #[error("Empty item key")]
    EmptyKey,

    #[error("Invalid item key '{0}'")]
    InvalidKey(String),

    #[error("Item key must be positive, got {0}")]
    NonPositiveKey(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub item_id: i64,
    pub title: String,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub user_id: i64,
    pub item_id: i64,
    pub rating: f64,
    pub timestamp: i64,
}

impl Entity for ItemRecord {
    type Id = i64;

    fn get_id(&self) -> Self::Id {
        self.item_id
    }

    fn get_data(&self) -> HashMap<String, String> {
        let mut data = hash_map! {
            "title".into() => self.title.clone(),
        };

        data.extend(self.fields.clone());
        data
    }
}

impl Entity for RatingRecord {
    type Id = i64;

    fn get_id(&self) -> Self::Id {
        self.user_id
    }

    fn get_data(&self) -> HashMap<String, String> {
        hash_map! {
            "item_id".into() => self.item_id.to_string(),
            "rating".into() => self.rating.to_string(),
            "timestamp".into() => self.timestamp.to_string(),
        }
    }
}

impl From<&ItemRecord> for RawItem {
    fn from(record: &ItemRecord) -> Self {
        Self {
            item_id: record.item_id.to_string(),
            title: record.title.clone(),
            fields: record.fields.clone(),
        }
    }
}

impl From<&RatingRecord> for RawRating {
    fn from(record: &RatingRecord) -> Self {
        Self {
            user_id: record.user_id,
            item_id: record.item_id.to_string(),
            rating: record.rating,
            timestamp: record.timestamp,
        }
    }
}

fn parse_key(token: &str) -> Result<i64, ParseError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ParseError::EmptyKey);
    }

    let key: i64 = token
        .parse()
        .map_err(|_| ParseError::InvalidKey(token.into()))?;

    if key > 0 {
        Ok(key)
    } else {
        Err(ParseError::NonPositiveKey(key))
    }
}

/// Item keys may come embedded in a composite field, only the leading token
/// before the first `,` is the key.
pub fn parse_item_key(raw: &str) -> Result<i64, ParseError> {
    parse_key(raw.split(',').next().unwrap_or(""))
}

pub fn normalize_item(raw: RawItem) -> Result<ItemRecord, ParseError> {
    Ok(ItemRecord {
        item_id: parse_item_key(&raw.item_id)?,
        title: raw.title,
        fields: raw.fields,
    })
}

pub fn normalize_rating(raw: RawRating) -> Result<RatingRecord, ParseError> {
    Ok(RatingRecord {
        user_id: raw.user_id,
        item_id: parse_key(&raw.item_id)?,
        rating: raw.rating,
        timestamp: raw.timestamp,
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropReport {
    pub items_read: usize,
    pub ratings_read: usize,
    pub item_errors: Vec<ParseError>,
    pub rating_errors: Vec<ParseError>,
}

impl DropReport {
    pub fn items_dropped(&self) -> usize {
        self.item_errors.len()
    }

    pub fn ratings_dropped(&self) -> usize {
        self.rating_errors.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub items: Vec<ItemRecord>,
    pub ratings: Vec<RatingRecord>,
    pub report: DropReport,
}

fn keep_parsed<R, T, F>(raw: Vec<R>, parse: F) -> (Vec<T>, Vec<ParseError>)
where
    F: Fn(R) -> Result<T, ParseError>,
{
    let mut kept = Vec::with_capacity(raw.len());
    let mut errors = Vec::new();

    for row in raw {
        match parse(row) {
            Ok(record) => kept.push(record),
            Err(e) => errors.push(e),
        }
    }

    (kept, errors)
}

/// Coerce raw rows into typed records, rows with an unusable item key are
/// dropped and accounted for in the report.
pub fn normalize(items: Vec<RawItem>, ratings: Vec<RawRating>) -> Normalized {
    let items_read = items.len();
    let ratings_read = ratings.len();

    let (items, item_errors) = keep_parsed(items, normalize_item);
    let (ratings, rating_errors) = keep_parsed(ratings, normalize_rating);

    for e in item_errors.iter().chain(rating_errors.iter()) {
        log::debug!("Dropped row: {}", e);
    }

    let report = DropReport {
        items_read,
        ratings_read,
        item_errors,
        rating_errors,
    };

    if report.items_dropped() > 0 || report.ratings_dropped() > 0 {
        log::warn!(
            "Dropped {} item(s) and {} rating(s) with unparseable keys",
            report.items_dropped(),
            report.ratings_dropped()
        );
    }

    Normalized {
        items,
        ratings,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_keys() {
        assert_eq!(parse_item_key("42"), Ok(42));
        assert_eq!(parse_item_key(" 7 "), Ok(7));
        assert_eq!(parse_item_key("1,Toy Story (1995)"), Ok(1));
        assert_eq!(parse_item_key("12,"), Ok(12));
        assert_eq!(parse_item_key(""), Err(ParseError::EmptyKey));
        assert_eq!(parse_item_key(",3"), Err(ParseError::EmptyKey));
        assert_eq!(parse_item_key("abc,1"), Err(ParseError::InvalidKey("abc".into())));
        assert_eq!(parse_item_key("0"), Err(ParseError::NonPositiveKey(0)));
        assert_eq!(parse_item_key("-3"), Err(ParseError::NonPositiveKey(-3)));
    }

    #[test]
    fn rating_keys_are_not_split() {
        let rating = normalize_rating(RawRating::new(1, "3,4", 2.0, 0));
        assert_eq!(rating, Err(ParseError::InvalidKey("3,4".into())));

        let rating = normalize_rating(RawRating::new(1, " 3 ", 2.0, 0));
        assert_eq!(rating.map(|r| r.item_id), Ok(3));
    }

    #[test]
    fn unparseable_rows_are_dropped() {
        let items = vec![
            RawItem::new("1", "A (2000)"),
            RawItem::new("x", "Broken (1999)"),
            RawItem::new("2,extra", "B (2001)").with_field("genres", "Drama"),
        ];

        let ratings = vec![
            RawRating::new(1, "1", 5.0, 0),
            RawRating::new(1, "?", 3.0, 0),
            RawRating::new(2, "2", 4.0, 0),
        ];

        let normalized = normalize(items, ratings);

        let ids: Vec<_> = normalized.items.iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(normalized.items[1].fields["genres"], "Drama");

        let ids: Vec<_> = normalized.ratings.iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(normalized.report.items_read, 3);
        assert_eq!(normalized.report.items_dropped(), 1);
        assert_eq!(normalized.report.ratings_read, 3);
        assert_eq!(
            normalized.report.rating_errors,
            vec![ParseError::InvalidKey("?".into())]
        );
    }

    #[test]
    fn normalizing_clean_records_is_idempotent() {
        let items = vec![
            RawItem::new("1,One", "A (2000)"),
            RawItem::new("2", "B (2001)").with_field("genres", "Comedy"),
        ];
        let ratings = vec![RawRating::new(9, "2", 1.5, 100)];

        let first = normalize(items, ratings);

        let items = first.items.iter().map(RawItem::from).collect();
        let ratings = first.ratings.iter().map(RawRating::from).collect();
        let second = normalize(items, ratings);

        assert_eq!(first.items, second.items);
        assert_eq!(first.ratings, second.ratings);
        assert_eq!(second.report.items_dropped(), 0);
        assert_eq!(second.report.ratings_dropped(), 0);
    }
}
