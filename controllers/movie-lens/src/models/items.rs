// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use super::line_of;
use anyhow::Error;
use controller::{error::ErrorKind, RawItem};
use std::io::Read;

pub const ITEM_ID_COLUMN: &str = "item_id";
pub const TITLE_COLUMN: &str = "title";

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, Error> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| ErrorKind::MissingColumn(name.into()).into())
}

/// Read every item row, the header must name at least `item_id` and `title`,
/// any other column is carried along as a descriptive field. Values lose their
/// leading whitespace only.
pub fn read_items<R: Read>(mut csv: csv::Reader<R>) -> Result<Vec<RawItem>, Error> {
    let headers = csv.headers()?.clone();
    let id_idx = column_index(&headers, ITEM_ID_COLUMN)?;
    let title_idx = column_index(&headers, TITLE_COLUMN)?;

    let mut items = Vec::new();
    for record in csv.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping unreadable item row: {}", e);
                continue;
            }
        };

        let (item_id, title) = match (record.get(id_idx), record.get(title_idx)) {
            (Some(item_id), Some(title)) => (item_id.trim_start(), title.trim_start()),
            _ => {
                let reason = format!("expected {} columns, found {}", headers.len(), record.len());
                log::warn!("{}", ErrorKind::MalformedRow(line_of(&record), reason));
                continue;
            }
        };

        let mut item = RawItem::new(item_id, title);
        for (idx, (header, value)) in headers.iter().zip(record.iter()).enumerate() {
            if idx != id_idx && idx != title_idx {
                item.fields.insert(header.into(), value.trim_start().into());
            }
        }

        items.push(item);
    }

    log::debug!("Read {} item rows", items.len());
    Ok(items)
}
