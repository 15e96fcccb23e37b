// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use super::line_of;
use anyhow::Error;
use controller::{error::ErrorKind, RawRating};
use std::{io::Read, str::FromStr};

// user_id, item_id, rating and an optional timestamp
const MIN_COLUMNS: usize = 3;
const MAX_COLUMNS: usize = 4;

fn field<T: FromStr>(record: &csv::StringRecord, idx: usize, name: &str) -> Result<T, ErrorKind> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse()
        .map_err(|_| ErrorKind::MalformedRow(line_of(record), format!("invalid {} '{}'", name, raw)))
}

fn parse_rating(record: &csv::StringRecord) -> Result<RawRating, ErrorKind> {
    if record.len() < MIN_COLUMNS || record.len() > MAX_COLUMNS {
        let reason = format!(
            "expected {} or {} columns, found {}",
            MIN_COLUMNS,
            MAX_COLUMNS,
            record.len()
        );
        return Err(ErrorKind::MalformedRow(line_of(record), reason));
    }

    Ok(RawRating {
        user_id: field(record, 0, "user_id")?,
        item_id: record[1].to_owned(),
        rating: field(record, 2, "rating")?,
        timestamp: timestamp(record),
    })
}

// A missing or unreadable timestamp reads as 0
fn timestamp(record: &csv::StringRecord) -> i64 {
    match record.get(3) {
        Some(raw) if !raw.is_empty() => raw.parse().unwrap_or_else(|_| {
            log::debug!("Line {}: unreadable timestamp '{}', using 0", line_of(record), raw);
            0
        }),
        _ => 0,
    }
}

/// Read every rating row, rows in fixed column order without header. The item
/// key is left raw, its coercion belongs to the engine.
pub fn read_ratings<R: Read>(mut csv: csv::Reader<R>) -> Result<Vec<RawRating>, Error> {
    let mut ratings = Vec::new();
    let mut skipped = 0;

    for record in csv.records() {
        let parsed = record
            .map_err(Error::from)
            .and_then(|record| parse_rating(&record).map_err(Error::from));

        match parsed {
            Ok(rating) => ratings.push(rating),
            Err(e) => {
                log::warn!("Skipping rating row: {}", e);
                skipped += 1;
            }
        }
    }

    log::debug!("Read {} rating rows ({} skipped)", ratings.len(), skipped);
    Ok(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn reader(data: &'static str) -> csv::Reader<&'static [u8]> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(b'\t')
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes())
    }

    #[test]
    fn read_tab_separated_ratings() -> Result<(), Error> {
        let data = "196\t242\t3\t881250949\n186\t302\t3.5\t891717742\n";
        let ratings = read_ratings(reader(data))?;

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0], RawRating::new(196, "242", 3.0, 881250949));
        assert_eq!(ratings[1].item_id, "302");
        assert_approx_eq!(ratings[1].rating, 3.5);

        Ok(())
    }

    #[test]
    fn first_row_is_data() -> Result<(), Error> {
        let ratings = read_ratings(reader("1\t2\t5\t0\n"))?;
        assert_eq!(ratings.len(), 1);

        Ok(())
    }

    #[test]
    fn unparseable_item_key_is_kept_raw() -> Result<(), Error> {
        let ratings = read_ratings(reader("1\tabc\t5\t0\n"))?;
        assert_eq!(ratings[0].item_id, "abc");

        Ok(())
    }

    #[test]
    fn malformed_rows_are_skipped() -> Result<(), Error> {
        let data = "1\t2\n\
                    x\t2\t5\t0\n\
                    1\t2\tgood\t0\n\
                    1\t2\t5\t0\t9\n\
                    3\t4\t1\t10\n";

        let ratings = read_ratings(reader(data))?;
        assert_eq!(ratings, vec![RawRating::new(3, "4", 1.0, 10)]);

        Ok(())
    }

    #[test]
    fn lenient_timestamp_keeps_row() -> Result<(), Error> {
        let data = "1\t2\t5\n\
                    1\t3\t4\t964982703.5\n\
                    1\t4\t3\t\n";

        let ratings = read_ratings(reader(data))?;

        assert_eq!(
            ratings,
            vec![
                RawRating::new(1, "2", 5.0, 0),
                RawRating::new(1, "3", 4.0, 0),
                RawRating::new(1, "4", 3.0, 0),
            ]
        );

        Ok(())
    }
}
