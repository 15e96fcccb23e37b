// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use prettytable::{cell, format::consts::FORMAT_NO_LINESEP, row, table, Cell, Row, Table};
use std::collections::HashMap;

pub trait Entity {
    type Id;

    fn get_id(&self) -> Self::Id;
    fn get_data(&self) -> HashMap<String, String> {
        Default::default()
    }
}

pub trait ToTable {
    fn to_table(&self) -> Table;
}

impl<I: ToString, E: Entity<Id = I>> ToTable for E {
    fn to_table(&self) -> Table {
        let mut table = table![["id", self.get_id()]];

        let mut data: Vec<_> = self.get_data().into_iter().collect();
        data.sort();

        for (key, val) in data {
            table.add_row(row![key, val]);
        }

        table.set_format(*FORMAT_NO_LINESEP);
        table
    }
}

/// Lay out a list of entities as one row per entity, columns are the union
/// of their data keys (sorted) after the id.
pub fn entities_table<I: ToString, E: Entity<Id = I>>(entities: &[E]) -> Table {
    let mut keys: Vec<String> = entities
        .iter()
        .flat_map(|entity| entity.get_data().into_iter().map(|(key, _)| key))
        .collect();
    keys.sort();
    keys.dedup();

    let mut table = Table::new();
    let mut titles = vec![Cell::new("id")];
    titles.extend(keys.iter().map(|key| Cell::new(key)));
    table.set_titles(Row::new(titles));

    for entity in entities {
        let data = entity.get_data();
        let mut cells = vec![Cell::new(&entity.get_id().to_string())];
        cells.extend(
            keys.iter()
                .map(|key| Cell::new(data.get(key).map(String::as_str).unwrap_or(""))),
        );

        table.add_row(Row::new(cells));
    }

    table.set_format(*FORMAT_NO_LINESEP);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_macros::hash_map;

    struct Book {
        isbn: &'static str,
        title: &'static str,
    }

    impl Entity for Book {
        type Id = String;

        fn get_id(&self) -> Self::Id {
            self.isbn.into()
        }

        fn get_data(&self) -> HashMap<String, String> {
            hash_map! {
                "title".into() => self.title.into(),
            }
        }
    }

    #[test]
    fn single_entity_table() {
        let book = Book {
            isbn: "0195153448",
            title: "Classical Mythology",
        };

        let table = book.to_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_row(0).unwrap().get_cell(1).unwrap().get_content(), "0195153448");
        assert_eq!(
            table.get_row(1).unwrap().get_cell(1).unwrap().get_content(),
            "Classical Mythology"
        );
    }

    #[test]
    fn many_entities_table() {
        let books = vec![
            Book {
                isbn: "0002005018",
                title: "Clara Callan",
            },
            Book {
                isbn: "0060973129",
                title: "Decision in Normandy",
            },
        ];

        let table = entities_table(&books);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get_row(1).unwrap().get_cell(1).unwrap().get_content(),
            "Decision in Normandy"
        );
    }
}
