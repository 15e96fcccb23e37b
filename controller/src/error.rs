// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use thiserror::Error as DError;

#[derive(Debug, Clone, DError, PartialEq)]
pub enum ErrorKind {
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Malformed row at line {0}: {1}")]
    MalformedRow(u64, String),

    #[error("Delimiter must be a single ascii character, got {0:?}")]
    InvalidDelimiter(char),
}
