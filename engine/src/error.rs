// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::Stage;
use thiserror::Error as DError;

#[derive(Debug, Clone, DError, PartialEq)]
pub enum ErrorKind {
    #[error("No data to process, {0} stage produced an empty result")]
    EmptyResult(Stage),

    #[error("Couldn't found item with title({0})")]
    UnknownQuery(String),
}
