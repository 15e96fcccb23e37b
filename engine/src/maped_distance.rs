// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use std::fmt::{self, Display};

/// A title paired with its similarity to some query title.
#[derive(Debug, Clone, PartialEq)]
pub struct MapedDistance(pub String, pub f64);

impl MapedDistance {
    pub fn title(&self) -> &str {
        &self.0
    }

    pub fn score(&self) -> f64 {
        self.1
    }

    pub fn into_title(self) -> String {
        self.0
    }
}

impl Display for MapedDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4})", self.0, self.1)
    }
}
