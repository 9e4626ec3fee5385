//! Sorted and filtered view of the catalog shown on the index page.

use crate::catalog::{Album, Catalog};
use rand::Rng;
use rand::seq::SliceRandom;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort order of the album grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    NameAsc,
    NameDesc,
    #[default]
    DateDesc,
    DateAsc,
    Random,
}

impl SortBy {
    pub const ALL: [SortBy; 5] = [
        SortBy::DateDesc,
        SortBy::DateAsc,
        SortBy::NameAsc,
        SortBy::NameDesc,
        SortBy::Random,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::NameAsc => "name-asc",
            SortBy::NameDesc => "name-desc",
            SortBy::DateDesc => "date-desc",
            SortBy::DateAsc => "date-asc",
            SortBy::Random => "random",
        }
    }

    /// Button label in the sort menu.
    pub fn label(self) -> &'static str {
        match self {
            SortBy::NameAsc => "Name (A-Z)",
            SortBy::NameDesc => "Name (Z-A)",
            SortBy::DateDesc => "Newest",
            SortBy::DateAsc => "Oldest",
            SortBy::Random => "Random",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| format!("unknown sort order: {}", s))
    }
}

fn compare_names(a: &Album, b: &Album) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Album ids in display order. Positions in this list are the values held by
/// the album selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumListing {
    ids: Vec<String>,
}

impl AlbumListing {
    /// Orders the catalog. Ties keep catalog order; `Random` shuffles with
    /// the supplied generator.
    pub fn build<R: Rng + ?Sized>(catalog: &Catalog, sort_by: SortBy, rng: &mut R) -> Self {
        let mut entries: Vec<(&str, &Album)> = catalog.iter().collect();

        match sort_by {
            SortBy::Random => entries.shuffle(rng),
            SortBy::NameAsc => entries.sort_by(|(_, a), (_, b)| compare_names(a, b)),
            SortBy::NameDesc => entries.sort_by(|(_, a), (_, b)| compare_names(b, a)),
            SortBy::DateDesc => {
                entries.sort_by(|(_, a), (_, b)| b.sort_timestamp().cmp(&a.sort_timestamp()))
            }
            SortBy::DateAsc => {
                entries.sort_by(|(_, a), (_, b)| a.sort_timestamp().cmp(&b.sort_timestamp()))
            }
        }

        Self {
            ids: entries.into_iter().map(|(id, _)| id.to_string()).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.ids.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Positions of the albums matching `query`, case-insensitively against
    /// the album name or id. An empty query matches everything.
    pub fn visible(&self, catalog: &Catalog, query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        self.ids
            .iter()
            .enumerate()
            .filter(|(_, id)| {
                query.is_empty()
                    || id.to_lowercase().contains(&query)
                    || catalog
                        .get(id)
                        .map(|album| album.name.to_lowercase().contains(&query))
                        .unwrap_or(false)
            })
            .map(|(position, _)| position)
            .collect()
    }
}
