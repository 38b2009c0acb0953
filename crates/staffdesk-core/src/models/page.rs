use serde::{Deserialize, Deserializer, Serialize};

/// One page of a paginated list.
///
/// Endpoints without pagination return a bare array; that decodes as a
/// single page holding every item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Paged {
        #[serde(default)]
        count: Option<usize>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PageRepr::deserialize(deserializer)? {
            PageRepr::Paged {
                count,
                next,
                previous,
                results,
            } => Page {
                count: count.unwrap_or(results.len()),
                next,
                previous,
                results,
            },
            PageRepr::Bare(results) => Page {
                count: results.len(),
                next: None,
                previous: None,
                results,
            },
        })
    }
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Total pages given the server's page size, at least 1.
    pub fn total_pages(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 1;
        }
        self.count.div_ceil(page_size).max(1)
    }
}
