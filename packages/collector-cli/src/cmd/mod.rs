//! Command implementations

pub mod capture;
pub mod collections;
pub mod extract;
pub mod key;

use collector::PageSource;

/// Page metadata from `--url` / `--title`.
pub fn page_source(url: Option<String>, title: Option<String>) -> PageSource {
    let mut source = match url {
        Some(url) => PageSource::new(url),
        None => PageSource::default(),
    };
    source.title = title;
    source
}
