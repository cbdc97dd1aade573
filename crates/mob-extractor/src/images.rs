//! Image and plate scraping

use crate::config::ExtractorConfig;
use crate::query::{element_text, Document};
use mob_domain::{BookCatalog, Plate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static NUMBERED_PLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^p.*?\d+").unwrap());
static NUMBERED_GENITALIA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").unwrap());
static LABEL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(♂|♀|\(holotype\)|\(paratype\))").unwrap());

/// Images of one document, sorted by kind
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageSet {
    /// Labelled plates; the default plate when the page has none
    pub plates: Vec<Plate>,
    /// Genitalia preparations
    pub genitalia: Vec<String>,
    /// Everything else
    pub misc: Vec<String>,
}

/// Classify and rewrite every `<img>` of a document
///
/// Image URLs are rewritten to `<cdn>/<book number>/<file>`. A book missing
/// from the catalog keeps no images and gets the default plate.
pub fn scrape_images(
    document: &Document,
    book: &str,
    catalog: &BookCatalog,
    config: &ExtractorConfig,
) -> ImageSet {
    let default_plates = || {
        vec![Plate {
            url: config.default_plate.clone(),
            label: String::new(),
        }]
    };

    let Some(number) = catalog.number_for(book) else {
        debug!("No book number for '{}', using default plate", book);
        return ImageSet {
            plates: default_plates(),
            ..ImageSet::default()
        };
    };
    let numbered = config.numbered_plate_books.iter().any(|b| b == book);

    let mut plate_urls = Vec::new();
    let mut set = ImageSet::default();
    for image in document.select_lenient("img") {
        let Some(src) = image.value().attr("src") else {
            continue;
        };
        let file = src.replace("../images/", "").replace("../", "");
        let url = format!("{}/{}/{}", config.cdn_base_url, number, file);
        match classify(&file.to_lowercase(), numbered) {
            ImageKind::Plate => plate_urls.push(url),
            ImageKind::Genitalia => set.genitalia.push(url),
            ImageKind::Misc => set.misc.push(url),
        }
    }

    let labels = plate_labels(document);
    set.plates = plate_urls
        .into_iter()
        .enumerate()
        .map(|(i, url)| Plate {
            url,
            label: labels.get(i).cloned().unwrap_or_default(),
        })
        .collect();
    if set.plates.is_empty() {
        set.plates = default_plates();
    }
    set
}

enum ImageKind {
    Plate,
    Genitalia,
    Misc,
}

fn classify(file: &str, numbered: bool) -> ImageKind {
    if numbered {
        if NUMBERED_PLATE.is_match(file) {
            ImageKind::Plate
        } else if NUMBERED_GENITALIA.is_match(file) {
            ImageKind::Genitalia
        } else {
            ImageKind::Misc
        }
    } else if file.contains("plate") {
        ImageKind::Plate
    } else if file.contains("genitalia") {
        ImageKind::Genitalia
    } else {
        ImageKind::Misc
    }
}

/// Specimen labels in page order, e.g. "♂ (holotype)"
///
/// Sex symbols and type designations are paired up by position.
fn plate_labels(document: &Document) -> Vec<String> {
    let mut symbols = Vec::new();
    let mut kinds = Vec::new();
    for element in document.select_lenient("td, p") {
        let text = element_text(element);
        if !LABEL_MARKER.is_match(&text) {
            continue;
        }
        for marker in LABEL_MARKER.find_iter(&text) {
            match marker.as_str() {
                symbol @ ("♂" | "♀") => symbols.push(symbol.to_string()),
                kind => kinds.push(kind.to_lowercase()),
            }
        }
    }

    let count = symbols.len().max(kinds.len());
    (0..count)
        .map(|i| {
            let parts = [symbols.get(i), kinds.get(i)];
            parts
                .into_iter()
                .flatten()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
