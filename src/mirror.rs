//! The markdown mirror of a year document
//!
//! A generated note embedding the document's JSON in a fenced code block: a
//! human-readable, hand-editable echo of the persisted resource. The rendering path
//! never consults it. Edits can be pulled back in through the explicit
//! "refresh from markdown" action (see [`Session::refresh_from_markdown`](crate::session::Session::refresh_from_markdown)).

use std::error::Error;

use crate::config;
use crate::document::YearDocument;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Render the markdown page mirroring this document
pub fn to_markdown(doc: &YearDocument) -> Result<String, Box<dyn Error>> {
    let title = config::PLANNER_TITLE.lock().unwrap().clone();
    let json = serde_json::to_string_pretty(doc)?;
    Ok(format!(
        "# {title} {year}\n\n\
         > Edit the JSON inside the code block below and run **{title}: Refresh from Markdown**.\n\n\
         {open}\n{json}\n{close}\n",
        title = title,
        year = doc.year(),
        open = FENCE_OPEN,
        json = json,
        close = FENCE_CLOSE,
    ))
}

/// Parse a document back out of mirror text.
///
/// The first ```` ```json ```` fenced block is extracted and deserialized (legacy
/// shapes are normalized just like when loading from storage). Errors when there is no
/// such block, or when its content is not a valid document.
pub fn from_markdown(text: &str) -> Result<YearDocument, Box<dyn Error>> {
    let start = match text.find(FENCE_OPEN) {
        Some(pos) => pos + FENCE_OPEN.len(),
        None => return Err("No ```json block found".into()),
    };
    let end = match text[start..].find(FENCE_CLOSE) {
        Some(pos) => start + pos,
        None => return Err("Unterminated ```json block".into()),
    };
    let doc = serde_json::from_str(text[start..end].trim())
        .map_err(|err| format!("Invalid JSON inside markdown: {}", err))?;
    Ok(doc)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayKey;

    fn sample() -> YearDocument {
        let mut doc = YearDocument::new(2024);
        doc.set_day_color("2024-01-01".parse::<DayKey>().unwrap(), Some("#FFB3BA".into()));
        doc.set_day_note("2024-01-02".parse::<DayKey>().unwrap(), Some("trip".into()));
        doc
    }

    #[test]
    fn round_trip_is_exact() {
        let doc = sample();
        let md = to_markdown(&doc).unwrap();
        let back = from_markdown(&md).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn page_is_titled_with_the_year() {
        let md = to_markdown(&sample()).unwrap();
        assert!(md.starts_with("# Year Planner 2024\n"));
    }

    #[test]
    fn missing_fence_is_an_error() {
        assert!(from_markdown("# Year Planner 2024\n\nno block here\n").is_err());
        assert!(from_markdown("```json\n{\"year\": 2024}").is_err(), "unterminated fence");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let md = "# x\n\n```json\n{ not json }\n```\n";
        assert!(from_markdown(md).is_err());
    }

    #[test]
    fn legacy_shapes_are_normalized_on_refresh() {
        let md = "```json\n{\"year\": 2022, \"palettes\": {\"colors\": [\"#123456\"]}}\n```\n";
        let doc = from_markdown(md).unwrap();
        assert_eq!(doc.palette()[0].color, "#123456");
    }
}
