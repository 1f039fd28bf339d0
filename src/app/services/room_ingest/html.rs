//! Low-level HTML table helpers
//!
//! The campus pages are real-world HTML with unclosed tags, so extraction
//! goes through the permissive `tl` parser. Tables, rows and cells are
//! pulled out by re-parsing `inner_html` at each level, which flattens the
//! page's irregular nesting into plain lists.

use crate::{Error, Result};

/// One table cell with its class list, cleaned text and first anchor
#[derive(Debug, Clone)]
pub(crate) struct Cell {
    pub classes: String,
    pub text: String,
    pub anchor_href: Option<String>,
    pub anchor_text: Option<String>,
}

impl Cell {
    /// Check for an exact class token
    pub fn has_class(&self, token: &str) -> bool {
        self.classes.split_whitespace().any(|c| c == token)
    }
}

/// Inner HTML of every `<table>` in the document, in document order
pub(crate) fn tables(html: &str) -> Result<Vec<String>> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| Error::invalid_content(format!("HTML parse error: {e}")))?;
    let parser = dom.parser();

    Ok(dom
        .nodes()
        .iter()
        .filter_map(|node| node.as_tag())
        .filter(|tag| tag.name().as_utf8_str() == "table")
        .map(|tag| tag.inner_html(parser).to_string())
        .collect())
}

/// Inner HTML of every `<tr>` in a table fragment
pub(crate) fn rows(table_html: &str) -> Result<Vec<String>> {
    let dom = tl::parse(table_html, tl::ParserOptions::default())
        .map_err(|e| Error::invalid_content(format!("table parse error: {e}")))?;
    let parser = dom.parser();

    Ok(dom
        .nodes()
        .iter()
        .filter_map(|node| node.as_tag())
        .filter(|tag| tag.name().as_utf8_str() == "tr")
        .map(|tag| tag.inner_html(parser).to_string())
        .collect())
}

/// Cells (`<td>` and `<th>`) of a row fragment
pub(crate) fn cells(row_html: &str) -> Result<Vec<Cell>> {
    let dom = tl::parse(row_html, tl::ParserOptions::default())
        .map_err(|e| Error::invalid_content(format!("row parse error: {e}")))?;
    let parser = dom.parser();

    let mut cells = Vec::new();
    for node in dom.nodes().iter() {
        let Some(tag) = node.as_tag() else { continue };
        let name = tag.name().as_utf8_str();
        if name != "td" && name != "th" {
            continue;
        }

        let classes = tag
            .attributes()
            .class()
            .map(|c| c.as_utf8_str().to_string())
            .unwrap_or_default();
        let text = clean_text(&tag.inner_text(parser));
        let (anchor_href, anchor_text) = first_anchor(&tag.inner_html(parser))?;

        cells.push(Cell {
            classes,
            text,
            anchor_href,
            anchor_text,
        });
    }

    Ok(cells)
}

/// First `<a>` of a cell fragment: (href, cleaned text)
fn first_anchor(cell_html: &str) -> Result<(Option<String>, Option<String>)> {
    let dom = tl::parse(cell_html, tl::ParserOptions::default())
        .map_err(|e| Error::invalid_content(format!("cell parse error: {e}")))?;
    let parser = dom.parser();

    for node in dom.nodes().iter() {
        let Some(tag) = node.as_tag() else { continue };
        if tag.name().as_utf8_str() != "a" {
            continue;
        }

        let href = tag
            .attributes()
            .get("href")
            .flatten()
            .map(|v| v.as_utf8_str().to_string());
        let text = clean_text(&tag.inner_text(parser));
        return Ok((href, Some(text)));
    }

    Ok((None, None))
}

/// Trim whitespace and unescape `&amp;`
pub(crate) fn clean_text(raw: &str) -> String {
    raw.replace("&amp;", "&").trim().to_string()
}
