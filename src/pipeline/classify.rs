//! Row classification over the clipped document.
//!
//! The clipped markup is a sequence of top-level rows, each `<tr><td><table
//! ...>` wrapping one unit of content. An HTML5 tree builder drops those
//! stray `<tr>/<td>` wrappers (they are invalid outside a table) and
//! promotes each row's inner `<table>` to a direct child of `<body>`, so
//! classification iterates direct-child tables of the body — one per source
//! row, in source order.
//!
//! The signal is the `bgcolor` of the row's leading cell: the title
//! background marks a section banner, the content background a content row.
//! Content rows split on their strongest heading; an `<h4>` (news card
//! headline) wins over an `<h3>` (subsection heading) when both appear.
//! Rows with any other background or without the expected table shape are
//! decorative spacers and are skipped.

use crate::config::ConversionConfig;
use crate::dom;
use crate::output::SectionKind;
use scraper::{ElementRef, Html};
use tracing::debug;

/// One classified content row. `cell` is the leading cell the renderers
/// extract from; for quick-hits rows the renderer additionally walks the
/// cell's sibling rows.
pub(crate) struct ClassifiedRow<'a> {
    pub(crate) kind: SectionKind,
    pub(crate) cell: ElementRef<'a>,
}

/// Result of one classification pass.
#[derive(Default)]
pub(crate) struct RowScan<'a> {
    pub(crate) rows: Vec<ClassifiedRow<'a>>,
    /// Top-level row blocks examined, including skipped ones.
    pub(crate) examined: usize,
}

impl RowScan<'_> {
    pub(crate) fn skipped(&self) -> usize {
        self.examined - self.rows.len()
    }
}

/// Classify every top-level row of the parsed document, in order.
pub(crate) fn classify<'a>(doc: &'a Html, config: &ConversionConfig) -> RowScan<'a> {
    let Some(body) = dom::body_element(doc) else {
        return RowScan::default();
    };

    let mut scan = RowScan::default();
    for child in dom::direct_children(body) {
        if child.value().name() != "table" {
            continue;
        }
        scan.examined += 1;

        let Some(cell) = leading_cell(child) else {
            debug!("row {} skipped: no leading cell", scan.examined);
            continue;
        };
        let Some(bgcolor) = cell.value().attr("bgcolor") else {
            debug!("row {} skipped: leading cell has no bgcolor", scan.examined);
            continue;
        };

        let kind = if config.is_title_background(bgcolor) {
            SectionKind::Title
        } else if config.is_content_background(bgcolor) {
            if dom::first_descendant(cell, &dom::H4_SELECTOR).is_some() {
                SectionKind::News
            } else if dom::first_descendant(cell, &dom::H3_SELECTOR).is_some() {
                SectionKind::QuickHits
            } else {
                SectionKind::Generic
            }
        } else {
            debug!(
                "row {} skipped: unrecognised background '{}'",
                scan.examined, bgcolor
            );
            continue;
        };

        debug!("row {} classified as {}", scan.examined, kind.label());
        scan.rows.push(ClassifiedRow { kind, cell });
    }
    scan
}

/// The first cell of a row table: table → (inserted `<tbody>`) → first
/// `<tr>` → first `<td>` (or `<th>`).
fn leading_cell(table: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let scope = dom::direct_child_by_name(table, "tbody").unwrap_or(table);
    let tr = dom::direct_child_by_name(scope, "tr")?;
    dom::direct_child_by_name(tr, "td").or_else(|| dom::direct_child_by_name(tr, "th"))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parse rows in their raw clipped shape, stray wrappers included, to
    /// exercise the tree builder's promotion of the inner tables.
    fn parse_rows(rows: &str) -> Html {
        Html::parse_document(&format!("<html><body>{rows}</body></html>"))
    }

    fn kinds(doc: &Html) -> Vec<SectionKind> {
        classify(doc, &ConversionConfig::default())
            .rows
            .iter()
            .map(|r| r.kind)
            .collect()
    }

    #[test]
    fn classifies_each_kind_in_order() {
        let doc = parse_rows(
            "<tr><td><table><tr><td bgcolor=\"#000000\">AI NEWS</td></tr></table></td></tr>\
             <tr><td><table><tr><td bgcolor=\"#FFFFFF\"><h4>Launch</h4></td></tr></table></td></tr>\
             <tr><td><table><tr><td bgcolor=\"#FFFFFF\"><h3>Trending</h3></td></tr></table></td></tr>\
             <tr><td><table><tr><td bgcolor=\"#FFFFFF\"><p>Intro text here.</p></td></tr></table></td></tr>",
        );
        assert_eq!(
            kinds(&doc),
            vec![
                SectionKind::Title,
                SectionKind::News,
                SectionKind::QuickHits,
                SectionKind::Generic
            ]
        );
        let scan = classify(&doc, &ConversionConfig::default());
        assert_eq!(scan.examined, 4);
        assert_eq!(scan.skipped(), 0);
    }

    #[test]
    fn h4_wins_over_h3() {
        let doc = parse_rows(
            "<tr><td><table><tr><td bgcolor=\"#FFFFFF\"><h3>sub</h3><h4>headline</h4></td></tr></table></td></tr>",
        );
        assert_eq!(kinds(&doc), vec![SectionKind::News]);
    }

    #[test]
    fn bgcolor_match_is_case_insensitive() {
        let doc = parse_rows(
            "<tr><td><table><tr><td bgcolor=\"#ffffff\"><p>text</p></td></tr></table></td></tr>",
        );
        assert_eq!(kinds(&doc), vec![SectionKind::Generic]);
    }

    #[test]
    fn unrecognised_background_is_skipped() {
        let doc = parse_rows(
            "<tr><td><table><tr><td bgcolor=\"#FF0000\"><p>ad</p></td></tr></table></td></tr>\
             <tr><td><table><tr><td><p>no bgcolor</p></td></tr></table></td></tr>\
             <tr><td><table><tr><td bgcolor=\"#000000\">KEPT</td></tr></table></td></tr>",
        );
        let scan = classify(&doc, &ConversionConfig::default());
        assert_eq!(scan.examined, 3);
        assert_eq!(scan.skipped(), 2);
        assert_eq!(scan.rows.len(), 1);
        assert_eq!(scan.rows[0].kind, SectionKind::Title);
    }

    #[test]
    fn row_without_cells_is_skipped() {
        let doc = parse_rows("<tr><td><table><tr></tr></table></td></tr>");
        let scan = classify(&doc, &ConversionConfig::default());
        assert_eq!(scan.examined, 1);
        assert_eq!(scan.skipped(), 1);
    }

    #[test]
    fn non_table_body_children_are_not_rows() {
        let doc = parse_rows("<div><p>floating text</p></div>");
        let scan = classify(&doc, &ConversionConfig::default());
        assert_eq!(scan.examined, 0);
    }

    #[test]
    fn classification_reads_only_the_first_cell() {
        // second cell's bgcolor must not rescue a row whose first cell
        // carries none
        let doc = parse_rows(
            "<tr><td><table><tr><td><p>spacer</p></td><td bgcolor=\"#FFFFFF\"><p>text</p></td></tr></table></td></tr>",
        );
        let scan = classify(&doc, &ConversionConfig::default());
        assert_eq!(scan.skipped(), 1);
    }

    #[test]
    fn explicit_tbody_sources_classify_too() {
        let doc = parse_rows(
            "<table><tbody><tr><td bgcolor=\"#000000\">TITLE</td></tr></tbody></table>",
        );
        assert_eq!(kinds(&doc), vec![SectionKind::Title]);
    }
}
