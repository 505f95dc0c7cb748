//! Sort directives in report XML definitions
//!
//! A report definition carries its ordering under the criteria element:
//!
//! ```xml
//! <saw:report xmlns:saw="com.siebel.analytics.web/report/v1.1">
//!   <saw:criteria subjectArea="&quot;Donations&quot;">
//!     <saw:columns>...</saw:columns>
//!     <saw:columnOrder>
//!       <saw:columnOrderRef columnID="c5" direction="ascending"/>
//!     </saw:columnOrder>
//!   </saw:criteria>
//! </saw:report>
//! ```
//!
//! The rest of the document is passed through byte for byte.

use roxmltree::{Document, Node};

use crate::error::{Result, RowmapError};
use crate::query::SortDirection;
use crate::reader::namespaces::{child_element, source_text, SAW_NS};
use crate::reader::rowset::SchemaPreamble;
use crate::schema::identity::ColumnIdentity;

/// Find the server-assigned id of the sort column in a probe's preamble
pub fn find_sort_column_id<'p>(
    preamble: &'p SchemaPreamble,
    identity: &ColumnIdentity,
) -> Result<&'p str> {
    let column = preamble.find(identity).ok_or_else(|| {
        RowmapError::data_retrieval(format!(
            "metadata does not indicate such a sort column exists: {identity}"
        ))
    })?;

    column.column_id.as_deref().ok_or_else(|| {
        RowmapError::data_retrieval(format!(
            "metadata does not give a column id for sort column {identity}"
        ))
    })
}

/// Make `column_id` in `direction` the only ordering of the report.
///
/// An existing `columnOrder` element keeps its start tag and has its content
/// replaced by a single reference; otherwise one is appended to the criteria
/// element. Fails with a data retrieval error when the
/// document cannot be parsed or has no criteria element.
pub fn replace_sort_directive(
    report_xml: &str,
    column_id: &str,
    direction: SortDirection,
) -> Result<String> {
    let document = Document::parse(report_xml).map_err(|e| {
        RowmapError::data_retrieval_with_source("cannot parse xml report definition", e)
    })?;

    let root = document.root_element();
    let criteria = if root.has_tag_name((SAW_NS, "report")) {
        child_element(root, SAW_NS, "criteria")
    } else {
        None
    };
    let Some(criteria) = criteria else {
        return Err(RowmapError::data_retrieval(format!(
            "xml report definition has no criteria element:\n{report_xml}"
        )));
    };

    let mut rewritten = String::with_capacity(report_xml.len() + 96);

    if let Some(column_order) = child_element(criteria, SAW_NS, "columnOrder") {
        let range = column_order.range();
        let order_text = source_text(column_order);
        let reference = sort_reference(prefix_of(column_order), column_id, direction);

        rewritten.push_str(&report_xml[..range.start]);
        if order_text.ends_with("/>") {
            open_element(&mut rewritten, column_order, &reference);
        } else {
            let start_tag_end = start_tag_len(order_text).ok_or_else(|| {
                RowmapError::data_retrieval("columnOrder element has an unterminated start tag")
            })?;
            let close = order_text.rfind("</").ok_or_else(|| {
                RowmapError::data_retrieval("columnOrder element has no closing tag")
            })?;
            rewritten.push_str(&order_text[..start_tag_end]);
            rewritten.push_str(&reference);
            rewritten.push_str(&order_text[close..]);
        }
        rewritten.push_str(&report_xml[range.end..]);
        return Ok(rewritten);
    }

    let range = criteria.range();
    let criteria_text = source_text(criteria);
    let directive = sort_directive(prefix_of(criteria), column_id, direction);

    if criteria_text.ends_with("/>") {
        rewritten.push_str(&report_xml[..range.start]);
        open_element(&mut rewritten, criteria, &directive);
    } else {
        let close = criteria_text.rfind("</").ok_or_else(|| {
            RowmapError::data_retrieval("criteria element has no closing tag")
        })?;
        let insert_at = range.start + close;
        rewritten.push_str(&report_xml[..insert_at]);
        rewritten.push_str(&directive);
        rewritten.push_str(&report_xml[insert_at..range.end]);
    }
    rewritten.push_str(&report_xml[range.end..]);

    Ok(rewritten)
}

fn sort_directive(prefix: &str, column_id: &str, direction: SortDirection) -> String {
    format!(
        "<{prefix}columnOrder>{}</{prefix}columnOrder>",
        sort_reference(prefix, column_id, direction)
    )
}

fn sort_reference(prefix: &str, column_id: &str, direction: SortDirection) -> String {
    format!(
        "<{prefix}columnOrderRef columnID=\"{}\" direction=\"{}\"/>",
        escape_attribute(column_id),
        direction.xml_name()
    )
}

/// Write a self-closing `element` as an open element holding `content`
fn open_element(out: &mut String, element: Node<'_, '_>, content: &str) {
    let text = source_text(element);
    let start_tag = text.strip_suffix("/>").unwrap_or(text);
    out.push_str(start_tag.trim_end());
    out.push('>');
    out.push_str(content);
    out.push_str("</");
    out.push_str(qualified_name(element));
    out.push('>');
}

/// Length of the start tag at the beginning of `element_text`, up to and
/// including its `>`
fn start_tag_len(element_text: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in element_text.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(open), c) if c == open => quote = None,
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Tag name as written in the source, e.g. `saw:criteria`
fn qualified_name<'input>(element: Node<'_, 'input>) -> &'input str {
    let text = source_text(element);
    let name = text.strip_prefix('<').unwrap_or(text);
    let end = name
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(name.len());
    &name[..end]
}

/// Namespace prefix of the element including the colon, or empty
fn prefix_of<'input>(element: Node<'_, 'input>) -> &'input str {
    let name = qualified_name(element);
    match name.find(':') {
        Some(colon) => &name[..=colon],
        None => "",
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
