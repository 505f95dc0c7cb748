//! XML namespaces of Answers rowsets and report definitions

use roxmltree::Node;

/// Rowset root and row elements
pub const ROWSET_NS: &str = "urn:schemas-microsoft-com:xml-analysis:rowset";
/// Inline schema preamble
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
/// Column attributes carried on preamble elements
pub const SAW_SQL_NS: &str = "urn:saw-sql";
/// Report definition documents
pub const SAW_NS: &str = "com.siebel.analytics.web/report/v1.1";
/// Expressions inside report definitions
pub const SAWX_NS: &str = "com.siebel.analytics.web/expression/v1.1";

/// Child elements of `node` with the given namespace and local name
pub fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    namespace: &'a str,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.has_tag_name((namespace, name)))
}

/// First child element of `node` with the given namespace and local name
pub fn child_element<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    namespace: &'a str,
    name: &'a str,
) -> Option<Node<'a, 'input>> {
    child_elements(node, namespace, name).next()
}

/// Source text of `node`, as it appeared in the parsed document
#[must_use]
pub fn source_text<'input>(node: Node<'_, 'input>) -> &'input str {
    &node.document().input_text()[node.range()]
}
