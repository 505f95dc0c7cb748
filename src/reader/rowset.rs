//! Rowset documents and their schema preamble
//!
//! A rowset looks like
//!
//! ```xml
//! <rowset xmlns="urn:schemas-microsoft-com:xml-analysis:rowset">
//!   <xsd:schema ...>
//!     <xsd:complexType name="Row">
//!       <xsd:sequence>
//!         <xsd:element name="Column0" saw-sql:tableHeading="Designation"
//!                      saw-sql:columnHeading="Designation Number" saw-sql:columnID="c0"/>
//!       </xsd:sequence>
//!     </xsd:complexType>
//!   </xsd:schema>
//!   <Row><Column0>0478406</Column0></Row>
//! </rowset>
//! ```
//!
//! The generated element names (`Column0`) are only meaningful within one
//! response, so the preamble is read afresh for every query.

use roxmltree::{Document, Node};
use rustc_hash::FxHashMap;

use crate::error::{Result, RowmapError};
use crate::reader::namespaces::{
    child_element, child_elements, source_text, ROWSET_NS, SAW_SQL_NS, XSD_NS,
};
use crate::schema::identity::ColumnIdentity;

/// A parsed rowset response
#[derive(Debug)]
pub struct Rowset<'input> {
    document: Document<'input>,
}

impl<'input> Rowset<'input> {
    /// Parse `xml`; `description` names the document in error messages
    pub fn parse(xml: &'input str, description: &str) -> Result<Self> {
        if xml.is_empty() {
            return Err(RowmapError::data_retrieval(format!("{description} is empty")));
        }

        let document = Document::parse(xml).map_err(|e| {
            let pos = e.pos();
            RowmapError::data_retrieval_with_source(
                format!(
                    "cannot parse {description}; error on line {} and column {}",
                    pos.row, pos.col
                ),
                e,
            )
        })?;

        Ok(Self { document })
    }

    /// Whether the rowset element has no content at all
    ///
    /// Answers answers a query matching nothing with a bare `<rowset/>`,
    /// without even a schema preamble.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.root_element().children().all(|child| {
            if child.is_element() {
                false
            } else if child.is_text() {
                child.text().is_none_or(|text| text.trim().is_empty())
            } else {
                true
            }
        })
    }

    /// Read the schema preamble.
    ///
    /// A rowset without a preamble yields an empty one; an element missing
    /// its name or heading attributes is a data retrieval error.
    pub fn preamble(&self) -> Result<SchemaPreamble> {
        let root = self.document.root_element();
        let mut preamble = SchemaPreamble::default();
        if !root.has_tag_name((ROWSET_NS, "rowset")) {
            return Ok(preamble);
        }

        let row_types = child_elements(root, XSD_NS, "schema")
            .flat_map(|schema| child_elements(schema, XSD_NS, "complexType"))
            .filter(|complex_type| complex_type.attribute("name") == Some("Row"));

        for row_type in row_types {
            let Some(sequence) = child_element(row_type, XSD_NS, "sequence") else {
                continue;
            };
            for element in child_elements(sequence, XSD_NS, "element") {
                preamble.push(PreambleColumn::from_element(element)?);
            }
        }

        Ok(preamble)
    }

    /// The row elements, in document order
    pub fn rows(&self) -> impl Iterator<Item = Node<'_, 'input>> + '_ {
        let root = self.document.root_element();
        let rows = if root.has_tag_name((ROWSET_NS, "rowset")) {
            Some(child_elements(root, ROWSET_NS, "Row"))
        } else {
            None
        };
        rows.into_iter().flatten()
    }

    /// The unparsed document
    #[must_use]
    pub fn xml(&self) -> &'input str {
        self.document.input_text()
    }
}

/// One column described by a rowset preamble
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreambleColumn {
    /// Generated element name, e.g. `Column0`
    pub element_name: String,
    pub identity: ColumnIdentity,
    /// Server-assigned column id used in sort directives, e.g. `c5`
    pub column_id: Option<String>,
}

impl PreambleColumn {
    fn from_element(element: Node<'_, '_>) -> Result<Self> {
        Ok(Self {
            element_name: required_attribute(element, None, "name")?,
            identity: ColumnIdentity::new(
                required_attribute(element, Some(SAW_SQL_NS), "tableHeading")?,
                required_attribute(element, Some(SAW_SQL_NS), "columnHeading")?,
            ),
            column_id: element
                .attribute((SAW_SQL_NS, "columnID"))
                .map(str::to_string),
        })
    }
}

fn required_attribute(element: Node<'_, '_>, namespace: Option<&str>, name: &str) -> Result<String> {
    let value = match namespace {
        Some(namespace) => element.attribute((namespace, name)),
        None => element.attribute(name),
    };
    value.map(str::to_string).ok_or_else(|| {
        RowmapError::data_retrieval(format!(
            "schema element {} is missing the {name} attribute",
            source_text(element)
        ))
    })
}

/// Mapping from column identity to the columns of one response
#[derive(Debug, Clone, Default)]
pub struct SchemaPreamble {
    columns: Vec<PreambleColumn>,
    by_identity: FxHashMap<ColumnIdentity, usize>,
}

impl SchemaPreamble {
    /// Append a column; the first column with a given identity wins lookups
    pub fn push(&mut self, column: PreambleColumn) {
        self.by_identity
            .entry(column.identity.clone())
            .or_insert(self.columns.len());
        self.columns.push(column);
    }

    #[must_use]
    pub fn columns(&self) -> &[PreambleColumn] {
        &self.columns
    }

    #[must_use]
    pub fn find(&self, identity: &ColumnIdentity) -> Option<&PreambleColumn> {
        self.by_identity
            .get(identity)
            .map(|&index| &self.columns[index])
    }

    /// Generated element name holding the column's values
    #[must_use]
    pub fn element_name(&self, identity: &ColumnIdentity) -> Option<&str> {
        self.find(identity).map(|column| column.element_name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
