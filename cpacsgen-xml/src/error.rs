use roxmltree::Node;
use thiserror::Error;

/// Failure while loading an XSD schema document.
///
/// Every variant names the offending schema element and its byte offset in
/// the document, which is the only location information available before
/// the front-end has synthesized xpaths.
#[derive(Error, Debug)]
pub enum XsdError {
    #[error("invalid XSD document: {0}")]
    Document(#[from] roxmltree::Error),
    #[error("<{element}> at offset {offset} is missing child <{child}>")]
    MissingChild {
        element: String,
        child: &'static str,
        offset: usize,
    },
    #[error("<{element}> at offset {offset} is missing attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
        offset: usize,
    },
    #[error("<{element}> at offset {offset} has invalid {attribute}=\"{value}\"")]
    InvalidAttribute {
        element: String,
        attribute: &'static str,
        value: String,
        offset: usize,
    },
}

impl XsdError {
    fn element_of(node: &Node<'_, '_>) -> String {
        let name = node.tag_name().name();
        if name.is_empty() {
            "document".to_owned()
        } else {
            name.to_owned()
        }
    }

    pub(crate) fn missing_child(node: &Node<'_, '_>, child: &'static str) -> Self {
        Self::MissingChild {
            element: Self::element_of(node),
            child,
            offset: node.range().start,
        }
    }

    pub(crate) fn missing_attribute(node: &Node<'_, '_>, attribute: &'static str) -> Self {
        Self::MissingAttribute {
            element: Self::element_of(node),
            attribute,
            offset: node.range().start,
        }
    }

    pub(crate) fn invalid_attribute(
        node: &Node<'_, '_>,
        attribute: &'static str,
        value: &str,
    ) -> Self {
        Self::InvalidAttribute {
            element: Self::element_of(node),
            attribute,
            value: value.to_owned(),
            offset: node.range().start,
        }
    }
}
