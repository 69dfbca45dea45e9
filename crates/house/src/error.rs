use std::fmt;

use roxmltree::Node;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertErrorCode {
    XmlMalformed,
    MissingIdentity,
    AmbiguousConditions,
    MissingConditions,
    InvalidGettable,
    Serialize,
}

#[derive(Debug, Clone, Error)]
#[error("{code:?}: {message}{}", location_suffix(.location))]
pub struct ConvertError {
    pub code: ConvertErrorCode,
    pub message: String,
    pub location: Option<SourceLocation>,
}

fn location_suffix(location: &Option<SourceLocation>) -> String {
    match location {
        Some(location) => format!(" ({location})"),
        None => String::new(),
    }
}

/// Line/column of a node's opening tag in the source document.
pub(crate) fn node_location(node: Node<'_, '_>) -> SourceLocation {
    let pos = node.document().text_pos_at(node.range().start);
    SourceLocation {
        line: pos.row as usize,
        column: pos.col as usize,
    }
}

pub(crate) fn error_at_node(
    code: ConvertErrorCode,
    message: String,
    node: Node<'_, '_>,
) -> ConvertError {
    ConvertError {
        code,
        message,
        location: Some(node_location(node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_code_message_and_location() {
        let error = ConvertError {
            code: ConvertErrorCode::MissingConditions,
            message: "state has no condition container".to_string(),
            location: Some(SourceLocation { line: 3, column: 7 }),
        };
        assert_eq!(
            error.to_string(),
            "MissingConditions: state has no condition container (line 3, column 7)"
        );
    }

    #[test]
    fn error_display_omits_missing_location() {
        let error = ConvertError {
            code: ConvertErrorCode::MissingIdentity,
            message: "identity has neither a name nor an id".to_string(),
            location: None,
        };
        assert_eq!(
            error.to_string(),
            "MissingIdentity: identity has neither a name nor an id"
        );
    }
}
