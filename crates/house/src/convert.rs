use roxmltree::Document;
use tracing::{debug, warn};
use xmltree::EmitterConfig;

use crate::decode::decode_house;
use crate::encode::{encode_house, EncodeOptions};
use crate::error::{ConvertError, ConvertErrorCode, SourceLocation};
use crate::validate::validate_house;

#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub pretty: bool,
    pub prefer_tag_identity: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            prefer_tag_identity: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub input_line_count: usize,
    pub output: String,
    pub output_line_count: usize,
}

/// One full conversion: parse, decode the entire entity graph, then encode
/// and serialize a fresh tree. Either the whole document converts or the
/// first error aborts the run; no partial output.
pub fn convert(input: &str, options: &ConvertOptions) -> Result<ConvertOutcome, ConvertError> {
    let document = Document::parse(input).map_err(|error| ConvertError {
        code: ConvertErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let house = decode_house(document.root_element())?;
    debug!(
        rooms = house.rooms.len(),
        special_responses = house.special_responses.len(),
        "house_decoded"
    );
    for issue in validate_house(&house) {
        match issue.location {
            Some(location) => warn!(
                entity = issue.entity,
                location = %location,
                "incomplete_identity"
            ),
            None => warn!(entity = issue.entity, "incomplete_identity"),
        }
    }

    let element = encode_house(
        &house,
        &EncodeOptions {
            prefer_tag_identity: options.prefer_tag_identity,
        },
    )?;

    let mut buffer = Vec::new();
    let config = EmitterConfig::new()
        .perform_indent(options.pretty)
        .write_document_declaration(false);
    element
        .write_with_config(&mut buffer, config)
        .map_err(|error| serialize_error(format!("failed to serialize document: {error}")))?;
    let output = String::from_utf8(buffer)
        .map_err(|error| serialize_error(format!("serialized document is not UTF-8: {error}")))?;

    Ok(ConvertOutcome {
        input_line_count: input.lines().count(),
        output_line_count: output.lines().count(),
        output,
    })
}

fn serialize_error(message: String) -> ConvertError {
    ConvertError {
        code: ConvertErrorCode::Serialize,
        message,
        location: None,
    }
}
