use crate::{error::ShapeError, llm::GenerateContentResponse};
use serde_json::value::RawValue;

/// Extracts the first candidate's first part as a JSON array.
///
/// The returned value keeps the service's formatting inside the array; it is
/// never re-serialized. Whitespace around the array is dropped.
pub fn extract_json_array(
    response: &GenerateContentResponse,
) -> Result<Box<RawValue>, ShapeError> {
    let candidate = response.candidates.first().ok_or(ShapeError::NoCandidates)?;

    let part = candidate
        .content
        .as_ref()
        .and_then(|content| content.parts.first())
        .ok_or(ShapeError::NoContent)?;

    let raw: Box<RawValue> =
        serde_json::from_str(part.as_text()).map_err(|_| ShapeError::InvalidJson)?;

    if raw.get().trim_start().starts_with('[') {
        Ok(raw)
    } else {
        Err(ShapeError::NotAnArray)
    }
}
