//! Parsing of inline `data:image/<subtype>;base64,<payload>` images.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

const SCHEME: &str = "data:";
const IMAGE_MIME_PREFIX: &str = "image/";

/// Why an inline image could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataUriError {
    #[error("not a data URI")]
    NotDataUri,

    #[error("missing ',' between header and payload")]
    MissingSeparator,

    #[error("unsupported media type '{0}', expected image/<subtype>")]
    NotAnImage(String),

    #[error("invalid image subtype '{0}'")]
    InvalidSubtype(String),

    #[error("payload is not base64 encoded")]
    NotBase64,

    #[error("empty payload")]
    EmptyPayload,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// A parsed, not yet decoded, inline image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri<'a> {
    /// Lowercased MIME subtype, also used as file extension.
    pub subtype: String,
    pub payload: &'a str,
}

/// Whether the value looks like a data URI at all.
pub fn is_data_uri(value: &str) -> bool {
    value
        .get(..SCHEME.len())
        .map(|s| s.eq_ignore_ascii_case(SCHEME))
        .unwrap_or(false)
}

/// Parse `data:image/<subtype>[;param]*;base64,<payload>`.
pub fn parse(value: &str) -> Result<DataUri<'_>, DataUriError> {
    if !is_data_uri(value) {
        return Err(DataUriError::NotDataUri);
    }
    let rest = &value[SCHEME.len()..];
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingSeparator)?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim();
    let subtype = match mime.get(..IMAGE_MIME_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(IMAGE_MIME_PREFIX) => {
            &mime[IMAGE_MIME_PREFIX.len()..]
        }
        _ => return Err(DataUriError::NotAnImage(mime.to_string())),
    };
    if subtype.is_empty() || !subtype.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DataUriError::InvalidSubtype(subtype.to_string()));
    }

    let is_base64 = params
        .last()
        .map(|p| p.trim().eq_ignore_ascii_case("base64"))
        .unwrap_or(false);
    if !is_base64 {
        return Err(DataUriError::NotBase64);
    }

    let payload = payload.trim();
    if payload.is_empty() {
        return Err(DataUriError::EmptyPayload);
    }

    Ok(DataUri {
        subtype: subtype.to_ascii_lowercase(),
        payload,
    })
}

impl DataUri<'_> {
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        STANDARD
            .decode(self.payload)
            .map_err(|e| DataUriError::InvalidBase64(e.to_string()))
    }
}
