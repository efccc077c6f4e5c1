//! Embedded image payload validation
//!
//! The endpoint only accepts a self-contained base64 image data URL.
//! Validation is fail-fast and happens before any outbound call; error
//! messages never echo the payload itself.

use crate::error::{ExtractError, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

const DATA_URL_PREFIX: &str = "data:";
const IMAGE_MEDIA_PREFIX: &str = "image/";
const BASE64_MARKER: &str = ";base64,";

/// A validated, self-contained embedded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Declared media type, e.g. `image/jpeg`
    pub media_type: String,
    /// Base64 payload, verified to decode
    pub data: String,
}

impl ImagePayload {
    /// Parse a `data:image/<subtype>;base64,<payload>` URL.
    ///
    /// Rejects anything that is not an image data URL, has no `;base64,`
    /// marker, or whose payload is empty or does not decode as standard
    /// padded base64.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url.strip_prefix(DATA_URL_PREFIX).ok_or_else(|| {
            ExtractError::InvalidInput("imageDataUrl must be a data URL".to_string())
        })?;

        if !rest.starts_with(IMAGE_MEDIA_PREFIX) {
            return Err(ExtractError::InvalidInput(
                "imageDataUrl must carry an image media type".to_string(),
            ));
        }

        let (media_type, data) = rest.split_once(BASE64_MARKER).ok_or_else(|| {
            ExtractError::InvalidInput(
                "imageDataUrl must be base64-encoded (missing ;base64, marker)".to_string(),
            )
        })?;

        if media_type.len() <= IMAGE_MEDIA_PREFIX.len() {
            return Err(ExtractError::InvalidInput(
                "imageDataUrl media type has no subtype".to_string(),
            ));
        }

        if data.is_empty() {
            return Err(ExtractError::InvalidInput(
                "imageDataUrl payload is empty".to_string(),
            ));
        }

        BASE64_STANDARD.decode(data).map_err(|_| {
            ExtractError::InvalidInput("imageDataUrl payload is not valid base64".to_string())
        })?;

        Ok(Self {
            media_type: media_type.to_string(),
            data: data.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_png_data_url() {
        let payload = ImagePayload::from_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(payload.media_type, "image/png");
        assert_eq!(payload.data, "aGVsbG8=");
    }

    #[test]
    fn test_rejects_non_data_url() {
        let err = ImagePayload::from_data_url("https://example.com/receipt.png").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_non_image_media_type() {
        let err = ImagePayload::from_data_url("data:text/plain;base64,aGVsbG8=").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_missing_base64_marker() {
        let err = ImagePayload::from_data_url("data:image/png,rawbytes").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_empty_payload() {
        let err = ImagePayload::from_data_url("data:image/png;base64,").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let err = ImagePayload::from_data_url("data:image/png;base64,not!!valid##").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_bare_image_media_type() {
        let err = ImagePayload::from_data_url("data:image/;base64,aGVsbG8=").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[test]
    fn test_error_never_echoes_payload() {
        let err = ImagePayload::from_data_url("data:image/png;base64,secret!!payload").unwrap_err();
        assert!(!err.to_string().contains("secret"));
    }
}
