//! Screenshot payloads submitted by clients.
//!
//! Clients send either bare base64 or a `data:` URL. The decoded bytes are
//! handed to the OCR engine together with an extension for its temp file.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

const DEFAULT_MEDIA_TYPE: &str = "image/png";

/// Errors from decoding an image payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageDecodeError {
    #[error("Image payload is empty")]
    Empty,

    #[error("Image payload is not valid base64: {0}")]
    InvalidBase64(String),
}

/// A decoded image and its media type.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    media_type: String,
    bytes: Vec<u8>,
}

impl EncodedImage {
    /// Decodes base64 or a `data:<mime>;base64,<payload>` URL.
    pub fn decode(input: &str) -> Result<Self, ImageDecodeError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ImageDecodeError::Empty);
        }

        let (media_type, payload) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    ImageDecodeError::InvalidBase64("data URL has no payload".to_string())
                })?;
                let mime = header.strip_suffix(";base64").unwrap_or(header).trim();
                let mime = if mime.is_empty() { DEFAULT_MEDIA_TYPE } else { mime };
                (mime.to_ascii_lowercase(), payload)
            }
            None => (DEFAULT_MEDIA_TYPE.to_string(), input),
        };

        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if compact.is_empty() {
            return Err(ImageDecodeError::Empty);
        }

        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| ImageDecodeError::InvalidBase64(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ImageDecodeError::Empty);
        }

        Ok(Self { media_type, bytes })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// File extension matching the media type, used for temp files.
    pub fn extension(&self) -> &'static str {
        match self.media_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            _ => "png",
        }
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bare_base64_as_png() {
        let image = EncodedImage::decode("aGVsbG8=").unwrap();
        assert_eq!(image.bytes(), b"hello");
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.extension(), "png");
    }

    #[test]
    fn decodes_data_url_with_media_type() {
        let image = EncodedImage::decode("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(image.media_type(), "image/jpeg");
        assert_eq!(image.extension(), "jpg");
        assert_eq!(image.bytes(), b"hello");
    }

    #[test]
    fn ignores_line_breaks_in_payload() {
        let image = EncodedImage::decode("aGVs\nbG8=").unwrap();
        assert_eq!(image.bytes(), b"hello");
    }

    #[test]
    fn rejects_empty_payloads() {
        assert_eq!(EncodedImage::decode("  "), Err(ImageDecodeError::Empty));
        assert_eq!(
            EncodedImage::decode("data:image/png;base64,"),
            Err(ImageDecodeError::Empty)
        );
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = EncodedImage::decode("not base64!!").unwrap_err();
        assert!(matches!(err, ImageDecodeError::InvalidBase64(_)));
    }

    #[test]
    fn debug_output_omits_bytes() {
        let image = EncodedImage::decode("aGVsbG8=").unwrap();
        assert_eq!(
            format!("{:?}", image),
            r#"EncodedImage { media_type: "image/png", len: 5 }"#
        );
    }
}
