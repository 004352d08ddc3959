//! Image attachments for outgoing messages.
//!
//! Images travel as data URLs (`data:image/png;base64,...`), the same shape a
//! browser file reader produces, so the search service can strip the prefix.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine as _};
use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::config::data::path_display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// File name shown next to the input box.
    pub file_name: String,
    pub data_url: String,
    pub byte_len: usize,
}

#[derive(Debug)]
pub enum AttachmentError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    UnsupportedType {
        path: PathBuf,
    },
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::Read { path, source } => {
                write!(f, "Failed to read image {}: {}", path_display(path), source)
            }
            AttachmentError::UnsupportedType { path } => write!(
                f,
                "{} is not a supported image (png, jpg, gif, webp, bmp)",
                path_display(path)
            ),
        }
    }
}

impl StdError for AttachmentError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AttachmentError::Read { source, .. } => Some(source),
            AttachmentError::UnsupportedType { .. } => None,
        }
    }
}

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Read and encode an image file.
pub async fn load_image(path: &Path) -> Result<ImageAttachment, AttachmentError> {
    let mime = mime_for_path(path).ok_or_else(|| AttachmentError::UnsupportedType {
        path: path.to_path_buf(),
    })?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| AttachmentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_display(path));

    Ok(ImageAttachment {
        file_name,
        data_url: encode_data_url(&bytes, mime),
        byte_len: bytes.len(),
    })
}

/// Strip an optional `data:<mime>;base64,` prefix.
pub fn base64_payload(data: &str) -> &str {
    if data.starts_with("data:") {
        if let Some((_, payload)) = data.split_once(',') {
            return payload;
        }
    }
    data
}

/// Number of bytes the base64 image decodes to, worked out from the padded
/// length without decoding. Malformed payloads are still rejected.
pub fn decoded_len(data: &str) -> Result<usize, DecodeError> {
    let payload = base64_payload(data).trim().as_bytes();
    if payload.len() % 4 != 0 {
        return Err(DecodeError::InvalidLength(payload.len()));
    }
    let padding = payload.iter().rev().take_while(|&&b| b == b'=').count();
    if padding > 2 {
        return Err(DecodeError::InvalidPadding);
    }
    let body = &payload[..payload.len() - padding];
    if let Some(offset) = body.iter().position(|&b| !is_base64_symbol(b)) {
        return Err(DecodeError::InvalidByte(offset, body[offset]));
    }
    Ok(payload.len() / 4 * 3 - padding)
}

fn is_base64_symbol(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn mime_lookup_is_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("a/B.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("look.webp")), Some("image/webp"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }

    #[test]
    fn decoded_len_ignores_data_url_prefix() {
        let url = encode_data_url(&[1, 2, 3, 4, 5], "image/png");
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decoded_len(&url).unwrap(), 5);
        assert_eq!(decoded_len("AQID").unwrap(), 3);
        assert!(decoded_len("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn decoded_len_matches_encoded_size() {
        for size in 0..=5 {
            let bytes = vec![0xAB_u8; size];
            assert_eq!(decoded_len(&STANDARD.encode(&bytes)).unwrap(), size);
        }
        let large = vec![7_u8; 3 * 1024 * 1024 + 1];
        let url = encode_data_url(&large, "image/jpeg");
        assert_eq!(decoded_len(&url).unwrap(), large.len());
    }

    #[test]
    fn decoded_len_rejects_malformed_payloads() {
        assert_eq!(decoded_len("AQI"), Err(DecodeError::InvalidLength(3)));
        assert_eq!(decoded_len("A==="), Err(DecodeError::InvalidPadding));
        assert_eq!(decoded_len("AQ=D"), Err(DecodeError::InvalidByte(2, b'=')));
        assert_eq!(decoded_len("A@CD"), Err(DecodeError::InvalidByte(1, b'@')));
    }

    #[tokio::test]
    async fn load_image_reads_and_encodes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shoe.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let attachment = load_image(&path).await.unwrap();

        assert_eq!(attachment.file_name, "shoe.png");
        assert_eq!(attachment.byte_len, 4);
        assert_eq!(decoded_len(&attachment.data_url).unwrap(), 4);
    }

    #[tokio::test]
    async fn load_image_rejects_unknown_extensions_and_missing_files() {
        let dir = TempDir::new().unwrap();
        let err = load_image(&dir.path().join("a.txt")).await.unwrap_err();
        assert!(matches!(err, AttachmentError::UnsupportedType { .. }));

        let err = load_image(&dir.path().join("missing.png")).await.unwrap_err();
        assert!(matches!(err, AttachmentError::Read { .. }));
    }
}
