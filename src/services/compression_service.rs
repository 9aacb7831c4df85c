use std::io::Write;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::types::errors::CodecError;

/// Trait defining the text compression codec.
pub trait CompressionServiceTrait {
    /// Raw-deflates `text` and wraps the result in base64.
    fn compress(&self, text: &str) -> Result<String, CodecError>;

    /// Reverses `compress`. Malformed input fails instead of yielding partial text.
    fn decompress(&self, encoded: &str) -> Result<String, CodecError>;

    /// UTF-8 byte length of `text`.
    fn byte_count(&self, text: &str) -> usize;
}

/// Raw deflate + standard base64 codec.
pub struct CompressionService {
    level: Compression,
}

impl CompressionService {
    pub fn new() -> Self {
        Self {
            level: Compression::default(),
        }
    }

    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for CompressionService {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionServiceTrait for CompressionService {
    fn compress(&self, text: &str) -> Result<String, CodecError> {
        let mut encoder = DeflateEncoder::new(Vec::new(), self.level);
        encoder
            .write_all(text.as_bytes())
            .map_err(|e| CodecError::Compression(e.to_string()))?;
        let bytes = encoder
            .finish()
            .map_err(|e| CodecError::Compression(e.to_string()))?;
        Ok(BASE64.encode(bytes))
    }

    fn decompress(&self, encoded: &str) -> Result<String, CodecError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CodecError::Decode(format!("base64: {}", e)))?;
        // Inflate until the final block; stalling with output room left means truncation.
        let mut inflater = Decompress::new(false);
        let mut out = Vec::with_capacity(bytes.len().saturating_mul(4).max(64));
        loop {
            if out.len() == out.capacity() {
                out.reserve(out.capacity());
            }
            let (before_in, before_out) = (inflater.total_in(), inflater.total_out());
            let status = inflater
                .decompress_vec(&bytes[before_in as usize..], &mut out, FlushDecompress::None)
                .map_err(|e| CodecError::Decode(format!("deflate: {}", e)))?;
            if status == Status::StreamEnd {
                break;
            }
            if inflater.total_in() == before_in && inflater.total_out() == before_out {
                return Err(CodecError::Decode("deflate: truncated stream".to_string()));
            }
        }
        if (inflater.total_in() as usize) < bytes.len() {
            return Err(CodecError::Decode("deflate: trailing data".to_string()));
        }
        String::from_utf8(out).map_err(|e| CodecError::Decode(format!("utf-8: {}", e)))
    }

    fn byte_count(&self, text: &str) -> usize {
        text.len()
    }
}
