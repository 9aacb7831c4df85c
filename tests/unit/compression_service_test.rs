//! Unit tests for the compression codec.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tabstash::services::compression_service::{CompressionService, CompressionServiceTrait};
use tabstash::types::errors::CodecError;

#[test]
fn test_compress_then_decompress_returns_input() {
    let codec = CompressionService::new();
    let text = r#"{"title":"Research","color":"blue","tabs":[{"title":"A","url":"https://x/1"}]}"#;
    let encoded = codec.compress(text).unwrap();
    assert_eq!(codec.decompress(&encoded).unwrap(), text);
}

#[test]
fn test_compress_is_raw_deflate_without_zlib_header() {
    let codec = CompressionService::new();
    let encoded = codec.compress("hello hello hello hello").unwrap();
    let bytes = BASE64.decode(&encoded).unwrap();
    // A zlib stream would start with 0x78.
    assert_ne!(bytes[0], 0x78);
}

#[test]
fn test_repetitive_text_shrinks() {
    let codec = CompressionService::new();
    let text = "https://example.com/page ".repeat(1000);
    let encoded = codec.compress(&text).unwrap();
    assert!(codec.byte_count(&encoded) < codec.byte_count(&text) / 10);
}

#[test]
fn test_unicode_round_trip() {
    let codec = CompressionService::new();
    let text = "Вкладки タブ 🧭 onglets";
    let encoded = codec.compress(text).unwrap();
    assert_eq!(codec.decompress(&encoded).unwrap(), text);
}

#[test]
fn test_decompress_rejects_invalid_base64() {
    let codec = CompressionService::new();
    let err = codec.decompress("not base64 !!!").unwrap_err();
    assert!(matches!(err, CodecError::Decode(ref m) if m.starts_with("base64")));
}

#[test]
fn test_decompress_rejects_non_deflate_bytes() {
    let codec = CompressionService::new();
    // 0xFF opens a block with the reserved block type.
    let err = codec.decompress("////////").unwrap_err();
    assert!(matches!(err, CodecError::Decode(ref m) if m.starts_with("deflate")));
}

#[test]
fn test_levels_decode_interchangeably() {
    let fast = CompressionService::with_level(1);
    let best = CompressionService::with_level(9);
    let text = "tab group ".repeat(200);
    assert_eq!(best.decompress(&fast.compress(&text).unwrap()).unwrap(), text);
    assert_eq!(fast.decompress(&best.compress(&text).unwrap()).unwrap(), text);
}

#[test]
fn test_decompress_rejects_truncated_stream() {
    let codec = CompressionService::new();
    let text: String = (0..2000).map(|i| format!("https://x.test/{}\n", i)).collect();
    let bytes = BASE64.decode(codec.compress(&text).unwrap()).unwrap();
    let truncated = BASE64.encode(&bytes[..bytes.len() / 2]);

    let err = codec.decompress(&truncated).unwrap_err();
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn test_decompress_rejects_empty_input() {
    let codec = CompressionService::new();
    assert!(codec.decompress("").is_err());
}

#[test]
fn test_decompress_rejects_bytes_after_stream_end() {
    let codec = CompressionService::new();
    let mut bytes = BASE64.decode(codec.compress("Research").unwrap()).unwrap();
    bytes.extend_from_slice(&[0u8; 4]);

    let err = codec.decompress(&BASE64.encode(&bytes)).unwrap_err();
    assert!(matches!(err, CodecError::Decode(ref m) if m.contains("trailing data")), "{}", err);
}
