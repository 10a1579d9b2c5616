//! Content-Type detection for uploads

use std::fs::File;
use std::io::Read;
use std::path::Path;

const OCTET_STREAM: &str = "application/octet-stream";

/// Number of leading bytes inspected when the extension is unknown
const SNIFF_LEN: usize = 512;

/// Detect the MIME type of a local file.
///
/// The extension is tried first; unknown extensions fall back to sniffing the
/// first bytes of the file, then to `application/octet-stream`.
pub fn detect_content_type(path: &Path) -> String {
    if let Some(mime) = mime_guess::from_path(path).first() {
        return mime.essence_str().to_string();
    }

    let mut buffer = Vec::with_capacity(SNIFF_LEN);
    let read = File::open(path).and_then(|file| file.take(SNIFF_LEN as u64).read_to_end(&mut buffer));
    match read {
        Ok(_) => sniff(&buffer).to_string(),
        Err(_) => OCTET_STREAM.to_string(),
    }
}

/// Guess a MIME type from leading bytes
fn sniff(head: &[u8]) -> &'static str {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"%PDF-", "application/pdf"),
        (b"PK\x03\x04", "application/zip"),
        (b"\x1f\x8b\x08", "application/x-gzip"),
    ];

    if let Some((_, mime)) = SIGNATURES.iter().find(|(magic, _)| head.starts_with(magic)) {
        return *mime;
    }

    if head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"WEBP" {
        return "image/webp";
    }

    if head.is_empty() || looks_like_text(head) {
        return "text/plain; charset=utf-8";
    }

    OCTET_STREAM
}

fn looks_like_text(head: &[u8]) -> bool {
    // The buffer may cut a multi-byte character in half.
    let valid = match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    };
    valid
        && !head
            .iter()
            .any(|&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b))
}
