//! Media storage for uploaded portraits

use sha2::{Digest, Sha256};
use std::path::Path;

use seminar_common::{Error, Result};

/// Store a portrait under `<root>/avatars/<username>/`, named by content
/// hash with a sniffed extension. Returns the path relative to the media
/// root.
pub fn save_portrait(root: &Path, username: &str, bytes: &[u8]) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();

    let ext = infer::get(bytes)
        .map(|t| t.extension())
        .unwrap_or("bin");

    let relative = format!("avatars/{}/{}.{}", username, hex, ext);
    let full = root.join(&relative);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&full, bytes)?;

    Ok(relative)
}

/// Placeholder portrait served when the provider photo is unavailable
pub fn placeholder_portrait(username: &str) -> (String, &'static str) {
    let initial = username
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string());

    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="96" height="96">
  <rect width="96" height="96" fill="#8c9eff"/>
  <text x="48" y="62" font-family="sans-serif" font-size="44" fill="#ffffff" text-anchor="middle">{}</text>
</svg>"##,
        initial
    );

    (svg, "image/svg+xml")
}

/// Decode a base64 image payload
pub fn decode_image(b64: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|e| Error::InvalidInput(format!("Bad base64 image: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn test_save_portrait_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        // Minimal PNG magic so type sniffing has something to chew on
        let bytes = [
            0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x00,
        ];

        let first = save_portrait(dir.path(), "alice", &bytes).unwrap();
        let second = save_portrait(dir.path(), "alice", &bytes).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("avatars/alice/"));
        assert!(first.ends_with(".png"));
        assert!(dir.path().join(&first).exists());
    }

    #[test]
    fn test_decode_image_round_trip() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"pixels");
        assert_eq!(decode_image(&encoded).unwrap(), b"pixels");
        assert!(decode_image("not-base64!!!").is_err());
    }

    #[test]
    fn test_placeholder_has_initial() {
        let (svg, content_type) = placeholder_portrait("bob");
        assert!(svg.contains(">B</text>"));
        assert_eq!(content_type, "image/svg+xml");
    }
}
