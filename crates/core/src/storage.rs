//! Object storage key layout and content types.
//!
//! Keys are deterministic per row so re-uploading after a retry overwrites
//! the previous object instead of leaking a new one.

use crate::generation::{KIND_IMAGE, KIND_STITCHED, KIND_VIDEO, KIND_VOICEOVER};
use crate::types::DbId;

pub const CONTENT_TYPE_MP4: &str = "video/mp4";
pub const CONTENT_TYPE_PNG: &str = "image/png";
pub const CONTENT_TYPE_MP3: &str = "audio/mpeg";
pub const CONTENT_TYPE_OCTET: &str = "application/octet-stream";

/// File extension and MIME type for a generation kind.
pub fn format_for_kind(kind: &str) -> (&'static str, &'static str) {
    match kind {
        KIND_VIDEO | KIND_STITCHED => ("mp4", CONTENT_TYPE_MP4),
        KIND_IMAGE => ("png", CONTENT_TYPE_PNG),
        KIND_VOICEOVER => ("mp3", CONTENT_TYPE_MP3),
        _ => ("bin", CONTENT_TYPE_OCTET),
    }
}

/// `projects/{project}/{kind}/{generation}.{ext}`
pub fn generation_key(project_id: DbId, kind: &str, generation_id: DbId) -> String {
    let (ext, _) = format_for_kind(kind);
    format!("projects/{project_id}/{kind}/{generation_id}.{ext}")
}

/// `brand-kits/{kit}/{unique}-{filename}` with the filename reduced to a
/// safe character set.
pub fn brand_asset_key(brand_kit_id: DbId, unique: &str, filename: &str) -> String {
    format!(
        "brand-kits/{brand_kit_id}/{unique}-{}",
        sanitize_filename(filename)
    )
}

pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Guess a MIME type from a filename extension.
pub fn content_type_for_filename(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => CONTENT_TYPE_PNG,
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => CONTENT_TYPE_MP4,
        "mp3" => CONTENT_TYPE_MP3,
        "wav" => "audio/wav",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "woff2" => "font/woff2",
        _ => CONTENT_TYPE_OCTET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_keys() {
        assert_eq!(generation_key(7, KIND_VIDEO, 42), "projects/7/video/42.mp4");
        assert_eq!(
            generation_key(7, KIND_VOICEOVER, 43),
            "projects/7/voiceover/43.mp3"
        );
        assert_eq!(generation_key(7, KIND_IMAGE, 44), "projects/7/image/44.png");
    }

    #[test]
    fn sanitize_strips_paths_and_symbols() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my logo (v2).png"), "my_logo__v2_.png");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[test]
    fn brand_asset_key_layout() {
        assert_eq!(
            brand_asset_key(3, "abc", "Logo.PNG"),
            "brand-kits/3/abc-Logo.PNG"
        );
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for_filename("Logo.PNG"), CONTENT_TYPE_PNG);
        assert_eq!(content_type_for_filename("font.woff2"), "font/woff2");
        assert_eq!(content_type_for_filename("noext"), CONTENT_TYPE_OCTET);
    }
}
