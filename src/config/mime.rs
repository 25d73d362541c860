//! Allowed image media types.
//!
//! Membership is exact string equality against the lowercase media type; no
//! parameter stripping and no wildcard matching. Origins are expected to emit
//! bare media types from this list.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Media types the proxy will serve.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/bmp",
    "image/cgm",
    "image/g3fax",
    "image/gif",
    "image/ief",
    "image/jp2",
    "image/jpeg",
    "image/jpg",
    "image/pict",
    "image/png",
    "image/prs.btif",
    "image/svg+xml",
    "image/tiff",
    "image/vnd.adobe.photoshop",
    "image/vnd.djvu",
    "image/vnd.dwg",
    "image/vnd.dxf",
    "image/vnd.fastbidsheet",
    "image/vnd.fpx",
    "image/vnd.fst",
    "image/vnd.fujixerox.edmics-mmr",
    "image/vnd.fujixerox.edmics-rlc",
    "image/vnd.microsoft.icon",
    "image/vnd.ms-modi",
    "image/vnd.net-fpx",
    "image/vnd.wap.wbmp",
    "image/vnd.xiff",
    "image/webp",
    "image/x-cmu-raster",
    "image/x-cmx",
    "image/x-icon",
    "image/x-macpaint",
    "image/x-pcx",
    "image/x-pict",
    "image/x-portable-anymap",
    "image/x-portable-bitmap",
    "image/x-portable-graymap",
    "image/x-portable-pixmap",
    "image/x-quicktime",
    "image/x-rgb",
    "image/x-xbitmap",
    "image/x-xpixmap",
    "image/x-xwindowdump",
];

static ALLOWED_IMAGE_TYPE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALLOWED_IMAGE_TYPES.iter().copied().collect());

/// Returns `true` if `media_type` (already lowercased) is a servable image type.
pub fn is_allowed_image_type(media_type: &str) -> bool {
    ALLOWED_IMAGE_TYPE_SET.contains(media_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_image_types_allowed() {
        assert!(is_allowed_image_type("image/png"));
        assert!(is_allowed_image_type("image/jpeg"));
        assert!(is_allowed_image_type("image/gif"));
        assert!(is_allowed_image_type("image/webp"));
        assert!(is_allowed_image_type("image/svg+xml"));
    }

    #[test]
    fn test_non_image_types_rejected() {
        assert!(!is_allowed_image_type("text/html"));
        assert!(!is_allowed_image_type("application/octet-stream"));
        assert!(!is_allowed_image_type("application/javascript"));
    }

    #[test]
    fn test_matching_is_exact() {
        // Parameterized or padded values never match.
        assert!(!is_allowed_image_type("image/png; charset=utf-8"));
        assert!(!is_allowed_image_type(" image/png"));
        assert!(!is_allowed_image_type("image/png "));
        // Callers lowercase before membership; the set itself is lowercase.
        assert!(!is_allowed_image_type("IMAGE/PNG"));
    }
}
