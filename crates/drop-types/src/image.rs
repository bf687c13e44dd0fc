//! Image reference → CDN URL resolution.
//!
//! References look like `image-<assetid>-<WxH>-<format>`; the CDN path is
//! `https://cdn.sanity.io/images/{project}/{dataset}/<assetid>-<WxH>.<format>`.

use crate::error::ImageRefError;

/// Resolve an opaque asset reference to a fully-qualified CDN URL.
/// Pure and synchronous; malformed references are a typed error.
pub fn resolve_image_url(
    project: &str,
    dataset: &str,
    reference: &str,
) -> Result<String, ImageRefError> {
    let mut parts = reference.splitn(2, '-');
    let kind = parts
        .next()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ImageRefError::Malformed(reference.to_string()))?;
    if kind != "image" {
        return Err(ImageRefError::UnsupportedKind(kind.to_string()));
    }
    let rest = parts
        .next()
        .ok_or_else(|| ImageRefError::Malformed(reference.to_string()))?;

    // The last `-` separates the file format from `<assetid>-<WxH>`.
    let (name, format) = rest
        .rsplit_once('-')
        .ok_or_else(|| ImageRefError::Malformed(reference.to_string()))?;
    if name.is_empty() || format.is_empty() || !name.contains('-') {
        return Err(ImageRefError::Malformed(reference.to_string()));
    }

    Ok(format!(
        "https://cdn.sanity.io/images/{project}/{dataset}/{name}.{format}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_reference() {
        let url = resolve_image_url("proj1", "production", "image-abc123-2000x1000-png").unwrap();
        assert_eq!(
            url,
            "https://cdn.sanity.io/images/proj1/production/abc123-2000x1000.png"
        );
    }

    #[test]
    fn test_rejects_non_image_asset() {
        let err = resolve_image_url("p", "d", "file-abc123-pdf").unwrap_err();
        assert_eq!(err, ImageRefError::UnsupportedKind("file".to_string()));
    }

    #[test]
    fn test_rejects_malformed_reference() {
        for bad in ["image", "image-", "image-abc123", "-abc-1x1-png", ""] {
            assert!(
                resolve_image_url("p", "d", bad).is_err(),
                "accepted {bad:?}"
            );
        }
    }
}
