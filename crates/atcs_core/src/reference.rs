use thiserror::Error;

/// Prefix marking an image embedded directly in the reference string.
pub const INLINE_IMAGE_PREFIX: &str = "data:image/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("inline image reference has no ',' separating header and payload")]
    MissingSeparator,
}

/// View over one raw `img[src]` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageReference<'a> {
    /// `data:image/...;base64,<payload>`
    Inline(InlineImage<'a>),
    /// URL, absolute or relative to the page it was found on.
    Remote(&'a str),
}

impl<'a> ImageReference<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, ReferenceError> {
        if !raw.starts_with(INLINE_IMAGE_PREFIX) {
            return Ok(ImageReference::Remote(raw));
        }
        let (header, payload) = raw
            .split_once(',')
            .ok_or(ReferenceError::MissingSeparator)?;
        Ok(ImageReference::Inline(InlineImage { header, payload }))
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImageReference::Inline(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineImage<'a> {
    /// Everything before the first ',', e.g. `data:image/png;base64`.
    pub header: &'a str,
    /// Encoded body after the first ','.
    pub payload: &'a str,
}

impl InlineImage<'_> {
    /// File extension (without dot) inferred from the media type; `png` when unknown.
    pub fn extension(&self) -> &'static str {
        const MEDIA_TYPES: &[(&[&str], &str)] = &[
            (&["image/jpeg", "image/jpg"], "jpg"),
            (&["image/png"], "png"),
            (&["image/gif"], "gif"),
            (&["image/webp"], "webp"),
        ];
        MEDIA_TYPES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| self.header.contains(n)))
            .map(|(_, ext)| *ext)
            .unwrap_or("png")
    }
}
