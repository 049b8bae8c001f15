//! Product images staged for upload.

use std::fmt;

use thiserror::Error;

use crate::http::FormPayload;

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Reasons a file was not staged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageError {
    /// Staging would exceed the per-product limit.
    #[error("a product can have at most {max} images")]
    LimitReached {
        /// The limit.
        max: usize,
    },
    /// Zero-byte file.
    #[error("{file_name} is empty")]
    Empty {
        /// Offending file.
        file_name: String,
    },
    /// Not an accepted image type.
    #[error("{file_name} is not a JPEG, PNG, WebP or GIF image")]
    NotAnImage {
        /// Offending file.
        file_name: String,
    },
    /// Over [`MAX_IMAGE_BYTES`].
    #[error("{file_name} is larger than {max_bytes} bytes")]
    TooLarge {
        /// Offending file.
        file_name: String,
        /// The limit.
        max_bytes: usize,
    },
}

/// An image file ready to upload.
#[derive(Clone, PartialEq, Eq)]
pub struct StagedImage {
    file_name: String,
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl StagedImage {
    /// Check a file and infer its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Rejects empty, oversized and non-image files.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ImageError> {
        let file_name = file_name.into();
        let Some(content_type) = content_type_for(&file_name) else {
            return Err(ImageError::NotAnImage { file_name });
        };
        if bytes.is_empty() {
            return Err(ImageError::Empty { file_name });
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                file_name,
                max_bytes: MAX_IMAGE_BYTES,
            });
        }
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// MIME type.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty files are rejected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for StagedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Up to [`StagedImages::MAX`] images for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedImages {
    images: Vec<StagedImage>,
}

impl StagedImages {
    /// Images per product.
    pub const MAX: usize = 4;

    /// Nothing staged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage one image.
    ///
    /// # Errors
    ///
    /// Returns `LimitReached` when [`Self::MAX`] images are already staged.
    pub fn stage(&mut self, image: StagedImage) -> Result<(), ImageError> {
        self.stage_all(vec![image])
    }

    /// Stage a batch. Either every image is staged or none is.
    ///
    /// # Errors
    ///
    /// Returns `LimitReached` if the batch does not fit.
    pub fn stage_all(&mut self, images: Vec<StagedImage>) -> Result<(), ImageError> {
        if self.images.len() + images.len() > Self::MAX {
            return Err(ImageError::LimitReached { max: Self::MAX });
        }
        self.images.extend(images);
        Ok(())
    }

    /// Unstage the image at `index`.
    pub fn remove(&mut self, index: usize) -> Option<StagedImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Staged images in order.
    #[must_use]
    pub fn images(&self) -> &[StagedImage] {
        &self.images
    }

    /// Number staged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Free slots left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        Self::MAX.saturating_sub(self.images.len())
    }

    /// Append every image to `form` as a file part named `field`.
    #[must_use]
    pub fn append_to(&self, form: FormPayload, field: &str) -> FormPayload {
        self.images.iter().fold(form, |form, image| {
            form.file(
                field,
                image.file_name.clone(),
                image.content_type,
                image.bytes.clone(),
            )
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn jpeg(name: &str) -> StagedImage {
        StagedImage::new(name, vec![0xFF, 0xD8, 0xFF]).unwrap()
    }

    #[test]
    fn test_infers_content_type() {
        assert_eq!(jpeg("a.JPG").content_type(), "image/jpeg");
        assert_eq!(
            StagedImage::new("b.webp", vec![1]).unwrap().content_type(),
            "image/webp"
        );
    }

    #[test]
    fn test_rejects_bad_files() {
        assert!(matches!(
            StagedImage::new("notes.txt", vec![1]),
            Err(ImageError::NotAnImage { .. })
        ));
        assert!(matches!(
            StagedImage::new("noext", vec![1]),
            Err(ImageError::NotAnImage { .. })
        ));
        assert!(matches!(
            StagedImage::new("a.png", Vec::new()),
            Err(ImageError::Empty { .. })
        ));
        assert!(matches!(
            StagedImage::new("a.png", vec![0; MAX_IMAGE_BYTES + 1]),
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_limit_rejects_fifth_image() {
        let mut staged = StagedImages::new();
        staged
            .stage_all((1..=4).map(|i| jpeg(&format!("{i}.jpg"))).collect())
            .unwrap();
        assert_eq!(staged.remaining(), 0);

        assert_eq!(
            staged.stage(jpeg("5.jpg")),
            Err(ImageError::LimitReached { max: 4 })
        );
        assert_eq!(staged.len(), 4);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut staged = StagedImages::new();
        staged.stage(jpeg("1.jpg")).unwrap();
        staged.stage(jpeg("2.jpg")).unwrap();
        let batch = (3..=5).map(|i| jpeg(&format!("{i}.jpg"))).collect();
        assert!(staged.stage_all(batch).is_err());
        assert_eq!(staged.len(), 2);
    }

    #[test]
    fn test_remove_and_append() {
        let mut staged = StagedImages::new();
        staged.stage(jpeg("1.jpg")).unwrap();
        staged.stage(jpeg("2.jpg")).unwrap();
        assert!(staged.remove(5).is_none());
        assert_eq!(staged.remove(0).unwrap().file_name(), "1.jpg");

        let form = staged.append_to(FormPayload::new().text("name", "x"), "images");
        assert_eq!(form.file_count(), 1);
    }
}
