//! Avatar file checks and the local preview texture.

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use log::{info, warn};

use crate::api::AvatarUpload;

/// Largest accepted avatar, 5 MiB.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvatarRejection {
    #[error("Please select an image file")]
    NotAnImage,
    #[error("Image must be smaller than 5MB")]
    TooLarge { size: usize },
    #[error("Could not read image: {0}")]
    Unreadable(String),
}

/// A file that passed the checks and can be uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarSelection {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for AvatarSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarSelection")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl AvatarSelection {
    /// Accept `bytes` if the file name maps to an `image/*` type and the size is within
    /// [`MAX_AVATAR_BYTES`].
    pub fn from_file(file_name: &str, bytes: Vec<u8>) -> Result<Self, AvatarRejection> {
        let Some(mime) = mime_guess::from_path(file_name)
            .iter()
            .find(|m| m.type_() == mime_guess::mime::IMAGE)
        else {
            warn!("AvatarSelection: {file_name} is not an image");
            return Err(AvatarRejection::NotAnImage);
        };

        if bytes.len() > MAX_AVATAR_BYTES {
            warn!(
                "AvatarSelection: {file_name} is {} bytes, limit is {MAX_AVATAR_BYTES}",
                bytes.len()
            );
            return Err(AvatarRejection::TooLarge { size: bytes.len() });
        }

        Ok(Self {
            file_name: file_name.to_owned(),
            mime: mime.essence_str().to_owned(),
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn to_upload(&self) -> AvatarUpload {
        AvatarUpload {
            file_name: self.file_name.clone(),
            mime: self.mime.clone(),
            bytes: self.bytes.clone(),
        }
    }
}

/// Locally decoded preview of the selected avatar. Never uploaded.
///
/// The texture is freed when this value is dropped.
pub struct AvatarPreview {
    texture: TextureHandle,
    width: usize,
    height: usize,
}

impl std::fmt::Debug for AvatarPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarPreview")
            .field("texture", &self.texture.id())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl AvatarPreview {
    pub fn load(ctx: &Context, selection: &AvatarSelection) -> Result<Self, AvatarRejection> {
        let decoded = image::load_from_memory(selection.bytes())
            .map_err(|e| AvatarRejection::Unreadable(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        let color_image = ColorImage::from_rgba_unmultiplied([width, height], rgba.as_raw());

        info!(
            "AvatarPreview: loaded {} ({width}x{height})",
            selection.file_name()
        );
        let texture = ctx.load_texture("avatar_preview", color_image, TextureOptions::LINEAR);

        Ok(Self {
            texture,
            width,
            height,
        })
    }

    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }
}
