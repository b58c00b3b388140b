//! Avatar file selection.
//!
//! The picker is a trait so tests can hand the profile page a file without a system dialog.
//!
//! # Platform Support
//!
//! - **Native (Windows, macOS, Linux)**: native dialog via `rfd`.
//! - **Web (WASM)**: not supported, picking returns nothing.

/// A file the user picked: its name (used for the MIME check) and raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PickedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

pub trait AvatarPicker {
    /// Ask the user for a file. `None` when the dialog was cancelled or reading failed.
    fn pick(&self) -> Option<PickedFile>;
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SystemAvatarPicker;

#[cfg(not(target_arch = "wasm32"))]
impl AvatarPicker for SystemAvatarPicker {
    fn pick(&self) -> Option<PickedFile> {
        let path = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
            .set_title("Select an avatar")
            .pick_file()?;

        log::info!("User selected file: {}", path.display());

        // Size and type are checked by the business layer.
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to read file {}: {e}", path.display());
                return None;
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Some(PickedFile { name, bytes })
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct NoAvatarPicker;

#[cfg(target_arch = "wasm32")]
impl AvatarPicker for NoAvatarPicker {
    fn pick(&self) -> Option<PickedFile> {
        log::warn!("File picking is not supported on web");
        None
    }
}

pub fn default_picker() -> Box<dyn AvatarPicker> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(SystemAvatarPicker)
    }

    #[cfg(target_arch = "wasm32")]
    {
        Box::new(NoAvatarPicker)
    }
}

/// Picker that always returns the same file. Used by tests.
#[derive(Debug, Clone)]
pub struct FixedAvatarPicker(pub Option<PickedFile>);

impl AvatarPicker for FixedAvatarPicker {
    fn pick(&self) -> Option<PickedFile> {
        self.0.clone()
    }
}
