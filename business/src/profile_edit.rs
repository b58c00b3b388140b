//! Local edits on the profile page, kept apart from the fetched snapshot.

use std::any::Any;

use log::info;
use taskflow_states::{State, state_assign_impl};

use crate::api::{ProfileUpdatePayload, UserProfile};
use crate::avatar::{AvatarPreview, AvatarRejection, AvatarSelection};
use crate::validation::{Field, validate};

/// Holds a texture handle, so it is never part of a command snapshot. Commands receive
/// a [`ProfileUpdatePayload`] through [`crate::ProfileUpdateInput`] instead.
#[derive(Debug, Default)]
pub struct ProfileEdit {
    pub display_name: String,
    snapshot_name: Option<String>,
    avatar: Option<AvatarSelection>,
    preview: Option<AvatarPreview>,
    pub error: Option<String>,
    confirming: bool,
}

impl ProfileEdit {
    /// Take the fetched name as the new baseline. The input follows it unless the user
    /// already typed something else.
    pub fn seed(&mut self, profile: &UserProfile) {
        let untouched = self.display_name == self.snapshot_name.as_deref().unwrap_or_default();
        if untouched {
            self.display_name = profile.display_name.clone();
        }
        self.snapshot_name = Some(profile.display_name.clone());
    }

    pub fn snapshot_name(&self) -> Option<&str> {
        self.snapshot_name.as_deref()
    }

    fn name_changed(&self) -> bool {
        self.snapshot_name
            .as_deref()
            .is_some_and(|name| self.display_name.trim() != name)
    }

    /// Display name differs from the fetched one, or a file is selected.
    pub fn has_pending_changes(&self) -> bool {
        self.name_changed() || self.avatar.is_some()
    }

    pub fn display_name_error(&self) -> Option<String> {
        validate(Field::DisplayName, &self.display_name, "")
    }

    /// Open the confirmation step. Refused without pending changes or with an invalid name.
    pub fn request_confirm(&mut self) -> bool {
        if !self.has_pending_changes() {
            return false;
        }
        let name_error = self
            .name_changed()
            .then(|| self.display_name_error())
            .flatten();
        if let Some(message) = name_error {
            self.error = Some(message);
            return false;
        }
        self.error = None;
        self.confirming = true;
        true
    }

    pub fn cancel_confirm(&mut self) {
        self.confirming = false;
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    /// Validate and preview a picked file. A rejected file leaves the current selection as is.
    pub fn select_avatar(
        &mut self,
        ctx: &egui::Context,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), AvatarRejection> {
        let result = AvatarSelection::from_file(file_name, bytes).and_then(|selection| {
            AvatarPreview::load(ctx, &selection).map(|preview| (selection, preview))
        });

        match result {
            Ok((selection, preview)) => {
                info!("ProfileEdit: selected avatar {}", selection.file_name());
                // Replacing the old preview drops its texture.
                self.preview = Some(preview);
                self.avatar = Some(selection);
                self.error = None;
                Ok(())
            }
            Err(rejection) => {
                self.error = Some(rejection.to_string());
                Err(rejection)
            }
        }
    }

    pub fn clear_avatar(&mut self) {
        self.avatar = None;
        self.preview = None;
    }

    pub fn avatar(&self) -> Option<&AvatarSelection> {
        self.avatar.as_ref()
    }

    pub fn preview(&self) -> Option<&AvatarPreview> {
        self.preview.as_ref()
    }

    /// Adopt the server's profile after a successful update. `submitted_name` is the name
    /// sent with the update, if any; text typed while the request was in flight is kept.
    pub fn mark_saved(&mut self, profile: &UserProfile, submitted_name: Option<&str>) {
        let typed_since = match submitted_name {
            Some(name) => self.display_name.trim() != name,
            None => self.name_changed(),
        };
        if typed_since {
            info!("ProfileEdit: keeping display name edited during save");
        } else {
            self.display_name = profile.display_name.clone();
        }
        self.snapshot_name = Some(profile.display_name.clone());
        self.clear_avatar();
        self.confirming = false;
        self.error = None;
    }

    /// Leave the editing context, releasing the preview.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl ProfileUpdatePayload {
    /// Only the fields that changed: the trimmed name if it differs, the avatar if one is picked.
    pub fn from_edit(edit: &ProfileEdit) -> Self {
        Self {
            display_name: edit
                .name_changed()
                .then(|| edit.display_name.trim().to_owned()),
            avatar: edit.avatar().map(AvatarSelection::to_upload),
        }
    }
}

impl State for ProfileEdit {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::Utc;

    use super::*;
    use crate::api::AuthProvider;

    fn profile(name: &str) -> UserProfile {
        UserProfile {
            id: "1".to_owned(),
            display_name: name.to_owned(),
            email: "ada@example.com".to_owned(),
            avatar_url: None,
            created_at: Utc::now(),
            google_linked: false,
            github_linked: false,
            auth_provider: AuthProvider::Local,
        }
    }

    fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("png encodes");
        bytes
    }

    fn allocated(ctx: &egui::Context) -> usize {
        ctx.tex_manager().read().num_allocated()
    }

    #[test]
    fn seed_follows_fetch_until_user_edits() {
        let mut edit = ProfileEdit::default();
        edit.seed(&profile("Ada"));
        assert_eq!(edit.display_name, "Ada");
        assert!(!edit.has_pending_changes());

        edit.display_name = "Ada L.".to_owned();
        edit.seed(&profile("Ada Lovelace"));
        assert_eq!(edit.display_name, "Ada L.", "user edits survive a refetch");
        assert!(edit.has_pending_changes());
    }

    #[test]
    fn only_changed_name_is_sent() {
        let mut edit = ProfileEdit::default();
        edit.seed(&profile("Ada"));
        assert!(ProfileUpdatePayload::from_edit(&edit).is_empty());

        edit.display_name = "  Grace  ".to_owned();
        let payload = ProfileUpdatePayload::from_edit(&edit);
        assert_eq!(payload.display_name.as_deref(), Some("Grace"));
        assert!(payload.avatar.is_none());
    }

    #[test]
    fn whitespace_only_change_is_not_pending() {
        let mut edit = ProfileEdit::default();
        edit.seed(&profile("Ada"));
        edit.display_name = "Ada ".to_owned();
        assert!(!edit.has_pending_changes());
    }

    #[test]
    fn confirm_requires_pending_valid_changes() {
        let mut edit = ProfileEdit::default();
        edit.seed(&profile("Ada"));
        assert!(!edit.request_confirm());

        edit.display_name = "A".to_owned();
        assert!(!edit.request_confirm());
        assert_eq!(
            edit.error.as_deref(),
            Some("Display name must be at least 2 characters")
        );

        edit.display_name = "Grace".to_owned();
        assert!(edit.request_confirm());
        assert!(edit.is_confirming());

        edit.cancel_confirm();
        assert!(!edit.is_confirming());
    }

    #[test]
    fn oversized_file_leaves_pending_slot_untouched() {
        let ctx = egui::Context::default();
        let mut edit = ProfileEdit::default();
        edit.seed(&profile("Ada"));

        let result = edit.select_avatar(&ctx, "huge.png", vec![0; 6 * 1024 * 1024]);

        assert!(matches!(result, Err(AvatarRejection::TooLarge { .. })));
        assert!(edit.avatar().is_none());
        assert!(edit.preview().is_none());
        assert!(!edit.has_pending_changes());
        assert_eq!(edit.error.as_deref(), Some("Image must be smaller than 5MB"));
    }

    #[test]
    fn rejected_file_keeps_previous_selection() {
        let ctx = egui::Context::default();
        let mut edit = ProfileEdit::default();
        edit.select_avatar(&ctx, "me.png", png_bytes())
            .expect("valid png");

        assert!(edit.select_avatar(&ctx, "notes.txt", vec![1]).is_err());
        assert_eq!(edit.avatar().map(AvatarSelection::file_name), Some("me.png"));
        assert!(edit.preview().is_some());
    }

    #[test]
    fn previews_are_released_when_replaced_or_cleared() {
        let ctx = egui::Context::default();
        let baseline = allocated(&ctx);
        let mut edit = ProfileEdit::default();

        edit.select_avatar(&ctx, "a.png", png_bytes()).expect("valid png");
        assert_eq!(allocated(&ctx), baseline + 1);

        edit.select_avatar(&ctx, "b.png", png_bytes()).expect("valid png");
        assert_eq!(allocated(&ctx), baseline + 1, "old preview is freed");

        let payload = ProfileUpdatePayload::from_edit(&edit);
        assert_eq!(payload.avatar.map(|a| a.file_name), Some("b.png".to_owned()));

        edit.clear_avatar();
        assert_eq!(allocated(&ctx), baseline);

        edit.select_avatar(&ctx, "c.png", png_bytes()).expect("valid png");
        drop(edit);
        assert_eq!(allocated(&ctx), baseline, "dropping the edit frees the preview");
    }

    #[test]
    fn mark_saved_clears_pending_state() {
        let ctx = egui::Context::default();
        let mut edit = ProfileEdit::default();
        edit.seed(&profile("Ada"));
        edit.display_name = "Grace".to_owned();
        edit.select_avatar(&ctx, "me.png", png_bytes()).expect("valid png");

        edit.mark_saved(&profile("Grace"), Some("Grace"));

        assert!(!edit.has_pending_changes());
        assert!(edit.preview().is_none());
        assert_eq!(edit.snapshot_name(), Some("Grace"));
    }

    #[test]
    fn mark_saved_keeps_name_typed_during_save() {
        let mut edit = ProfileEdit::default();
        edit.seed(&profile("Ada"));
        edit.display_name = "Grace".to_owned();
        let payload = ProfileUpdatePayload::from_edit(&edit);

        // The user keeps typing while the request is in flight.
        edit.display_name = "Grace Hopper".to_owned();
        edit.mark_saved(&profile("Grace"), payload.display_name.as_deref());

        assert_eq!(edit.display_name, "Grace Hopper");
        assert_eq!(edit.snapshot_name(), Some("Grace"));
        assert!(edit.has_pending_changes());
    }

    #[test]
    fn mark_saved_after_avatar_only_update_follows_server_name() {
        let mut edit = ProfileEdit::default();
        edit.seed(&profile("Ada"));

        edit.mark_saved(&profile("Ada L."), None);

        assert_eq!(edit.display_name, "Ada L.");
        assert!(!edit.has_pending_changes());
    }
}
