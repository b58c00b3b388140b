//! Shared color constants for the UI.

use egui::Color32;

/// Forest green for success notices and linked accounts.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Red for field errors and failure notices.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Muted gray for secondary text and unmet password checks.
pub const COLOR_MUTED: Color32 = Color32::from_rgb(128, 128, 128);
