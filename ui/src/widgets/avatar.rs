use egui::{Color32, CornerRadius, Image, Sense, Ui, Vec2, load::SizedTexture};
use taskflow_business::AvatarPreview;

const AVATAR_SIZE: f32 = 96.0;

/// The local preview if one is selected, otherwise a circle with the name's initials.
pub fn avatar(ui: &mut Ui, preview: Option<&AvatarPreview>, display_name: &str) {
    if let Some(preview) = preview {
        let texture = SizedTexture::new(preview.texture().id(), preview.texture().size_vec2());
        ui.add(
            Image::from_texture(texture)
                .fit_to_exact_size(Vec2::splat(AVATAR_SIZE))
                .corner_radius(CornerRadius::same((AVATAR_SIZE / 2.0) as u8)),
        );
        return;
    }

    let (rect, _) = ui.allocate_exact_size(Vec2::splat(AVATAR_SIZE), Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), AVATAR_SIZE / 2.0, Color32::from_gray(90));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initials(display_name),
        egui::FontId::proportional(32.0),
        Color32::WHITE,
    );
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
