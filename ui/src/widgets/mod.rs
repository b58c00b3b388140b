mod avatar;
mod form_field;
mod strength_meter;
mod toast_overlay;

pub use avatar::avatar;
pub use form_field::form_field;
pub use strength_meter::strength_meter;
pub use toast_overlay::toast_overlay;
