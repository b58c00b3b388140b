use taskflow_business::{BusinessConfig, build_state_ctx};
use taskflow_states::StateCtx;

use crate::utils::file_picker::{AvatarPicker, default_picker};

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    /// Source of avatar files for the profile page.
    pub picker: Box<dyn AvatarPicker>,
    /// Refresh `Time` from the wall clock every frame. Tests turn this off and drive the
    /// clock themselves.
    pub follow_wall_clock: bool,
}

impl Default for State {
    fn default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let config = BusinessConfig::from_env();
        #[cfg(target_arch = "wasm32")]
        let config = BusinessConfig::default();

        Self::new(config)
    }
}

impl State {
    pub fn new(config: BusinessConfig) -> Self {
        Self {
            ctx: build_state_ctx(config),
            picker: default_picker(),
            follow_wall_clock: true,
        }
    }

    pub fn test(base_url: String) -> Self {
        Self {
            follow_wall_clock: false,
            ..Self::new(BusinessConfig::new(base_url))
        }
    }

    pub fn with_picker(mut self, picker: impl AvatarPicker + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }
}
