use egui::Pos2;

pub struct UiState {
    // Appearance
    pub dark_mode: bool,
    pub show_crosshair: bool,

    // Pixel under the cursor, if it is over the image
    pub hover_position: Option<Pos2>,
    pub hover_intensity: Option<u8>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_crosshair: true,
            hover_position: None,
            hover_intensity: None,
        }
    }
}
