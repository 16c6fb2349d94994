use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};

use crate::{face::FACE_SIZE, Panel};

/// The status face in a desktop window.
pub struct SimPanel {
    display: SimulatorDisplay<Rgb888>,
    window: Option<Window>,
}

impl SimPanel {
    pub fn new() -> Self {
        let settings = OutputSettingsBuilder::new().scale(3).build();
        let window = Window::new("Air Watch", &settings);
        SimPanel {
            window: Some(window),
            ..Self::new_hidden()
        }
    }

    /// Creates a new SimPanel, but without generating a window.
    pub fn new_hidden() -> Self {
        SimPanel {
            display: SimulatorDisplay::new(FACE_SIZE),
            window: None,
        }
    }
}

impl Default for SimPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for SimPanel {
    type Target = SimulatorDisplay<Rgb888>;

    fn face(&mut self) -> &mut Self::Target {
        &mut self.display
    }

    fn flush(&mut self) -> Result<(), String> {
        if let Some(window) = &mut self.window {
            window.update(&self.display);
            if window.events().any(|e| matches!(e, SimulatorEvent::Quit)) {
                return Err("window closed".to_string());
            }
        }
        Ok(())
    }
}
