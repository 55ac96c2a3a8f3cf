//! Directly attached controller handling
//!
//! Small USB boards (Pico-class microcontrollers) report raw axes and
//! buttons. Their potentiometers rarely rest at a known value, so axes read
//! zero until the device is first touched; the values at that moment become
//! the zero point for every later reading.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

/// USB vendor id of the supported controller boards.
pub const PICO_VENDOR_ID: u16 = 0x239a;
/// USB product id of the supported controller boards.
pub const PICO_PRODUCT_ID: u16 = 0x80f4;

/// Whether a USB device is one of the supported controller boards.
pub fn is_supported_device(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == PICO_VENDOR_ID && product_id == PICO_PRODUCT_ID
}

/// One raw poll of a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerReading {
    /// Stable device identifier (serial or HID path)
    pub device: String,
    pub axes: Vec<f64>,
    pub buttons: Vec<bool>,
}

impl ControllerReading {
    pub fn new(device: impl Into<String>, axes: Vec<f64>, buttons: Vec<bool>) -> Self {
        Self { device: device.into(), axes, buttons }
    }
}

/// Button value as reported to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ButtonState {
    Released = 1,
    Pressed = 2,
}

impl ButtonState {
    fn from_pressed(pressed: bool) -> Self {
        if pressed { ButtonState::Pressed } else { ButtonState::Released }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

/// A button that changed state between two polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonEdge {
    pub device: String,
    pub button: usize,
    pub state: ButtonState,
}

/// Zeroed axis values per device.
pub type AxisSnapshot = BTreeMap<String, Vec<f64>>;

#[derive(Debug, Default)]
struct DeviceState {
    initial_axes: Vec<f64>,
    zero: Option<Vec<f64>>,
    axes: Vec<f64>,
    buttons: Vec<bool>,
}

impl DeviceState {
    fn moved(&self, reading: &ControllerReading) -> bool {
        reading.buttons.iter().any(|b| *b)
            || reading.axes.iter().zip(&self.initial_axes).any(|(now, first)| now != first)
    }
}

/// Zeroing and edge detection for every attached controller.
#[derive(Debug, Default)]
pub struct ControllerBank {
    devices: HashMap<String, DeviceState>,
}

impl ControllerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one poll and return the button edges it produced.
    pub fn update(&mut self, readings: &[ControllerReading]) -> Vec<ButtonEdge> {
        let mut edges = Vec::new();

        for reading in readings {
            let state = self.devices.entry(reading.device.clone()).or_insert_with(|| {
                info!(
                    device = %reading.device,
                    axes = reading.axes.len(),
                    buttons = reading.buttons.len(),
                    "Controller attached"
                );
                DeviceState { initial_axes: reading.axes.clone(), ..DeviceState::default() }
            });

            if state.zero.is_none() && state.moved(reading) {
                debug!(device = %reading.device, "Controller zeroed at first movement");
                state.zero = Some(reading.axes.clone());
            }

            state.axes = match &state.zero {
                Some(zero) => reading
                    .axes
                    .iter()
                    .enumerate()
                    .map(|(i, raw)| raw - zero.get(i).copied().unwrap_or(0.0))
                    .collect(),
                None => vec![0.0; reading.axes.len()],
            };

            for (button, pressed) in reading.buttons.iter().enumerate() {
                let before = state.buttons.get(button).copied().unwrap_or(false);
                if before != *pressed {
                    let edge = ButtonEdge {
                        device: reading.device.clone(),
                        button,
                        state: ButtonState::from_pressed(*pressed),
                    };
                    let state = edge.state.value();
                    info!(device = %edge.device, button, state, "Controller button");
                    edges.push(edge);
                }
            }
            state.buttons = reading.buttons.clone();
        }

        edges
    }

    /// Zeroed axis values of a device.
    pub fn axes(&self, device: &str) -> Option<&[f64]> {
        self.devices.get(device).map(|d| d.axes.as_slice())
    }

    /// Current state of a button; unknown buttons read as released.
    pub fn button(&self, device: &str, button: usize) -> ButtonState {
        let pressed = self
            .devices
            .get(device)
            .and_then(|d| d.buttons.get(button).copied())
            .unwrap_or(false);
        ButtonState::from_pressed(pressed)
    }

    /// Zeroed axes of every attached device, keyed by device name.
    pub fn axis_snapshot(&self) -> AxisSnapshot {
        self.devices.iter().map(|(name, d)| (name.clone(), d.axes.clone())).collect()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(axes: Vec<f64>, buttons: Vec<bool>) -> ControllerReading {
        ControllerReading::new("pico-1", axes, buttons)
    }

    #[test]
    fn axes_read_zero_until_first_movement() {
        let mut bank = ControllerBank::new();
        bank.update(&[reading(vec![0.31, 0.7], vec![false])]);
        assert_eq!(bank.axes("pico-1"), Some(&[0.0, 0.0][..]));

        // first movement becomes the zero point
        bank.update(&[reading(vec![0.35, 0.7], vec![false])]);
        assert_eq!(bank.axes("pico-1"), Some(&[0.0, 0.0][..]));

        bank.update(&[reading(vec![0.45, 0.6], vec![false])]);
        let axes = bank.axes("pico-1").unwrap();
        assert!((axes[0] - 0.1).abs() < 1e-12);
        assert!((axes[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn button_press_also_zeroes() {
        let mut bank = ControllerBank::new();
        bank.update(&[reading(vec![0.2], vec![false])]);
        bank.update(&[reading(vec![0.2], vec![true])]);
        bank.update(&[reading(vec![0.5], vec![true])]);
        let axes = bank.axes("pico-1").unwrap();
        assert!((axes[0] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn buttons_report_edges_with_pressed_as_two() {
        let mut bank = ControllerBank::new();
        assert!(bank.update(&[reading(vec![], vec![false, false])]).is_empty());

        let edges = bank.update(&[reading(vec![], vec![false, true])]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].button, 1);
        assert_eq!(edges[0].state.value(), 2);
        assert_eq!(bank.button("pico-1", 1), ButtonState::Pressed);

        assert!(bank.update(&[reading(vec![], vec![false, true])]).is_empty());
        let edges = bank.update(&[reading(vec![], vec![false, false])]);
        assert_eq!(edges[0].state, ButtonState::Released);
        assert_eq!(bank.button("pico-1", 1).value(), 1);
        assert_eq!(bank.button("missing", 0), ButtonState::Released);
    }

    #[test]
    fn supported_device_ids() {
        assert!(is_supported_device(0x239a, 0x80f4));
        assert!(!is_supported_device(0x239a, 0x0001));
    }
}
