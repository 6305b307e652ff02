use crate::{definitions::keyboard, error::ProcessError};

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will display all from the pixels, the pixels are stored row-major
    /// (`y * WIDTH + x`).
    fn display(&mut self, pixels: &[bool]);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data
pub trait KeyboardCommands {
    /// Will return the keys that are currently held.
    fn get_keyboard(&mut self) -> [bool; keyboard::SIZE];
}

/// A device that shows nothing and never has a key pressed,
/// used to run a program without a front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl DisplayCommands for Headless {
    fn display(&mut self, _pixels: &[bool]) {}
}

impl KeyboardCommands for Headless {
    fn get_keyboard(&mut self) -> [bool; keyboard::SIZE] {
        [false; keyboard::SIZE]
    }
}

/// Will represent the internal keyboard.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    pub fn reset(&mut self) {
        self.keys = [false; keyboard::SIZE];
    }

    pub fn toggle_key(&mut self, key: usize) -> Result<(), ProcessError> {
        let current = self.is_pressed(key)?;
        self.set_key(key, !current)
    }

    pub fn set_key(&mut self, key: usize, to: bool) -> Result<(), ProcessError> {
        let entry = self.keys.get_mut(key).ok_or(ProcessError::InvalidKey(key))?;
        *entry = to;
        Ok(())
    }

    pub fn set_mult(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keys.copy_from_slice(keys);
    }

    /// Will check if the given key is held.
    pub fn is_pressed(&self, key: usize) -> Result<bool, ProcessError> {
        self.keys
            .get(key)
            .copied()
            .ok_or(ProcessError::InvalidKey(key))
    }

    /// The lowest key that is currently held.
    pub fn first_pressed(&self) -> Option<usize> {
        self.keys.iter().position(|&key| key)
    }

    pub fn get_keys(&self) -> &[bool] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_toggle() {
        let mut keys = Keyboard::new();
        assert_eq!(keys.first_pressed(), None);

        assert_eq!(keys.set_key(0xA, true), Ok(()));
        assert_eq!(keys.is_pressed(0xA), Ok(true));
        assert_eq!(keys.first_pressed(), Some(0xA));

        assert_eq!(keys.toggle_key(0x3), Ok(()));
        assert_eq!(keys.first_pressed(), Some(0x3));

        assert_eq!(keys.toggle_key(0x3), Ok(()));
        assert_eq!(keys.is_pressed(0x3), Ok(false));

        keys.reset();
        assert!(keys.get_keys().iter().all(|key| !key));
    }

    #[test]
    fn test_invalid_key() {
        let mut keys = Keyboard::new();
        assert_eq!(
            keys.set_key(keyboard::SIZE, true),
            Err(ProcessError::InvalidKey(keyboard::SIZE))
        );
        assert_eq!(keys.is_pressed(0xFF), Err(ProcessError::InvalidKey(0xFF)));
        assert_eq!(keys.toggle_key(0x10), Err(ProcessError::InvalidKey(0x10)));
    }

    #[test]
    fn test_set_mult() {
        let mut keys = Keyboard::new();
        let mut state = [false; keyboard::SIZE];
        state[0x5] = true;
        state[0xF] = true;
        keys.set_mult(&state);
        assert_eq!(keys.get_keys(), &state[..]);
        assert_eq!(keys.first_pressed(), Some(0x5));
    }

    #[test]
    fn test_headless() {
        let mut device = Headless;
        device.display(&[true; 4]);
        assert_eq!(device.get_keyboard(), [false; keyboard::SIZE]);
    }
}
