use std::time::{Duration, Instant};

use chip::{definitions::keyboard, devices::KeyboardCommands};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use hashbrown::HashMap;

/// The keys of the left hand side of a qwerty keyboard, arranged like the
/// chip8 keypad.
const QWERTY: [[char; 4]; 4] = [
    ['1', '2', '3', '4'],
    ['q', 'w', 'e', 'r'],
    ['a', 's', 'd', 'f'],
    ['z', 'x', 'c', 'v'],
];

/// How long a key counts as held after the terminal reported it, terminals
/// only report presses and repeats.
const HOLD: Duration = Duration::from_millis(200);

/// The keys that control the emulator itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Step,
    TogglePause,
}

/// Reads the keypad from the terminal.
pub struct TermKeyboard {
    keymap: HashMap<char, usize>,
    /// the last time each key was reported
    pressed: [Option<Instant>; keyboard::SIZE],
    commands: Vec<Command>,
}

impl Default for TermKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl TermKeyboard {
    pub fn new() -> Self {
        Self {
            keymap: keymap(),
            pressed: [None; keyboard::SIZE],
            commands: Vec::new(),
        }
    }

    /// Will read all the pending terminal events.
    pub fn pump(&mut self) {
        loop {
            match event::poll(Duration::from_millis(0)) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle(key, Instant::now()),
                    Ok(_) => {}
                    Err(err) => {
                        log::warn!("could not read the terminal event: {}", err);
                        break;
                    }
                },
                Ok(false) => break,
                Err(err) => {
                    log::warn!("could not poll the terminal: {}", err);
                    break;
                }
            }
        }
    }

    /// Will take the commands that were entered since the last call.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    fn handle(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => self.commands.push(Command::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.commands.push(Command::Quit)
            }
            KeyCode::Char(' ') => self.commands.push(Command::Step),
            KeyCode::Char('p') | KeyCode::Char('P') => self.commands.push(Command::TogglePause),
            KeyCode::Char(c) => match self.keymap.get(&c.to_ascii_lowercase()) {
                Some(&index) => self.pressed[index] = Some(now),
                None => log::debug!("the key {:?} is not mapped", c),
            },
            _ => {}
        }
    }

    /// The keys that were reported within the hold window before `now`.
    fn held(&self, now: Instant) -> [bool; keyboard::SIZE] {
        let mut keys = [false; keyboard::SIZE];
        for (key, pressed) in keys.iter_mut().zip(self.pressed.iter()) {
            *key = matches!(pressed, Some(at) if now.saturating_duration_since(*at) < HOLD);
        }
        keys
    }
}

impl KeyboardCommands for TermKeyboard {
    fn get_keyboard(&mut self) -> [bool; keyboard::SIZE] {
        self.pump();
        self.held(Instant::now())
    }
}

/// Maps the qwerty block onto the keypad layout.
fn keymap() -> HashMap<char, usize> {
    QWERTY
        .iter()
        .flatten()
        .copied()
        .zip(keyboard::LAYOUT.iter().flatten().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_keymap() {
        let map = keymap();
        assert_eq!(keyboard::SIZE, map.len());
        assert_eq!(Some(&0x1), map.get(&'1'));
        assert_eq!(Some(&0xC), map.get(&'4'));
        assert_eq!(Some(&0x0), map.get(&'x'));
        assert_eq!(Some(&0xA), map.get(&'z'));
        assert_eq!(Some(&0xF), map.get(&'v'));
    }

    #[test]
    fn test_hold_window() {
        let mut input = TermKeyboard::new();
        let now = Instant::now();
        input.handle(key(KeyCode::Char('w')), now);
        input.handle(key(KeyCode::Char('V')), now);

        let keys = input.held(now);
        assert!(keys[0x5]);
        assert!(keys[0xF]);
        assert_eq!(2, keys.iter().filter(|&&key| key).count());

        assert!(input.held(now + HOLD / 2)[0x5]);
        assert!(!input.held(now + HOLD)[0x5]);
    }

    #[test]
    fn test_commands() {
        let mut input = TermKeyboard::new();
        let now = Instant::now();
        input.handle(key(KeyCode::Char(' ')), now);
        input.handle(key(KeyCode::Char('p')), now);
        input.handle(key(KeyCode::Esc), now);
        input.handle(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            now,
        );

        assert_eq!(
            vec![
                Command::Step,
                Command::TogglePause,
                Command::Quit,
                Command::Quit
            ],
            input.take_commands()
        );
        assert!(input.take_commands().is_empty());
        // a plain c is a keypad key
        input.handle(key(KeyCode::Char('c')), now);
        assert!(input.held(now)[0xB]);
    }
}
