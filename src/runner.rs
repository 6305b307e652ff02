use rand::{rngs::StdRng, RngCore};

use crate::{
    chip8::{ChipSet, Interpreter},
    definitions::{cpu, timer},
    devices::{DisplayCommands, KeyboardCommands},
    error::ProcessError,
    opcode::Operation,
};

/// The speed settings of the [`Runner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// the instructions executed between two timer ticks
    pub cycles_per_frame: u32,
}

impl RunnerConfig {
    /// Will calculate the instructions per frame for the given instruction
    /// frequency, at least one instruction runs per frame.
    pub fn from_hertz(hertz: u64) -> Self {
        let cycles = (hertz / timer::HERZ).max(1);
        Self {
            cycles_per_frame: cycles.min(u32::MAX as u64) as u32,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::from_hertz(cpu::HERTZ)
    }
}

/// Drives the interpreter with a fixed amount of instructions per timer
/// frame and connects it to the display and the keyboard.
///
/// A frame polls the keys, runs the instructions, counts the timers down
/// and redraws the display if needed. The pacing of the frames is left to
/// the caller.
pub struct Runner<R: RngCore = StdRng> {
    chip: ChipSet,
    interpreter: Interpreter<R>,
    config: RunnerConfig,
    frames: u64,
}

impl Runner<StdRng> {
    pub fn new(chip: ChipSet, config: RunnerConfig) -> Self {
        Self::with_interpreter(chip, config, Interpreter::new())
    }
}

impl<R: RngCore> Runner<R> {
    pub fn with_interpreter(chip: ChipSet, config: RunnerConfig, interpreter: Interpreter<R>) -> Self {
        Self {
            chip,
            interpreter,
            config,
            frames: 0,
        }
    }

    /// Will run a single frame.
    ///
    /// Returns the operation of the last executed instruction, the frame ends
    /// early when the program starts waiting for a key.
    pub fn frame<D, K>(&mut self, display: &mut D, keyboard: &mut K) -> Result<Operation, ProcessError>
    where
        D: DisplayCommands,
        K: KeyboardCommands,
    {
        self.poll(keyboard)?;

        let mut last = Operation::None;
        for _ in 0..self.config.cycles_per_frame {
            last = self.interpreter.step(&mut self.chip)?;
            if last == Operation::Wait {
                break;
            }
        }

        self.chip.tick_timers();
        self.present(display);
        self.frames += 1;
        Ok(last)
    }

    /// Will run a single instruction without counting the timers down,
    /// used to step through a program.
    pub fn step_instruction<D, K>(
        &mut self,
        display: &mut D,
        keyboard: &mut K,
    ) -> Result<Operation, ProcessError>
    where
        D: DisplayCommands,
        K: KeyboardCommands,
    {
        self.poll(keyboard)?;
        let operation = self.interpreter.step(&mut self.chip)?;
        self.present(display);
        Ok(operation)
    }

    /// Reads the keyboard and hands the lowest held key to a waiting program.
    fn poll<K: KeyboardCommands>(&mut self, keyboard: &mut K) -> Result<(), ProcessError> {
        let keys = keyboard.get_keyboard();
        self.chip.set_keyboard(&keys);

        if self.chip.is_awaiting_key().is_some() {
            if let Some(key) = self.chip.get_keyboard().first_pressed() {
                self.chip.resume(key)?;
            }
        }
        Ok(())
    }

    /// Multiple draws since the last frame result in a single redraw.
    fn present<D: DisplayCommands>(&mut self, display: &mut D) {
        if self.chip.needs_redraw() {
            display.display(self.chip.get_display());
            self.chip.clear_redraw();
        }
    }

    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }

    pub fn config(&self) -> RunnerConfig {
        self.config
    }

    /// The amount of frames that ran so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::{
        definitions::{display, keyboard},
        devices::{Headless, MockDisplayCommands, MockKeyboardCommands},
    };

    fn setup_runner(rom: &[u8]) -> Runner<StepRng> {
        let chip = ChipSet::with_program(rom).expect("the rom fits");
        Runner::with_interpreter(
            chip,
            RunnerConfig::default(),
            Interpreter::with_rng(StepRng::new(0, 1)),
        )
    }

    fn no_keys() -> MockKeyboardCommands {
        let mut keyboard = MockKeyboardCommands::new();
        keyboard
            .expect_get_keyboard()
            .returning(|| [false; keyboard::SIZE]);
        keyboard
    }

    #[test]
    fn test_config() {
        assert_eq!(8, RunnerConfig::default().cycles_per_frame);
        assert_eq!(1, RunnerConfig::from_hertz(60).cycles_per_frame);
        assert_eq!(1, RunnerConfig::from_hertz(1).cycles_per_frame);
        assert_eq!(1, RunnerConfig::from_hertz(0).cycles_per_frame);
        assert_eq!(20, RunnerConfig::from_hertz(1200).cycles_per_frame);
    }

    #[test]
    /// the display only gets the framebuffer once per change
    fn test_redraw_once() {
        // DRW V0, V1, 5 - JP 0x202
        let mut runner = setup_runner(&[0xD0, 0x15, 0x12, 0x02]);

        let mut display = MockDisplayCommands::new();
        display
            .expect_display()
            .withf(|pixels| pixels.len() == display::RESOLUTION && pixels[0])
            .times(1)
            .return_const(());
        let mut keyboard = no_keys();

        assert_eq!(Ok(Operation::None), runner.frame(&mut display, &mut keyboard));
        assert_eq!(Ok(Operation::None), runner.frame(&mut display, &mut keyboard));
        assert_eq!(2, runner.frames());
        assert!(!runner.chip().needs_redraw());
    }

    #[test]
    /// a key press ends the wait of the program
    fn test_key_resumes_wait() {
        // LD V0, K - JP 0x202
        let mut runner = setup_runner(&[0xF0, 0x0A, 0x12, 0x02]);

        let mut display = MockDisplayCommands::new();
        display.expect_display().never();

        let mut calls = 0;
        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_get_keyboard().returning(move || {
            calls += 1;
            let mut keys = [false; keyboard::SIZE];
            if calls > 2 {
                keys[0x5] = true;
                keys[0x9] = true;
            }
            keys
        });

        assert_eq!(Ok(Operation::Wait), runner.frame(&mut display, &mut keyboard));
        assert_eq!(Some(0x0), runner.chip().is_awaiting_key());
        assert_eq!(Ok(Operation::Wait), runner.frame(&mut display, &mut keyboard));

        assert_eq!(Ok(Operation::None), runner.frame(&mut display, &mut keyboard));
        assert_eq!(None, runner.chip().is_awaiting_key());
        assert_eq!(0x5, runner.chip().get_registers()[0x0]);
        assert_eq!(
            &[false, false, false, false, false, true, false, false, false, true][..],
            &runner.chip().get_keyboard().get_keys()[..10]
        );
    }

    #[test]
    /// the timers count down once per frame
    fn test_timers_per_frame() {
        // LD VA, 0x3C - LD DT, VA - JP 0x204
        let mut runner = setup_runner(&[0x6A, 0x3C, 0xFA, 0x15, 0x12, 0x04]);
        let mut device = Headless;

        assert_eq!(Ok(Operation::None), runner.frame(&mut device, &mut Headless));
        assert_eq!(59, runner.chip().get_delay_timer());

        for _ in 0..59 {
            assert_eq!(Ok(Operation::None), runner.frame(&mut device, &mut Headless));
        }
        assert_eq!(0, runner.chip().get_delay_timer());
        assert_eq!(60, runner.frames());
    }

    #[test]
    fn test_step_instruction() {
        // LD VA, 0x3C - LD DT, VA - CLS
        let mut runner = setup_runner(&[0x6A, 0x3C, 0xFA, 0x15, 0x00, 0xE0]);
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(1).return_const(());
        let mut keyboard = no_keys();

        assert_eq!(
            Ok(Operation::None),
            runner.step_instruction(&mut display, &mut keyboard)
        );
        assert_eq!(0x202, runner.chip().get_program_counter());
        assert_eq!(
            Ok(Operation::None),
            runner.step_instruction(&mut display, &mut keyboard)
        );
        // no timer tick while stepping
        assert_eq!(0x3C, runner.chip().get_delay_timer());
        assert_eq!(
            Ok(Operation::Draw),
            runner.step_instruction(&mut display, &mut keyboard)
        );
        assert_eq!(0, runner.frames());
    }

    #[test]
    fn test_error_stops_frame() {
        // RET on an empty stack
        let mut runner = setup_runner(&[0x00, 0xEE]);
        assert_eq!(
            Err(ProcessError::Stack(crate::error::StackError::Underflow)),
            runner.frame(&mut Headless, &mut Headless)
        );
        assert_eq!(0, runner.frames());
        assert_eq!(0x200, runner.chip().get_program_counter());
    }
}
