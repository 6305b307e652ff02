use std::convert::TryFrom;

use tinyvec::ArrayVec;

use crate::{
    definitions::{cpu, display, keyboard, memory},
    devices::Keyboard,
    error::{MemoryError, ProcessError, StackError},
    opcode::{self, Instruction, Opcode, ProgramCounter, ProgramCounterStep},
    timer::Timer,
};

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
///
/// It has no behaviour of its own besides keeping its invariants,
/// the [`Interpreter`](super::Interpreter) executes the program on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipSet {
    /// - `0x000-0x04F` - Used for the built in `4x5` pixel font set (`0-F`)
    /// - `0x050-0x1FF` - Reserved for the interpreter
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: Vec<u8>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions; thus, it should be avoided. In an addition operation, `VF` is the carry flag,
    /// while in subtraction, it is the "no borrow" flag. In the draw instruction `VF` is set upon
    /// pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(super) index_register: u16,
    /// The program counter is a CPU register in the computer processor which has the address of the
    /// next instruction to be executed from memory.
    pub(super) program_counter: u16,
    /// The stack is only used to store return addresses when subroutines are called. The original
    /// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
    /// `12` levels of nesting; modern implementations usually have more.
    /// (here we are using `16`)
    pub(super) stack: ArrayVec<[u16; cpu::stack::SIZE]>,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    pub(super) delay_timer: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound is made.
    pub(super) sound_timer: Timer,
    /// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
    /// `(64 x 32)`, stored row by row.
    pub(super) display: Vec<bool>,
    /// Is set whenever the display changed and stays set until the consumer clears it.
    pub(super) redraw: bool,
    pub(super) keyboard: Keyboard,
    /// The register that receives the next key press, while the program waits for one.
    pub(super) awaiting_key: Option<usize>,
}

impl Default for ChipSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ChipSet {
    /// will create a new chipset object, with the font loaded and an empty program
    pub fn new() -> Self {
        let mut chip = Self {
            memory: vec![0; memory::SIZE],
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER as u16,
            stack: ArrayVec::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            display: vec![false; display::RESOLUTION],
            redraw: false,
            keyboard: Keyboard::new(),
            awaiting_key: None,
        };
        chip.reset();
        chip
    }

    /// will create a new chipset with the given program loaded
    pub fn with_program(rom: &[u8]) -> Result<Self, ProcessError> {
        let mut chip = Self::new();
        chip.load_program(rom)?;
        Ok(chip)
    }

    /// Will bring the chipset back into the power on state, this
    /// removes the loaded program as well.
    pub fn reset(&mut self) {
        self.memory.fill(0);
        // load fonts
        let font = display::fontset::LOCATION;
        self.memory[font..(font + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        self.registers = [0; cpu::register::SIZE];
        self.index_register = 0;
        self.program_counter = cpu::PROGRAM_COUNTER as u16;
        self.stack.clear();
        self.delay_timer = Timer::default();
        self.sound_timer = Timer::default();
        self.display.fill(false);
        self.redraw = false;
        self.keyboard.reset();
        self.awaiting_key = None;
    }

    /// Will write the program into memory starting at the program counter
    /// start location.
    pub fn load_program(&mut self, rom: &[u8]) -> Result<(), ProcessError> {
        if rom.len() > cpu::MAX_PROGRAM_SIZE {
            return Err(MemoryError::RomTooLarge {
                size: rom.len(),
                max: cpu::MAX_PROGRAM_SIZE,
            }
            .into());
        }
        self.memory[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + rom.len())]
            .copy_from_slice(rom);
        log::debug!("loaded a program of {} bytes", rom.len());
        Ok(())
    }

    /// will get the opcode the program counter points at
    pub fn fetch(&self) -> Result<Opcode, ProcessError> {
        let opcode = opcode::build_opcode(&self.memory, self.program_counter as usize)?;
        Ok(opcode)
    }

    /// Will decode the instruction the program counter points at, without
    /// executing it.
    pub fn current_instruction(&self) -> Result<Instruction, ProcessError> {
        let instruction = Instruction::try_from(self.fetch()?)?;
        Ok(instruction)
    }

    /// Will count both timers down by one, has to be called with 60Hz.
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    /// Will write keyboard data into interncal keyboard representation.
    pub fn set_keyboard(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keyboard.set_mult(keys);
    }

    /// Will set the value of the given key
    pub fn set_key(&mut self, key: usize, to: bool) -> Result<(), ProcessError> {
        self.keyboard.set_key(key, to)
    }

    /// Will toggle the given key
    pub fn toggle_key(&mut self, key: usize) -> Result<(), ProcessError> {
        self.keyboard.toggle_key(key)
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// Returns the register that will receive the next key press, if the
    /// program is waiting for one.
    pub fn is_awaiting_key(&self) -> Option<usize> {
        self.awaiting_key
    }

    /// Will hand the pressed key to a waiting program. Without a pending
    /// wait the key is ignored.
    pub fn resume(&mut self, key: usize) -> Result<(), ProcessError> {
        if key >= keyboard::SIZE {
            return Err(ProcessError::InvalidKey(key));
        }
        if let Some(x) = self.awaiting_key.take() {
            log::debug!("resuming with key {:#X} into V{:X}", key, x);
            self.registers[x] = key as u8;
        }
        Ok(())
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    /// Will return an immutable slice of the current display configuration,
    /// one entry per pixel stored row by row.
    pub fn get_display(&self) -> &[bool] {
        &self.display
    }

    /// Checks if the display changed since the last [`clear_redraw`](ChipSet::clear_redraw).
    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    pub fn clear_redraw(&mut self) {
        self.redraw = false;
    }

    pub fn get_registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn get_index_register(&self) -> u16 {
        self.index_register
    }

    pub fn get_program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn get_stack(&self) -> &[u16] {
        &self.stack
    }

    pub fn get_memory(&self) -> &[u8] {
        &self.memory
    }

    /// Will push the return address to the stack
    pub(super) fn push_stack(&mut self, pointer: u16) -> Result<(), StackError> {
        if self.stack.len() == self.stack.capacity() {
            Err(StackError::Overflow)
        } else {
            log::debug!("push {:#06X} at depth {}", pointer, self.stack.len());
            self.stack.push(pointer);
            Ok(())
        }
    }

    /// Will pop the last return address from the stack
    pub(super) fn pop_stack(&mut self) -> Result<u16, StackError> {
        let pointer = self.stack.pop().ok_or(StackError::Underflow)?;
        log::debug!("pop {:#06X} at depth {}", pointer, self.stack.len());
        Ok(pointer)
    }

    /// Will return `len` bytes of memory starting at `from`.
    pub(super) fn read_memory(&self, from: usize, len: usize) -> Result<&[u8], MemoryError> {
        let range = self.checked_range(from, len)?;
        Ok(&self.memory[range])
    }

    /// Will copy the data into memory starting at `from`, nothing is written
    /// if the data doesn't fit.
    pub(super) fn write_memory(&mut self, from: usize, data: &[u8]) -> Result<(), MemoryError> {
        let range = self.checked_range(from, data.len())?;
        self.memory[range].copy_from_slice(data);
        Ok(())
    }

    fn checked_range(&self, from: usize, len: usize) -> Result<std::ops::Range<usize>, MemoryError> {
        let to = from + len;
        if to > self.memory.len() {
            Err(MemoryError::OutOfBounds {
                address: from.max(self.memory.len()),
                len: self.memory.len(),
            })
        } else {
            Ok(from..to)
        }
    }
}

impl ProgramCounter for ChipSet {
    fn step(&mut self, step: ProgramCounterStep) -> Result<(), ProcessError> {
        let pointer = step.apply(self.program_counter as usize)?;
        self.program_counter = pointer as u16;
        Ok(())
    }
}
