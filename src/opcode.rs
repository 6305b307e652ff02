//! Opcode abstractions, functionality and constants.
use std::{convert::TryFrom, fmt};

use crate::{
    definitions::memory,
    error::{MemoryError, OpcodeError, ProcessError},
};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first twelve bytes
pub(crate) const OPCODE_MASK_FFF0: u16 = OPCODE_MASK_FFFF << 4;

/// the mask for the first eight bytes
pub(crate) const OPCODE_MASK_FF00: u16 = OPCODE_MASK_FFFF << 8;

/// the mask for the first four bytes
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bytes
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FFF0;

/// the mask for the last eight bytes
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_FF00;

/// the mask for the last twelve bytes
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the size of a single byte
const BYTE_SIZE: u16 = 0x8;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given point
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcodes
/// - `pointer` - Where in the data the opcode shall be extracted, so `pointer` and `pointer + 1` make
/// the opcode up
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// # use chip::MemoryError;
///  const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
///  const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
///  for (i, val) in OPCODES.iter().enumerate() {
///      let opcode = build_opcode(&SPLIT_OPCODE, i * 2).expect("This will work.");
///      assert_eq!(opcode, *val);
///  }
/// # let pointer = 3;
/// # assert_eq!(
/// #    Err(MemoryError::OutOfBounds { address: pointer, len: SPLIT_OPCODE.len() }),
/// #    build_opcode(&SPLIT_OPCODE, pointer)
/// # );
/// ```
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, MemoryError> {
    // controlling that there is no illegal access here
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(MemoryError::OutOfBounds {
            address: pointer,
            len: data.len(),
        })
    }
}

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeFields {
    /// the opcode type `T___`, still at its original position
    fn t(&self) -> usize;

    /// the address `_NNN`
    fn nnn(&self) -> usize;

    /// the register index and the constant of `_XKK`
    fn xkk(&self) -> (usize, u8);

    /// the two register indices and the nibble of `_XYN`
    fn xyn(&self) -> (usize, usize, usize);

    /// the two register indices of `_XY_`
    fn xy(&self) -> (usize, usize);

    /// the register index of `_X__`
    fn x(&self) -> usize;
}

impl OpcodeFields for Opcode {
    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1000);
    /// ```
    fn t(&self) -> usize {
        (self & OPCODE_MASK_F000) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.nnn(), 0xEDA)
    /// ```
    fn nnn(&self) -> usize {
        (self & OPCODE_MASK_0FFF) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xkk(), (0xE, 0xDA));
    /// ```
    fn xkk(&self) -> (usize, u8) {
        let x = self.x();
        let kk = (self & OPCODE_MASK_00FF) as u8;
        (x, kk)
    }

    /// # Example
    /// ```rust
    /// # use chip::opcode::*;
    ///  const BASE_OPCODE: Opcode = 0x1EDA;
    ///  assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn xyn(&self) -> (usize, usize, usize) {
        let (x, y) = self.xy();
        let n = (self & OPCODE_MASK_000F) as usize;
        (x, y, n)
    }

    fn xy(&self) -> (usize, usize) {
        let x = self.x();
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        const NIBBLE: u16 = BYTE_SIZE / 2;
        let y = ((self & MASK) >> NIBBLE) as usize;
        (x, y)
    }

    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & OPCODE_MASK_FF00) >> BYTE_SIZE) as usize
    }
}

/// Generates the lookup from a sub opcode (the part of the opcode that
/// distinguishes the instructions sharing the same top nibble) to the operation.
macro_rules! impl_sub_operation {
    ($type_name:ident : $type_from:ty : $( $key:literal => $val:expr ),+ $(,)? ) => {
        impl $type_name {
            /// Will map the sub opcode to the operation, if there is one.
            pub fn from_code(value: $type_from) -> Option<Self> {
                match value {
                    $(
                        $key => Some($val),
                    )+
                    _ => None,
                }
            }
        }
    };
}

/// The register to register operations of the `8XYN` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Load,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubNegated,
    ShiftLeft,
}

impl_sub_operation!(ArithmeticOp : usize :
    // 8XY0
    // Sets VX to the value of VY.
    0x0 => ArithmeticOp::Load,
    // 8XY1
    // Sets VX to VX or VY.
    0x1 => ArithmeticOp::Or,
    // 8XY2
    // Sets VX to VX and VY.
    0x2 => ArithmeticOp::And,
    // 8XY3
    // Sets VX to VX xor VY.
    0x3 => ArithmeticOp::Xor,
    // 8XY4
    // Adds VY to VX. VF is set to 1 when there's a carry, and to 0 when there isn't.
    0x4 => ArithmeticOp::Add,
    // 8XY5
    // VY is subtracted from VX. VF is set to 0 when there's a borrow, and 1 when there
    // isn't.
    0x5 => ArithmeticOp::Sub,
    // 8XY6
    // Stores the least significant bit of VX in VF and then shifts VX to the right by 1.
    0x6 => ArithmeticOp::ShiftRight,
    // 8XY7
    // Sets VX to VY minus VX. VF is set to 0 when there's a borrow, and 1 when there
    // isn't.
    0x7 => ArithmeticOp::SubNegated,
    // 8XYE
    // Stores the most significant bit of VX in VF and then shifts VX to the left by 1.
    0xE => ArithmeticOp::ShiftLeft,
);

/// The keypad operations of the `EXKK` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    Pressed,
    NotPressed,
}

impl_sub_operation!(KeyOp : u8 :
    // EX9E
    // Skips the next instruction if the key stored in VX is pressed.
    0x9E => KeyOp::Pressed,
    // EXA1
    // Skips the next instruction if the key stored in VX isn't pressed.
    0xA1 => KeyOp::NotPressed,
);

/// The timer, keypad and memory operations of the `FXKK` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscOp {
    GetDelayTimer,
    AwaitKeyPress,
    SetDelayTimer,
    SetSoundTimer,
    AddToIndex,
    FontSprite,
    StoreBcd,
    StoreRegisters,
    LoadRegisters,
}

impl_sub_operation!(MiscOp : u8 :
    // FX07
    // Sets VX to the value of the delay timer.
    0x07 => MiscOp::GetDelayTimer,
    // FX0A
    // A key press is awaited, and then stored in VX.
    0x0A => MiscOp::AwaitKeyPress,
    // FX15
    // Sets the delay timer to VX.
    0x15 => MiscOp::SetDelayTimer,
    // FX18
    // Sets the sound timer to VX.
    0x18 => MiscOp::SetSoundTimer,
    // FX1E
    // Adds VX to I. VF is not affected.
    0x1E => MiscOp::AddToIndex,
    // FX29
    // Sets I to the location of the font glyph for the character in VX.
    0x29 => MiscOp::FontSprite,
    // FX33
    // Stores the binary-coded decimal representation of VX at I, I+1 and I+2.
    0x33 => MiscOp::StoreBcd,
    // FX55
    // Stores V0 to VX (including VX) in memory starting at address I.
    0x55 => MiscOp::StoreRegisters,
    // FX65
    // Fills V0 to VX (including VX) with values from memory starting at address I.
    0x65 => MiscOp::LoadRegisters,
);

/// A decoded instruction, all operands are already extracted from the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`
    Clear,
    /// `00EE`
    Return,
    /// `0NNN`
    System { nnn: usize },
    /// `1NNN`
    Jump { nnn: usize },
    /// `2NNN`
    Call { nnn: usize },
    /// `3XKK`
    SkipEqual { x: usize, kk: u8 },
    /// `4XKK`
    SkipNotEqual { x: usize, kk: u8 },
    /// `5XY0`
    SkipRegisterEqual { x: usize, y: usize },
    /// `6XKK`
    Load { x: usize, kk: u8 },
    /// `7XKK`
    Add { x: usize, kk: u8 },
    /// `8XYN`
    Arithmetic { op: ArithmeticOp, x: usize, y: usize },
    /// `9XY0`
    SkipRegisterNotEqual { x: usize, y: usize },
    /// `ANNN`
    LoadIndex { nnn: usize },
    /// `BNNN`
    JumpOffset { nnn: usize },
    /// `CXKK`
    Random { x: usize, kk: u8 },
    /// `DXYN`
    Draw { x: usize, y: usize, n: usize },
    /// `EXKK`
    Key { op: KeyOp, x: usize },
    /// `FXKK`
    Misc { op: MiscOp, x: usize },
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        // Shifting t here so that match can use a lookuptable instead of 'if else' - blocks
        const SHIFT: usize = 4 * 3;
        let err = || OpcodeError::InvalidOpcode(value);

        let nnn = value.nnn();
        let (x, kk) = value.xkk();
        let (_, y, n) = value.xyn();

        let res = match value.t() >> SHIFT {
            0x0 => match value {
                0x00E0 => Instruction::Clear,
                0x00EE => Instruction::Return,
                _ => Instruction::System { nnn },
            },
            0x1 => Instruction::Jump { nnn },
            0x2 => Instruction::Call { nnn },
            0x3 => Instruction::SkipEqual { x, kk },
            0x4 => Instruction::SkipNotEqual { x, kk },
            0x5 if n == 0 => Instruction::SkipRegisterEqual { x, y },
            0x6 => Instruction::Load { x, kk },
            0x7 => Instruction::Add { x, kk },
            0x8 => Instruction::Arithmetic {
                op: ArithmeticOp::from_code(n).ok_or_else(err)?,
                x,
                y,
            },
            0x9 if n == 0 => Instruction::SkipRegisterNotEqual { x, y },
            0xA => Instruction::LoadIndex { nnn },
            0xB => Instruction::JumpOffset { nnn },
            0xC => Instruction::Random { x, kk },
            0xD => Instruction::Draw { x, y, n },
            0xE => Instruction::Key {
                op: KeyOp::from_code(kk).ok_or_else(err)?,
                x,
            },
            0xF => Instruction::Misc {
                op: MiscOp::from_code(kk).ok_or_else(err)?,
                x,
            },
            _ => return Err(err()),
        };
        Ok(res)
    }
}

/// Will decode the opcode into its instruction.
///
/// # Example
/// ```rust
/// # use chip::opcode::*;
/// assert_eq!(decode(0x6A05), Ok(Instruction::Load { x: 0xA, kk: 0x05 }));
/// assert!(decode(0x5121).is_err());
/// ```
pub fn decode(opcode: Opcode) -> Result<Instruction, OpcodeError> {
    Instruction::try_from(opcode)
}

/// Prints the instruction in the conventional assembler syntax.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Clear => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::System { nnn } => write!(f, "SYS {:#05X}", nnn),
            Instruction::Jump { nnn } => write!(f, "JP {:#05X}", nnn),
            Instruction::Call { nnn } => write!(f, "CALL {:#05X}", nnn),
            Instruction::SkipEqual { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            Instruction::SkipNotEqual { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            Instruction::SkipRegisterEqual { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::Load { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            Instruction::Add { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            Instruction::Arithmetic { op, x, y } => match op {
                ArithmeticOp::Load => write!(f, "LD V{:X}, V{:X}", x, y),
                ArithmeticOp::Or => write!(f, "OR V{:X}, V{:X}", x, y),
                ArithmeticOp::And => write!(f, "AND V{:X}, V{:X}", x, y),
                ArithmeticOp::Xor => write!(f, "XOR V{:X}, V{:X}", x, y),
                ArithmeticOp::Add => write!(f, "ADD V{:X}, V{:X}", x, y),
                ArithmeticOp::Sub => write!(f, "SUB V{:X}, V{:X}", x, y),
                ArithmeticOp::ShiftRight => write!(f, "SHR V{:X}", x),
                ArithmeticOp::SubNegated => write!(f, "SUBN V{:X}, V{:X}", x, y),
                ArithmeticOp::ShiftLeft => write!(f, "SHL V{:X}", x),
            },
            Instruction::SkipRegisterNotEqual { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::LoadIndex { nnn } => write!(f, "LD I, {:#05X}", nnn),
            Instruction::JumpOffset { nnn } => write!(f, "JP V0, {:#05X}", nnn),
            Instruction::Random { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:#X}", x, y, n),
            Instruction::Key { op, x } => match op {
                KeyOp::Pressed => write!(f, "SKP V{:X}", x),
                KeyOp::NotPressed => write!(f, "SKNP V{:X}", x),
            },
            Instruction::Misc { op, x } => match op {
                MiscOp::GetDelayTimer => write!(f, "LD V{:X}, DT", x),
                MiscOp::AwaitKeyPress => write!(f, "LD V{:X}, K", x),
                MiscOp::SetDelayTimer => write!(f, "LD DT, V{:X}", x),
                MiscOp::SetSoundTimer => write!(f, "LD ST, V{:X}", x),
                MiscOp::AddToIndex => write!(f, "ADD I, V{:X}", x),
                MiscOp::FontSprite => write!(f, "LD F, V{:X}", x),
                MiscOp::StoreBcd => write!(f, "LD B, V{:X}", x),
                MiscOp::StoreRegisters => write!(f, "LD [I], V{:X}", x),
                MiscOp::LoadRegisters => write!(f, "LD V{:X}, [I]", x),
            },
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents the program steps that the chip
/// can take.
pub enum ProgramCounterStep {
    /// Will not change the program counter
    None,
    /// Will increment the program counter by one opcode
    Next,
    /// Will increment the program counter by two opcodes
    Skip,
    /// Will simply move the program counter to the given location.
    Jump(usize),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Will calculate the program counter following `pointer`.
    ///
    /// Jumps outside of the memory fail, forward steps are only
    /// checked by the next fetch.
    ///
    /// # Example
    /// ```rust
    /// # use chip::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next.apply(0x200), Ok(0x202));
    /// assert_eq!(ProgramCounterStep::Skip.apply(0x200), Ok(0x204));
    /// assert_eq!(ProgramCounterStep::Jump(0x300).apply(0x200), Ok(0x300));
    /// assert!(ProgramCounterStep::Jump(0x1000).apply(0x200).is_err());
    /// ```
    #[inline]
    pub fn apply(&self, pointer: usize) -> Result<usize, MemoryError> {
        match *self {
            ProgramCounterStep::None => Ok(pointer),
            ProgramCounterStep::Next => Ok(pointer + memory::opcodes::SIZE),
            ProgramCounterStep::Skip => Ok(pointer + 2 * memory::opcodes::SIZE),
            ProgramCounterStep::Jump(address) if address < memory::SIZE => Ok(address),
            ProgramCounterStep::Jump(address) => Err(MemoryError::OutOfBounds {
                address,
                len: memory::SIZE,
            }),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents a command from the interpreter up to the driver.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// The interpreter is halted until a key is handed
    /// to [`ChipSet::resume`](crate::chip8::ChipSet::resume).
    Wait,
    /// The framebuffer was changed.
    Draw,
}

/// Represents a step of the program counter
/// this requires the enum ProgramCounterStep
/// to work.
pub trait ProgramCounter {
    /// will move the program counter by a step.
    fn step(&mut self, step: ProgramCounterStep) -> Result<(), ProcessError>;
}

/// These are the traits that have to be full filled for a working opcode
/// table.
///
/// Every handler validates its operands before it mutates any state, so a
/// failing instruction leaves the machine as it was. The program counter is
/// only moved by [`calc`](ChipOpcodes::calc) once the handler succeeded.
pub trait ChipOpcodes: ProgramCounter {
    /// will execute a single decoded instruction
    fn calc(&mut self, instruction: &Instruction) -> Result<Operation, ProcessError> {
        let mut operation = Operation::None;
        let step_op = |(step, op): (ProgramCounterStep, Operation)| {
            operation = op;
            step
        };

        let step = match *instruction {
            Instruction::Clear => self.clear().map(step_op),
            Instruction::Return => self.ret(),
            Instruction::System { nnn } => self.system(nnn),
            Instruction::Jump { nnn } => self.jump(nnn),
            Instruction::Call { nnn } => self.call(nnn),
            Instruction::SkipEqual { x, kk } => self.skip_equal(x, kk),
            Instruction::SkipNotEqual { x, kk } => self.skip_not_equal(x, kk),
            Instruction::SkipRegisterEqual { x, y } => self.skip_register_equal(x, y),
            Instruction::Load { x, kk } => self.load(x, kk),
            Instruction::Add { x, kk } => self.add(x, kk),
            Instruction::Arithmetic { op, x, y } => self.arithmetic(op, x, y),
            Instruction::SkipRegisterNotEqual { x, y } => self.skip_register_not_equal(x, y),
            Instruction::LoadIndex { nnn } => self.load_index(nnn),
            Instruction::JumpOffset { nnn } => self.jump_offset(nnn),
            Instruction::Random { x, kk } => self.random(x, kk),
            Instruction::Draw { x, y, n } => self.draw(x, y, n).map(step_op),
            Instruction::Key { op, x } => self.key(op, x),
            Instruction::Misc { op, x } => self.misc(op, x).map(step_op),
        }?;

        self.step(step)?;
        Ok(operation)
    }

    /// - `00E0` - Display  - `disp_clear()`        - Clears the screen.
    fn clear(&mut self) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `00EE` - Flow     - `return;`             - Returns from a subroutine.
    fn ret(&mut self) -> Result<ProgramCounterStep, ProcessError>;

    /// - `0NNN` - Call     -                       - Calls machine code routine ([RCA 1802](https://en.wikipedia.org/wiki/RCA_1802) for COSMAC VIP) at address `NNN`. Ignored.
    fn system(&self, nnn: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `1NNN` - Flow     - `goto NNN;`           - Jumps to address `NNN`.
    fn jump(&self, nnn: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `2NNN` - Flow     - `*(0xNNN)()`          - Calls subroutine at `NNN`.
    fn call(&mut self, nnn: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `3XKK` - Cond     - `if(Vx==KK)`          - Skips the next instruction if `VX` equals `KK`.
    fn skip_equal(&self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `4XKK` - Cond     - `if(Vx!=KK)`          - Skips the next instruction if `VX` doesn't equal `KK`.
    fn skip_not_equal(&self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `5XY0` - Cond     - `if(Vx==Vy)`          - Skips the next instruction if `VX` equals `VY`.
    fn skip_register_equal(&self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `6XKK` - Const    - `Vx = KK`             - Sets `VX` to `KK`.
    fn load(&mut self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `7XKK` - Const    - `Vx += KK`            - Adds `KK` to `VX`. (Carry flag is not changed)
    fn add(&mut self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// A mutiuse opcode base for type `8XYN`
    ///
    /// - `8XY0` - Assign   - `Vx=Vy`               - Sets `VX` to the value of `VY`.
    /// - `8XY1` - BitOp    - `Vx=Vx|Vy`            - Sets `VX` to `VX` or `VY`.
    /// - `8XY2` - BitOp    - `Vx=Vx&Vy`            - Sets `VX` to `VX` and `VY`.
    /// - `8XY3` - BitOp    - `Vx=Vx^Vy`            - Sets `VX` to `VX` xor `VY`.
    /// - `8XY4` - Math     - `Vx += Vy`            - Adds `VY` to `VX`. `VF` is set to `1` when there's a carry, and to `0` when there isn't.
    /// - `8XY5` - Math     - `Vx -= Vy`            - `VY` is subtracted from `VX`. `VF` is set to `0` when there's a borrow, and `1` when there isn't.
    /// - `8XY6` - BitOp    - `Vx>>=1`              - Stores the least significant bit of `VX` in `VF` and then shifts `VX` to the right by `1`.
    /// - `8XY7` - Math     - `Vx=Vy-Vx`            - Sets `VX` to `VY` minus `VX`. `VF` is set to `0` when there's a borrow, and `1` when there isn't.
    /// - `8XYE` - BitOp    - `Vx<<=1`              - Stores the most significant bit of `VX` in `VF` and then shifts `VX` to the left by `1`.
    fn arithmetic(
        &mut self,
        op: ArithmeticOp,
        x: usize,
        y: usize,
    ) -> Result<ProgramCounterStep, ProcessError>;

    /// - `9XY0` - Cond     - `if(Vx!=Vy)`          - Skips the next instruction if `VX` doesn't equal `VY`.
    fn skip_register_not_equal(
        &self,
        x: usize,
        y: usize,
    ) -> Result<ProgramCounterStep, ProcessError>;

    /// - `ANNN` - MEM      - `I = NNN`             - Sets `I` to the address `NNN`.
    fn load_index(&mut self, nnn: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `BNNN` - Flow     - `PC=V0+NNN`           - Jumps to the address `NNN` plus `V0`.
    fn jump_offset(&self, nnn: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// - `CXKK` - Rand     - `Vx=rand()&KK`        - Sets `VX` to the result of a bitwise and operation on a random number and `KK`.
    fn random(&mut self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError>;

    /// - `DXYN` - Disp     - `draw(Vx,Vy,N)`       - Draws a sprite at coordinate `(VX, VY)` that has a width of `8` pixels and a height of `N` pixels. Each row of `8` pixels is read as bit-coded starting from memory location `I`; `I` value doesn’t change after the execution of this instruction. `VF` is set to `1` if any screen pixels are flipped from set to unset when the sprite is drawn, and to `0` if that doesn’t happen.
    fn draw(
        &mut self,
        x: usize,
        y: usize,
        n: usize,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `EX9E` - KeyOp    - `if(key()==Vx)`       - Skips the next instruction if the key stored in `VX` is pressed.
    /// - `EXA1` - KeyOp    - `if(key()!=Vx)`       - Skips the next instruction if the key stored in `VX` isn't pressed.
    fn key(&self, op: KeyOp, x: usize) -> Result<ProgramCounterStep, ProcessError>;

    /// A multiuse opcode base for type `FXKK`
    ///
    /// - `FX07` - Timer    - `Vx = get_delay()`    - Sets `VX` to the value of the delay timer.
    /// - `FX0A` - KeyOp    - `Vx = get_key()`      - A key press is awaited, and then stored in `VX`.
    /// - `FX15` - Timer    - `delay_timer(Vx)`     - Sets the delay timer to `VX`.
    /// - `FX18` - Sound    - `sound_timer(Vx)`     - Sets the sound timer to `VX`.
    /// - `FX1E` - MEM      - `I +=Vx`              - Adds `VX` to `I`. `VF` is not affected.
    /// - `FX29` - MEM      - `I=sprite_addr[Vx]`   - Sets `I` to the location of the glyph for the character in `VX`.
    /// - `FX33` - BCD      - `246 / 100 => 2` `246 / 10 => 24 % 10 => 4` `246 % 10 => 6` - Stores the [binary-coded decimal](https://en.wikipedia.org/wiki/Binary-coded_decimal) representation of `VX` at `I`, `I+1` and `I+2`.
    /// - `FX55` - MEM      - `reg_dump(Vx,&I)`     - Stores `V0` to `VX` (including `VX`) in memory starting at address `I`. `I` itself is left unmodified.
    /// - `FX65` - MEM      - `reg_load(Vx,&I)`     - Fills `V0` to `VX` (including `VX`) with values from memory starting at address `I`. `I` itself is left unmodified.
    fn misc(&mut self, op: MiscOp, x: usize)
        -> Result<(ProgramCounterStep, Operation), ProcessError>;
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;

    #[test]
    fn test_tryfrom_opcode_simple() {
        let value: Opcode = 0x00E0;
        let conv = value.try_into();
        assert_eq!(conv, Ok(Instruction::Clear));
    }

    #[test]
    fn test_tryfrom_opcode_simple_fail() {
        let value: Opcode = 0x5121;
        let conv: Result<Instruction, _> = value.try_into();
        assert_eq!(conv, Err(OpcodeError::InvalidOpcode(value)));
    }

    #[test]
    fn test_tryfrom_opcode_multiple() {
        let tests = [
            // Zero
            (0x00E0, Ok(Instruction::Clear)),
            (0x00EE, Ok(Instruction::Return)),
            (0x00E1, Ok(Instruction::System { nnn: 0x0E1 })),
            (0x0123, Ok(Instruction::System { nnn: 0x123 })),
            // One
            (0x1919, Ok(Instruction::Jump { nnn: 0x919 })),
            // Two
            (0x2222, Ok(Instruction::Call { nnn: 0x222 })),
            // Three
            (0x3123, Ok(Instruction::SkipEqual { x: 0x1, kk: 0x23 })),
            // Four
            (0x4123, Ok(Instruction::SkipNotEqual { x: 0x1, kk: 0x23 })),
            // Five
            (0x5120, Ok(Instruction::SkipRegisterEqual { x: 0x1, y: 0x2 })),
            (0x5121, Err(())),
            // Six
            (0x6123, Ok(Instruction::Load { x: 0x1, kk: 0x23 })),
            // Seven
            (0x7123, Ok(Instruction::Add { x: 0x1, kk: 0x23 })),
            // Eight
            (
                0x8120,
                Ok(Instruction::Arithmetic {
                    op: ArithmeticOp::Load,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8121,
                Ok(Instruction::Arithmetic {
                    op: ArithmeticOp::Or,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8122,
                Ok(Instruction::Arithmetic {
                    op: ArithmeticOp::And,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8123,
                Ok(Instruction::Arithmetic {
                    op: ArithmeticOp::Xor,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8124,
                Ok(Instruction::Arithmetic {
                    op: ArithmeticOp::Add,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8125,
                Ok(Instruction::Arithmetic {
                    op: ArithmeticOp::Sub,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8126,
                Ok(Instruction::Arithmetic {
                    op: ArithmeticOp::ShiftRight,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x8127,
                Ok(Instruction::Arithmetic {
                    op: ArithmeticOp::SubNegated,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (
                0x812E,
                Ok(Instruction::Arithmetic {
                    op: ArithmeticOp::ShiftLeft,
                    x: 0x1,
                    y: 0x2,
                }),
            ),
            (0x8128, Err(())),
            (0x812F, Err(())),
            // Nine
            (0x9120, Ok(Instruction::SkipRegisterNotEqual { x: 0x1, y: 0x2 })),
            (0x9121, Err(())),
            // A
            (0xA222, Ok(Instruction::LoadIndex { nnn: 0x222 })),
            // B
            (0xB222, Ok(Instruction::JumpOffset { nnn: 0x222 })),
            // C
            (0xC123, Ok(Instruction::Random { x: 0x1, kk: 0x23 })),
            // D
            (
                0xD123,
                Ok(Instruction::Draw {
                    x: 0x1,
                    y: 0x2,
                    n: 0x3,
                }),
            ),
            // E
            (
                0xE19E,
                Ok(Instruction::Key {
                    op: KeyOp::Pressed,
                    x: 0x1,
                }),
            ),
            (
                0xE1A1,
                Ok(Instruction::Key {
                    op: KeyOp::NotPressed,
                    x: 0x1,
                }),
            ),
            (0xE111, Err(())),
            // F
            (
                0xF007,
                Ok(Instruction::Misc {
                    op: MiscOp::GetDelayTimer,
                    x: 0x0,
                }),
            ),
            (
                0xF00A,
                Ok(Instruction::Misc {
                    op: MiscOp::AwaitKeyPress,
                    x: 0x0,
                }),
            ),
            (
                0xF015,
                Ok(Instruction::Misc {
                    op: MiscOp::SetDelayTimer,
                    x: 0x0,
                }),
            ),
            (
                0xF018,
                Ok(Instruction::Misc {
                    op: MiscOp::SetSoundTimer,
                    x: 0x0,
                }),
            ),
            (
                0xF01E,
                Ok(Instruction::Misc {
                    op: MiscOp::AddToIndex,
                    x: 0x0,
                }),
            ),
            (
                0xF029,
                Ok(Instruction::Misc {
                    op: MiscOp::FontSprite,
                    x: 0x0,
                }),
            ),
            (
                0xF033,
                Ok(Instruction::Misc {
                    op: MiscOp::StoreBcd,
                    x: 0x0,
                }),
            ),
            (
                0xF055,
                Ok(Instruction::Misc {
                    op: MiscOp::StoreRegisters,
                    x: 0x0,
                }),
            ),
            (
                0xF065,
                Ok(Instruction::Misc {
                    op: MiscOp::LoadRegisters,
                    x: 0x0,
                }),
            ),
            (0xF0AA, Err(())),
        ];
        for (value, res) in tests {
            let conv: Result<Instruction, _> = value.try_into();
            assert_eq!(conv, res.map_err(|_| OpcodeError::InvalidOpcode(value)));
        }
    }

    #[test]
    /// the decoding only depends on the two bytes
    fn test_decode_is_pure() {
        let memory = [0xD0, 0x15, 0xD0, 0x15];
        let first = build_opcode(&memory, 0).map(decode);
        let second = build_opcode(&memory, 2).map(decode);
        assert_eq!(first, second);
        assert_eq!(
            first,
            Ok(Ok(Instruction::Draw {
                x: 0x0,
                y: 0x1,
                n: 0x5
            }))
        );
    }

    #[test]
    fn test_build_opcode_end_of_memory() {
        let memory = [0u8; memory::SIZE];
        assert_eq!(build_opcode(&memory, memory::SIZE - 2), Ok(0));
        assert_eq!(
            build_opcode(&memory, memory::SIZE - 1),
            Err(MemoryError::OutOfBounds {
                address: memory::SIZE - 1,
                len: memory::SIZE
            })
        );
    }

    #[test]
    fn test_disassembly() {
        let tests: [(Opcode, &str); 35] = [
            (0x00E0, "CLS"),
            (0x00EE, "RET"),
            (0x0123, "SYS 0x123"),
            (0x1200, "JP 0x200"),
            (0x2ABC, "CALL 0xABC"),
            (0x3A05, "SE VA, 0x05"),
            (0x4BFF, "SNE VB, 0xFF"),
            (0x5120, "SE V1, V2"),
            (0x6A05, "LD VA, 0x05"),
            (0x7001, "ADD V0, 0x01"),
            (0x8120, "LD V1, V2"),
            (0x8121, "OR V1, V2"),
            (0x8122, "AND V1, V2"),
            (0x8123, "XOR V1, V2"),
            (0x8124, "ADD V1, V2"),
            (0x8125, "SUB V1, V2"),
            (0x8126, "SHR V1"),
            (0x8127, "SUBN V1, V2"),
            (0x812E, "SHL V1"),
            (0x9120, "SNE V1, V2"),
            (0xA2E8, "LD I, 0x2E8"),
            (0xB300, "JP V0, 0x300"),
            (0xCD0F, "RND VD, 0x0F"),
            (0xD235, "DRW V2, V3, 0x5"),
            (0xED9E, "SKP VD"),
            (0xEDA1, "SKNP VD"),
            (0xF107, "LD V1, DT"),
            (0xF20A, "LD V2, K"),
            (0xF315, "LD DT, V3"),
            (0xF418, "LD ST, V4"),
            (0xF51E, "ADD I, V5"),
            (0xF629, "LD F, V6"),
            (0xF733, "LD B, V7"),
            (0xF855, "LD [I], V8"),
            (0xF965, "LD V9, [I]"),
        ];

        for (opcode, expected) in tests {
            let instruction = decode(opcode).expect("every listed opcode is valid");
            assert_eq!(expected, instruction.to_string());
        }
    }

    #[test]
    fn test_step() {
        let pc = 0x200;
        assert_eq!(ProgramCounterStep::None.apply(pc), Ok(pc));
        assert_eq!(ProgramCounterStep::Next.apply(pc), Ok(pc + 2));
        assert_eq!(ProgramCounterStep::Skip.apply(pc), Ok(pc + 4));
        assert_eq!(ProgramCounterStep::Jump(0xFFF).apply(pc), Ok(0xFFF));
        assert_eq!(
            ProgramCounterStep::Jump(memory::SIZE).apply(pc),
            Err(MemoryError::OutOfBounds {
                address: memory::SIZE,
                len: memory::SIZE
            })
        );
    }
}
