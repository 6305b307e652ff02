use std::convert::TryFrom;

use rand::{rngs::StdRng, RngCore, SeedableRng};

use super::ChipSet;
use crate::{
    error::ProcessError,
    opcode::{ChipOpcodes, Instruction, Operation, ProgramCounter, ProgramCounterStep},
};

/// Executes the program stored in a [`ChipSet`], one instruction per
/// [`step`](Interpreter::step).
///
/// The interpreter only owns the random number generator used by `CXKK`,
/// the state it works on is borrowed for the duration of a single step.
#[derive(Debug, Clone)]
pub struct Interpreter<R: RngCore = StdRng> {
    rng: R,
}

impl Default for Interpreter<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter<StdRng> {
    /// will create a new interpreter seeded from the operating system
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: RngCore> Interpreter<R> {
    /// will create a new interpreter with the given random number generator,
    /// a fixed generator makes the execution deterministic.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// will advance the program by a single instruction
    ///
    /// While the program waits for a key press nothing is executed and
    /// [`Operation::Wait`] is returned, [`ChipSet::resume`] ends the wait.
    /// On error the chipset is left as it was before the call.
    pub fn step(&mut self, chip: &mut ChipSet) -> Result<Operation, ProcessError> {
        if chip.is_awaiting_key().is_some() {
            return Ok(Operation::Wait);
        }

        let opcode = chip.fetch()?;
        let instruction = Instruction::try_from(opcode)?;
        log::trace!(
            "{:#06X}: {:#06X} {}",
            chip.program_counter,
            opcode,
            instruction
        );

        Cycle {
            chip,
            rng: &mut self.rng,
        }
        .calc(&instruction)
    }
}

/// Everything a single instruction can touch.
pub(super) struct Cycle<'a, R> {
    pub(super) chip: &'a mut ChipSet,
    pub(super) rng: &'a mut R,
}

impl<R> ProgramCounter for Cycle<'_, R> {
    fn step(&mut self, step: ProgramCounterStep) -> Result<(), ProcessError> {
        self.chip.step(step)
    }
}
