use rand::RngCore;

use super::interpreter::Cycle;
use crate::{
    definitions::{cpu, display, memory},
    error::{MemoryError, OpcodeError, ProcessError},
    opcode::{ArithmeticOp, ChipOpcodes, KeyOp, MiscOp, Operation, ProgramCounterStep},
};

impl<R: RngCore> ChipOpcodes for Cycle<'_, R> {
    fn clear(&mut self) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        // 00E0
        // clear display
        self.chip.display.fill(false);
        self.chip.redraw = true;
        Ok((ProgramCounterStep::Next, Operation::Draw))
    }

    fn ret(&mut self) -> Result<ProgramCounterStep, ProcessError> {
        // 00EE
        // Return from sub routine => pop from stack
        let pc = self.chip.pop_stack()?;
        Ok(ProgramCounterStep::Jump(pc as usize))
    }

    fn system(&self, nnn: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 0NNN
        // Machine code routines are not supported, the call is skipped.
        log::debug!("ignoring machine code call to {:#05X}", nnn);
        Ok(ProgramCounterStep::Next)
    }

    fn jump(&self, nnn: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 1NNN
        // Jumps to address NNN.
        Ok(ProgramCounterStep::Jump(nnn))
    }

    fn call(&mut self, nnn: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 2NNN
        // Calls subroutine at NNN
        // and set's the program counter to the next opcode after the given stack push
        let next = ProgramCounterStep::Next.apply(self.chip.program_counter as usize)?;
        if next >= memory::SIZE {
            return Err(MemoryError::OutOfBounds {
                address: next,
                len: memory::SIZE,
            }
            .into());
        }
        self.chip.push_stack(next as u16)?;
        Ok(ProgramCounterStep::Jump(nnn))
    }

    fn skip_equal(&self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 3XKK
        // Skips the next instruction if VX equals KK.
        Ok(ProgramCounterStep::cond(self.chip.registers[x] == kk))
    }

    fn skip_not_equal(&self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 4XKK
        // Skips the next instruction if VX doesn't equal KK.
        Ok(ProgramCounterStep::cond(self.chip.registers[x] != kk))
    }

    fn skip_register_equal(&self, x: usize, y: usize) -> Result<ProgramCounterStep, ProcessError> {
        // 5XY0
        // Skips the next instruction if VX equals VY.
        Ok(ProgramCounterStep::cond(
            self.chip.registers[x] == self.chip.registers[y],
        ))
    }

    fn load(&mut self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 6XKK
        // Sets VX to KK.
        self.chip.registers[x] = kk;
        Ok(ProgramCounterStep::Next)
    }

    fn add(&mut self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError> {
        // 7XKK
        // Adds KK to VX. (Carry flag is not changed)
        self.chip.registers[x] = self.chip.registers[x].wrapping_add(kk);
        Ok(ProgramCounterStep::Next)
    }

    fn arithmetic(
        &mut self,
        op: ArithmeticOp,
        x: usize,
        y: usize,
    ) -> Result<ProgramCounterStep, ProcessError> {
        let vx = self.chip.registers[x];
        let vy = self.chip.registers[y];

        // the flag is only written after the result, as VF may be the
        // target register itself
        let (result, flag) = match op {
            ArithmeticOp::Load => (vy, None),
            ArithmeticOp::Or => (vx | vy, None),
            ArithmeticOp::And => (vx & vy, None),
            ArithmeticOp::Xor => (vx ^ vy, None),
            ArithmeticOp::Add => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry as u8))
            }
            // VF holds NOT borrow
            ArithmeticOp::Sub => (vx.wrapping_sub(vy), Some((vx >= vy) as u8)),
            ArithmeticOp::ShiftRight => (vx >> 1, Some(vx & 0x01)),
            ArithmeticOp::SubNegated => (vy.wrapping_sub(vx), Some((vy >= vx) as u8)),
            ArithmeticOp::ShiftLeft => {
                const SHIFT_SIGNIFICANT: u8 = 7;
                (vx << 1, Some(vx >> SHIFT_SIGNIFICANT))
            }
        };

        self.chip.registers[x] = result;
        if let Some(flag) = flag {
            self.chip.registers[cpu::register::LAST] = flag;
        }
        Ok(ProgramCounterStep::Next)
    }

    fn skip_register_not_equal(
        &self,
        x: usize,
        y: usize,
    ) -> Result<ProgramCounterStep, ProcessError> {
        // 9XY0
        // Skips the next instruction if VX doesn't equal VY.
        Ok(ProgramCounterStep::cond(
            self.chip.registers[x] != self.chip.registers[y],
        ))
    }

    fn load_index(&mut self, nnn: usize) -> Result<ProgramCounterStep, ProcessError> {
        // ANNN
        // Sets I to the address NNN.
        self.chip.index_register = nnn as u16;
        Ok(ProgramCounterStep::Next)
    }

    fn jump_offset(&self, nnn: usize) -> Result<ProgramCounterStep, ProcessError> {
        // BNNN
        // Jumps to the address NNN plus V0.
        let v0 = self.chip.registers[0] as usize;
        Ok(ProgramCounterStep::Jump(v0 + nnn))
    }

    fn random(&mut self, x: usize, kk: u8) -> Result<ProgramCounterStep, ProcessError> {
        // CXKK
        // Sets VX to the result of a bitwise and operation on a random number (Typically: 0 to 255)
        // and KK.

        // using a fill bytes call here, as the trait RngCore does not
        // support random u8.
        let mut rand = [0u8; 1];
        self.rng.fill_bytes(&mut rand);
        self.chip.registers[x] = kk & rand[0];
        Ok(ProgramCounterStep::Next)
    }

    fn draw(
        &mut self,
        x: usize,
        y: usize,
        n: usize,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        // DXYN
        // Draws a sprite at coordinate (VX, VY) that has a width of 8 pixels and a height of N
        // pixels. Each row of 8 pixels is read as bit-coded starting from memory location I; I
        // value doesn’t change after the execution of this instruction. VF is set to 1 if any
        // screen pixels are flipped from set to unset when the sprite is drawn, and to 0 if that
        // doesn’t happen. Pixels leaving the screen wrap around to the other side.

        // the sprite is read before anything is drawn, so a sprite reaching
        // past the memory leaves the display untouched
        let mut sprite = [0u8; 0xF];
        sprite[..n].copy_from_slice(
            self.chip
                .read_memory(self.chip.index_register as usize, n)?,
        );

        let origin_x = self.chip.registers[x] as usize;
        let origin_y = self.chip.registers[y] as usize;
        let mut collision = false;

        for (dy, row) in sprite[..n].iter().enumerate() {
            let py = (origin_y + dy) % display::HEIGHT;

            for dx in 0..display::SPRITE_WIDTH {
                // the most significant bit is the left most pixel
                if row & (0x80 >> dx) == 0 {
                    continue;
                }

                let px = (origin_x + dx) % display::WIDTH;
                let pixel = &mut self.chip.display[py * display::WIDTH + px];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }

        self.chip.redraw = true;
        self.chip.registers[cpu::register::LAST] = collision as u8;

        Ok((ProgramCounterStep::Next, Operation::Draw))
    }

    fn key(&self, op: KeyOp, x: usize) -> Result<ProgramCounterStep, ProcessError> {
        let pressed = self
            .chip
            .keyboard
            .is_pressed(self.chip.registers[x] as usize)?;

        let step = match op {
            // EX9E
            // Skips the next instruction if the key stored in VX is pressed.
            KeyOp::Pressed => ProgramCounterStep::cond(pressed),
            // EXA1
            // Skips the next instruction if the key stored in VX isn't pressed.
            KeyOp::NotPressed => ProgramCounterStep::cond(!pressed),
        };
        Ok(step)
    }

    fn misc(
        &mut self,
        op: MiscOp,
        x: usize,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        let vx = self.chip.registers[x];
        let index = self.chip.index_register as usize;
        let mut operation = Operation::None;

        match op {
            MiscOp::GetDelayTimer => {
                self.chip.registers[x] = self.chip.delay_timer.get_value();
            }
            MiscOp::AwaitKeyPress => {
                // The program continues after the wait, the key is
                // written by ChipSet::resume.
                log::debug!("waiting for a key press into V{:X}", x);
                self.chip.awaiting_key = Some(x);
                operation = Operation::Wait;
            }
            MiscOp::SetDelayTimer => {
                self.chip.delay_timer.set_value(vx);
            }
            MiscOp::SetSoundTimer => {
                self.chip.sound_timer.set_value(vx);
            }
            MiscOp::AddToIndex => {
                self.chip.index_register = self.chip.index_register.wrapping_add(vx as u16);
            }
            MiscOp::FontSprite => {
                if vx > 0xF {
                    return Err(OpcodeError::InvalidDigit(vx).into());
                }
                let glyph = display::fontset::LOCATION + display::fontset::GLYPH_SIZE * vx as usize;
                self.chip.index_register = glyph as u16;
            }
            MiscOp::StoreBcd => {
                // 246u8 / 100 => 2
                // 246u8 / 10 => 24 % 10 => 4
                // 246u8 % 10 => 6
                self.chip
                    .write_memory(index, &[vx / 100, vx / 10 % 10, vx % 10])?;
            }
            MiscOp::StoreRegisters => {
                let registers = self.chip.registers;
                self.chip.write_memory(index, &registers[..=x])?;
            }
            MiscOp::LoadRegisters => {
                let mut buffer = [0u8; cpu::register::SIZE];
                buffer[..=x].copy_from_slice(self.chip.read_memory(index, x + 1)?);
                self.chip.registers[..=x].copy_from_slice(&buffer[..=x]);
            }
        }
        Ok((ProgramCounterStep::Next, operation))
    }
}
