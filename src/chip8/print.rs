//! Human readable dumps of the [`ChipSet`](super::ChipSet), used while
//! debugging programs.

use std::fmt::{self, Write};

use num_traits::Unsigned;
use once_cell::sync::Lazy;

use super::ChipSet;
use crate::definitions::{cpu, memory};

/// The amount of entries printed per row.
const ROW_LEN: usize = 8;

/// The width of a single hex cell, `0x` plus four digits.
const CELL_WIDTH: usize = 6;

/// The bytes shown per row of the memory dump.
const MEMORY_ROW_LEN: usize = ROW_LEN * memory::opcodes::SIZE;

/// Stands in for a run of rows that hold only zeros.
static ZERO_ROW: Lazy<String> = Lazy::new(|| {
    let zero = format!("{:#0width$X}", 0u16, width = CELL_WIDTH);
    // the gap between the outer cells of a full row
    let gap = (CELL_WIDTH + 1) * (ROW_LEN - 2) + 1;
    format!("{}{:^gap$}{}", zero, "...", zero, gap = gap)
});

/// Writes the `0x0000 - 0x0007 :` prefix of a row.
fn label(out: &mut String, from: usize, to: usize) -> fmt::Result {
    write!(
        out,
        "{:#0w$X} - {:#0w$X} :",
        from,
        to,
        w = CELL_WIDTH
    )
}

fn hex<T>(out: &mut String, value: T) -> fmt::Result
where
    T: fmt::UpperHex + Unsigned,
{
    write!(out, "{:#0w$X}", value, w = CELL_WIDTH)
}

/// Writes the data in labeled rows of [`ROW_LEN`] cells, one row per line.
fn rows<T, F>(out: &mut String, data: &[T], mut cell: F) -> fmt::Result
where
    F: FnMut(&mut String, &T) -> fmt::Result,
{
    for (row, chunk) in data.chunks(ROW_LEN).enumerate() {
        let from = row * ROW_LEN;
        label(out, from, from + chunk.len() - 1)?;
        for value in chunk {
            out.push(' ');
            cell(out, value)?;
        }
        let end = out.trim_end_matches(' ').len();
        out.truncate(end);
        out.push('\n');
    }
    Ok(())
}

/// Writes the memory as big endian words, consecutive rows of zeros are
/// folded into a single line.
fn memory_rows(out: &mut String, memory: &[u8]) -> fmt::Result {
    let mut zero_run: Option<usize> = None;

    for (row, chunk) in memory.chunks(MEMORY_ROW_LEN).enumerate() {
        let from = row * MEMORY_ROW_LEN;
        let to = from + chunk.len() - 1;
        let last = to + 1 == memory.len();

        if chunk.iter().all(|&byte| byte == 0) {
            let start = *zero_run.get_or_insert(from);
            if last {
                label(out, start, to)?;
                writeln!(out, " {}", *ZERO_ROW)?;
            }
            continue;
        }

        if let Some(start) = zero_run.take() {
            label(out, start, from - 1)?;
            writeln!(out, " {}", *ZERO_ROW)?;
        }

        label(out, from, to)?;
        for word in chunk.chunks(memory::opcodes::SIZE) {
            out.push(' ');
            let high = word[0];
            let low = word.get(1).copied().unwrap_or_default();
            hex(out, u16::from_be_bytes([high, low]))?;
        }
        out.push('\n');
    }
    Ok(())
}

/// Writes a named block of the dump, every line of the body is indented.
fn section(f: &mut fmt::Formatter<'_>, name: &str, body: &str) -> fmt::Result {
    writeln!(f, "\t{} :", name)?;
    for line in body.lines() {
        writeln!(f, "\t\t{}", line)?;
    }
    Ok(())
}

impl ChipSet {
    /// A compact view of the registers, the timers and the stack depth.
    pub fn summary(&self) -> String {
        let hex = |data: &[u8]| {
            data.iter()
                .map(|value| format!("{:#04X}", value))
                .collect::<Vec<_>>()
                .join(" ")
        };
        let half = cpu::register::SIZE / 2;

        format!(
            "PC {:#06X}  I {:#06X}  DT {:#04X}  ST {:#04X}  SP {}\n\
            V0-V7 : {}\n\
            V8-VF : {}",
            self.program_counter,
            self.index_register,
            self.delay_timer.get_value(),
            self.sound_timer.get_value(),
            self.stack.len(),
            hex(&self.registers[..half]),
            hex(&self.registers[half..]),
        )
    }
}

impl fmt::Display for ChipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let single = |value: u16| -> Result<String, fmt::Error> {
            let mut out = String::with_capacity(CELL_WIDTH);
            hex(&mut out, value)?;
            Ok(out)
        };

        let instruction = match self.current_instruction() {
            Ok(instruction) => instruction.to_string(),
            Err(err) => err.to_string(),
        };

        let mut mem = String::new();
        memory_rows(&mut mem, &self.memory)?;

        let mut keys = String::new();
        rows(&mut keys, self.keyboard.get_keys(), |out, &pressed| {
            write!(out, "{:<w$}", pressed, w = CELL_WIDTH)
        })?;

        // unused stack slots are shown as zero
        let mut slots = [0u16; cpu::stack::SIZE];
        slots[..self.stack.len()].copy_from_slice(&self.stack);
        let mut stack = String::new();
        rows(&mut stack, &slots, |out, &value| hex(out, value))?;

        let mut registers = String::new();
        rows(&mut registers, &self.registers, |out, &value| hex(out, value))?;

        writeln!(f, "Chipset {{")?;
        section(f, "Program Counter", &single(self.program_counter)?)?;
        section(f, "Instruction", &instruction)?;
        section(f, "Index Register", &single(self.index_register)?)?;
        section(f, "Delay Timer", &single(self.delay_timer.get_value() as u16)?)?;
        section(f, "Sound Timer", &single(self.sound_timer.get_value() as u16)?)?;
        section(f, "Memory", &mem)?;
        section(f, "Keyboard", &keys)?;
        section(f, "Stack", &stack)?;
        section(f, "Register", &registers)?;
        write!(f, "}}")
    }
}
