//! The constants of the virtual machine.

pub mod memory {
    /// Bytes of addressable ram, `0x000-0xFFF`.
    pub const SIZE: usize = 0x1000;

    pub mod opcodes {
        /// Every instruction is two bytes wide, big endian.
        pub const SIZE: usize = 2;
    }
}

pub mod cpu {
    /// Where programs are loaded and execution starts.
    pub const PROGRAM_COUNTER: usize = 0x0200;
    /// The largest rom that fits between the program start and the end of memory.
    pub const MAX_PROGRAM_SIZE: usize = super::memory::SIZE - PROGRAM_COUNTER;
    /// Instructions per second when nothing else is configured.
    pub const HERTZ: u64 = 500;

    pub mod register {
        /// `V0` to `VF`.
        pub const SIZE: usize = 16;
        /// `VF`, doubles as carry, borrow and collision flag.
        pub const LAST: usize = SIZE - 1;
    }

    pub mod stack {
        /// The deepest nesting of subroutine calls.
        pub const SIZE: usize = 16;
    }
}

pub mod timer {
    /// The rate both timers count down with.
    pub const HERZ: u64 = 60;
    /// The length of a single timer tick in microseconds.
    pub const INTERVAL_MICROS: u64 = 1_000_000 / HERZ;
}

pub mod display {
    pub const WIDTH: usize = 64;
    pub const HEIGHT: usize = 32;
    /// Pixels of the framebuffer, stored row by row.
    pub const RESOLUTION: usize = WIDTH * HEIGHT;
    /// Every sprite row is one byte, the most significant bit on the left.
    pub const SPRITE_WIDTH: usize = 8;

    pub mod fontset {
        /// The address of the glyph for `0`.
        pub const LOCATION: usize = 0x000;
        /// Rows of a single `4x5` glyph.
        pub const GLYPH_SIZE: usize = 5;
        /// The hex digits `0-F`, five rows each.
        pub const FONTSET: [u8; 16 * GLYPH_SIZE] = [
            0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
            0x20, 0x60, 0x20, 0x20, 0x70, // 1
            0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
            0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
            0x90, 0x90, 0xF0, 0x10, 0x10, // 4
            0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
            0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
            0xF0, 0x10, 0x20, 0x40, 0x40, // 7
            0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
            0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
            0xF0, 0x90, 0xF0, 0x90, 0x90, // A
            0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
            0xF0, 0x80, 0x80, 0x80, 0xF0, // C
            0xE0, 0x90, 0x90, 0x90, 0xE0, // D
            0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
            0xF0, 0x80, 0xF0, 0x80, 0x80, // F
        ];
    }
}

pub mod keyboard {
    /// Keys `0-F` of the hex keypad.
    pub const SIZE: usize = 16;
    /// The physical arrangement of the keypad, row by row.
    pub const LAYOUT: [[usize; 4]; 4] = [
        [0x1, 0x2, 0x3, 0xC],
        [0x4, 0x5, 0x6, 0xD],
        [0x7, 0x8, 0x9, 0xE],
        [0xA, 0x0, 0xB, 0xF],
    ];
}
