use std::{
    fs,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context};
use chip::{
    chip8::{ChipSet, Interpreter},
    definitions::cpu,
    devices::{DisplayCommands, Headless},
    timer::FrameClock,
    Runner, RunnerConfig,
};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

mod term;

use term::{Command, TermDisplay, TermKeyboard, TerminalGuard};

/// The most frames that are caught up at once, after the emulator was blocked.
const MAX_CATCH_UP: u32 = 10;

/// The pause between two redraws while stepping.
const IDLE: Duration = Duration::from_millis(16);

/// CHIP-8 virtual machine running in the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Filepath to the Chip-8 ROM file that will be executed
    #[arg(index = 1)]
    rom: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = cpu::HERTZ)]
    hertz: u64,

    /// More log output, can be repeated up to three times
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Start in single step mode
    #[arg(long)]
    step: bool,

    /// Frames to run without a screen before the program is shown
    #[arg(long, default_value_t = 0)]
    start_frame: u64,

    /// PRNG seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    term::logger::init(term::logger::level(args.verbose)).map_err(|err| anyhow!("{}", err))?;

    let rom = fs::read(&args.rom)
        .with_context(|| format!("Failed to read the ROM file {}", args.rom.display()))?;
    let chip = ChipSet::with_program(&rom)?;
    log::info!("loaded {} ({} bytes)", args.rom.display(), rom.len());

    let interpreter = match args.seed {
        Some(seed) => Interpreter::with_rng(StdRng::seed_from_u64(seed)),
        None => Interpreter::new(),
    };
    let mut runner = Runner::with_interpreter(chip, RunnerConfig::from_hertz(args.hertz), interpreter);

    for _ in 0..args.start_frame {
        runner
            .frame(&mut Headless, &mut Headless)
            .with_context(|| format!("The program failed in frame {}", runner.frames()))?;
    }

    let _guard = TerminalGuard::new()?;
    let mut display = TermDisplay::new()?;
    let mut keyboard = TermKeyboard::new();
    display.display(runner.chip().get_display());

    let mut paused = args.step;
    let mut clock = FrameClock::new(Instant::now());

    loop {
        keyboard.pump();
        let mut step = false;
        for command in keyboard.take_commands() {
            match command {
                Command::Quit => {
                    log::info!("quit after {} frames", runner.frames());
                    return Ok(());
                }
                Command::Step => step = true,
                Command::TogglePause => {
                    paused = !paused;
                    clock.resync(Instant::now());
                }
            }
        }

        if paused {
            if step {
                let pc = runner.chip().get_program_counter();
                runner
                    .step_instruction(&mut display, &mut keyboard)
                    .map_err(|err| {
                        log::error!("{}", err);
                        err
                    })
                    .with_context(|| format!("The program failed at {:#06X}", pc))?;
            }
            display.render(runner.chip(), paused)?;
            thread::sleep(IDLE);
            continue;
        }

        let now = Instant::now();
        let due = clock.due(now);
        if due > MAX_CATCH_UP {
            log::debug!("dropping {} frames", due - MAX_CATCH_UP);
            clock.resync(now);
        }
        for _ in 0..due.min(MAX_CATCH_UP) {
            let pc = runner.chip().get_program_counter();
            runner
                .frame(&mut display, &mut keyboard)
                .map_err(|err| {
                    log::error!("{}", err);
                    err
                })
                .with_context(|| {
                    format!("The program failed in frame {} near {:#06X}", runner.frames(), pc)
                })?;
        }

        display.render(runner.chip(), paused)?;
        thread::sleep(clock.until_next(Instant::now()));
    }
}
