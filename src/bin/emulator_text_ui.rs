use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{bounded, Receiver};
use cursive::CbSink;
use log::{error, info};
use ux::u4;

use chip_8_interpreter::chip::{
    chip8::{
        cursive_display::{CursiveOutput, Display},
        Chip8, CHIP8_INSTRUCTION_FREQUENCY,
    },
    io::{keymap, Keypad, CONVENTIONAL_KEYMAP},
    scheduler::{Scheduler, SchedulerConfig},
    Chip, Error,
};

/// Instruction frequency change per speed up or slow down key press, in Hz.
const SPEED_STEP: u32 = 50;

/// Runs a CHIP-8 program in the terminal.
///
/// Keys `1234 qwer asdf zxcv` are the keypad, space releases all keys, up and down change the
/// speed and escape quits. Set `RUST_LOG` to see log output on stderr.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the program to run.
    rom: String,

    #[arg(
        short,
        long,
        default_value_t = CHIP8_INSTRUCTION_FREQUENCY,
        help = "Instructions per second"
    )]
    ips: u32,

    #[arg(short, long, help = "Seed for the random number generator")]
    seed: Option<u64>,

    #[arg(long, help = "Stop the timers while waiting for a key press")]
    freeze_timers_while_waiting: bool,
}

/// Represents an event to be processed by the event loop.
enum Event {
    /// Occurs when the key passed in the enum value was pressed.
    Key(u4),

    /// Indicates that all keys are released. Terminals only report key presses, so one key
    /// is assigned to releasing all keys.
    KeyRelease,

    /// Raises the instruction frequency.
    SpeedUp,

    /// Lowers the instruction frequency.
    SlowDown,

    /// Shut down.
    Quit,
}

/// Represents the channels available to the event loop.
struct EventLoopChannels {
    /// The channel to send the UI refresh messages to.
    gfx_sender: CbSink,

    /// The channel on which the Events are received.
    key_receiver: Receiver<Event>,
}

/// The event loop. Constantly loops over (1) process pending events. (2) Step the chip,
/// which refreshes the UI whenever a tick is due. (3) Wait out the rest of the cycle.
/// (4) Start over.
///
/// A failing cycle closes the UI and ends the loop with the error.
fn event_loop<T: Chip>(
    mut chip: T,
    mut scheduler: Scheduler,
    io_channels: EventLoopChannels,
) -> Result<(), Error> {
    let mut keypad = Keypad::new();
    let mut output = CursiveOutput::new(io_channels.gfx_sender.clone());

    info!("running at {} Hz", scheduler.config().instruction_frequency);
    loop {
        for event in io_channels.key_receiver.try_iter() {
            match event {
                Event::Key(key) => keypad.press(key),
                Event::KeyRelease => keypad.release_all(),
                Event::SpeedUp => {
                    let frequency = scheduler.config().instruction_frequency;
                    scheduler.set_instruction_frequency(frequency.saturating_add(SPEED_STEP));
                }
                Event::SlowDown => {
                    let frequency = scheduler.config().instruction_frequency;
                    scheduler.set_instruction_frequency(frequency.saturating_sub(SPEED_STEP));
                }
                Event::Quit => {
                    info!("shutting down");
                    return Ok(());
                }
            }
        }

        if let Err(err) = scheduler.step(&mut chip, &mut keypad, &mut output) {
            error!("halting: {}", err);
            let _ = io_channels
                .gfx_sender
                .send(Box::new(|s: &mut cursive::Cursive| s.quit()));
            return Err(err);
        }
        scheduler.pace();
    }
}

/// Constructs the UI and spawns the event loop thread.
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut chip8 = match args.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };
    chip8
        .load_program(&args.rom)
        .with_context(|| format!("could not load {}", args.rom))?;

    let mut scheduler = Scheduler::new(SchedulerConfig {
        timers_run_while_waiting: !args.freeze_timers_while_waiting,
        ..SchedulerConfig::default()
    });
    scheduler.set_instruction_frequency(args.ips);

    let mut siv = cursive::default();

    let cb_sink = siv.cb_sink().clone();
    let (key_sender, key_receiver) = bounded::<Event>(10);

    let engine = std::thread::spawn(move || {
        event_loop(
            chip8,
            scheduler,
            EventLoopChannels {
                gfx_sender: cb_sink,
                key_receiver,
            },
        )
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Esc, move |s| {
        let _ = sender.send(Event::Quit);
        s.quit();
    });

    // Letters are registered in both cases so the keypad keeps working with caps lock on.
    let physical_keys = CONVENTIONAL_KEYMAP.iter().map(|(key, _)| *key);
    let shifted_keys = physical_keys
        .clone()
        .filter(char::is_ascii_alphabetic)
        .map(|key| key.to_ascii_uppercase());
    for physical in physical_keys.chain(shifted_keys) {
        if let Some(logical) = keymap(physical) {
            let sender = key_sender.clone();
            siv.add_global_callback(physical, move |_s| {
                let _ = sender.send(Event::Key(logical));
            });
        }
    }

    let sender = key_sender.clone();
    siv.add_global_callback(' ', move |_s| {
        let _ = sender.send(Event::KeyRelease);
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Up, move |_s| {
        let _ = sender.send(Event::SpeedUp);
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Down, move |_s| {
        let _ = sender.send(Event::SlowDown);
    });

    siv.add_layer(Display::default());

    siv.run();

    // The loop may still be running if the UI was closed some other way.
    let _ = key_sender.send(Event::Quit);
    match engine.join() {
        Ok(result) => result.context("interpreter halted"),
        Err(_) => anyhow::bail!("interpreter thread panicked"),
    }
}
