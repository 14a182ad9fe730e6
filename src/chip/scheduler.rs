use std::time::{Duration, Instant};

use log::{debug, info};

use crate::chip::{
    chip8::{CHIP8_INSTRUCTION_FREQUENCY, CHIP8_TIMER_FREQUENCY},
    io::{InputSource, OutputSink},
    Chip, CycleOutcome, Error,
};

pub const MIN_INSTRUCTION_FREQUENCY: u32 = 60;
pub const MAX_INSTRUCTION_FREQUENCY: u32 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Instructions executed per second.
    pub instruction_frequency: u32,

    /// Ticks per second. Each tick decays the timers, refreshes the display and updates the tone.
    pub timer_frequency: u32,

    /// Whether ticks keep decaying the timers while an `FX0A` waits for a key. The display is
    /// refreshed either way.
    pub timers_run_while_waiting: bool,
}

impl SchedulerConfig {
    /// The wall-clock budget of one cycle.
    pub fn cycle_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.instruction_frequency.max(1)))
    }

    /// Cycles between two ticks, truncated.
    pub fn cycles_per_tick(&self) -> u32 {
        (self.instruction_frequency / self.timer_frequency.max(1)).max(1)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            instruction_frequency: CHIP8_INSTRUCTION_FREQUENCY,
            timer_frequency: CHIP8_TIMER_FREQUENCY,
            timers_run_while_waiting: true,
        }
    }
}

/// Drives a [`Chip`] at a fixed instruction frequency and ticks it every
/// [`SchedulerConfig::cycles_per_tick`] cycles.
///
/// `step` does the work of one cycle and `pace` waits out the rest of its budget. The two are
/// separate so hosts can handle their own events in between, and so tests can step without
/// sleeping.
#[derive(Debug)]
pub struct Scheduler {
    config: SchedulerConfig,
    cycles_since_tick: u32,
    tone_playing: bool,
    next_deadline: Option<Instant>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Scheduler {
            config,
            cycles_since_tick: 0,
            tone_playing: false,
            next_deadline: None,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Changes the instruction frequency, clamped to
    /// [`MIN_INSTRUCTION_FREQUENCY`, `MAX_INSTRUCTION_FREQUENCY`].
    pub fn set_instruction_frequency(&mut self, frequency: u32) {
        let frequency = frequency.clamp(MIN_INSTRUCTION_FREQUENCY, MAX_INSTRUCTION_FREQUENCY);
        if frequency != self.config.instruction_frequency {
            debug!("instruction frequency set to {} Hz", frequency);
        }
        self.config.instruction_frequency = frequency;
        self.next_deadline = None;
    }

    /// Runs one cycle, followed by a tick if one is due.
    pub fn step<C: Chip + ?Sized>(
        &mut self,
        chip: &mut C,
        input: &mut dyn InputSource,
        output: &mut dyn OutputSink,
    ) -> Result<CycleOutcome, Error> {
        let outcome = chip.cycle(input)?;

        self.cycles_since_tick += 1;
        if self.cycles_since_tick >= self.config.cycles_per_tick() {
            self.cycles_since_tick = 0;
            self.tick(chip, output)?;
        }

        Ok(outcome)
    }

    /// Decays the timers, starts or stops the tone when the sound timer crossed zero, then
    /// refreshes the display. The refresh already sees this tick's tone state.
    pub fn tick<C: Chip + ?Sized>(
        &mut self,
        chip: &mut C,
        output: &mut dyn OutputSink,
    ) -> Result<(), Error> {
        if self.config.timers_run_while_waiting || !chip.is_awaiting_key() {
            chip.decay_timers();
        }

        match (chip.sound_active(), self.tone_playing) {
            (true, false) => {
                debug!("tone on");
                output.start_tone()?;
                self.tone_playing = true;
            }
            (false, true) => {
                debug!("tone off");
                output.stop_tone()?;
                self.tone_playing = false;
            }
            _ => {}
        }

        output.refresh(chip.read_output_pins())?;
        Ok(())
    }

    /// Sleeps until the current cycle's budget has elapsed. Budgets are measured from deadline
    /// to deadline, so time spent in `step` or in the host does not accumulate drift. A host
    /// that falls behind by more than a tick starts over from now instead of bursting.
    pub fn pace(&mut self) {
        let period = self.config.cycle_period();
        let now = Instant::now();
        let deadline = match self.next_deadline {
            Some(deadline) => deadline,
            None => now,
        };

        if deadline > now {
            spin_sleep::sleep(deadline - now);
        }

        let lag = now.saturating_duration_since(deadline);
        self.next_deadline = Some(if lag > period * self.config.cycles_per_tick() {
            now + period
        } else {
            deadline + period
        });
    }

    /// Steps and paces until `keep_running` returns `false` or a cycle fails.
    pub fn run<C, F>(
        &mut self,
        chip: &mut C,
        input: &mut dyn InputSource,
        output: &mut dyn OutputSink,
        mut keep_running: F,
    ) -> Result<(), Error>
    where
        C: Chip + ?Sized,
        F: FnMut() -> bool,
    {
        info!(
            "running at {} Hz, ticking at {} Hz",
            self.config.instruction_frequency, self.config.timer_frequency
        );
        while keep_running() {
            self.step(chip, input, output)?;
            self.pace();
        }
        info!("stopped");
        Ok(())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new(SchedulerConfig::default())
    }
}
