use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lockstep_shared::Tick;

use super::clock::Clock;

/// Fixed-step timing parameters.
///
/// `fixed_step` is the simulation tick interval, `frame_duration` the pacing
/// target for the outer frame loop, and `max_ticks_per_frame` caps catch-up
/// after a stall so a long pause never triggers a runaway tick burst.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub fixed_step: Duration,
    pub frame_duration: Duration,
    pub max_ticks_per_frame: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fixed_step: Duration::from_nanos(1_000_000_000 / 60),
            frame_duration: Duration::from_nanos(1_000_000_000 / 60),
            max_ticks_per_frame: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Returned by the host after each fixed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Stop,
}

/// The methods `SchedulerError` can return.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// `run` was called on a scheduler that already ran. A scheduler drives
    /// one session; make a new one to run again.
    #[error("scheduler is not idle and cannot be started again")]
    NotIdle,
}

/// The simulation-side surface the scheduler drives.
///
/// One frame iteration calls, in order: `drain_pending_inits`, zero or more
/// `fixed_tick`s (with the init drain repeated before each), `frame_update`,
/// `flush_events`, and `sync_render`.
pub trait TickHost {
    /// Runs deferred init hooks for entities added since the last call.
    fn drain_pending_inits(&mut self, tick: Tick);

    /// Advances the simulation by exactly one fixed step.
    fn fixed_tick(&mut self, tick: Tick) -> TickFlow;

    /// Per-frame (variable rate) logic.
    fn frame_update(&mut self, tick: Tick);

    /// Applies deferred structural changes queued during the frame.
    fn flush_events(&mut self);

    /// Publishes render state; `alpha` in `[0, 1]` is the interpolation
    /// fraction between the last two fixed ticks.
    fn sync_render(&mut self, alpha: f32);
}

/// Cloneable remote stop switch for a running scheduler.
#[derive(Clone)]
pub struct SchedulerHandle {
    stop: Arc<AtomicBool>,
}

impl SchedulerHandle {
    /// Requests a stop; the loop observes it at the top of the next frame.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }
}

/// Fixed-step frame loop with an accumulator.
///
/// Simulation ticks advance in exact `fixed_step` increments regardless of
/// frame timing jitter, which is what keeps two peers stepping identical
/// tick sequences. Rendering interpolates between the last two tick states
/// using the leftover accumulator fraction.
pub struct Scheduler<C: Clock> {
    config: SchedulerConfig,
    clock: C,
    state: SchedulerState,
    tick: Tick,
    stop: Arc<AtomicBool>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(config: SchedulerConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            state: SchedulerState::Idle,
            tick: 0,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The next tick to be simulated.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            stop: self.stop.clone(),
        }
    }

    /// Runs the frame loop until the host returns `TickFlow::Stop` or a
    /// handle requests a stop. Consumes the scheduler's ability to run:
    /// a second call returns `SchedulerError::NotIdle`.
    pub fn run(&mut self, host: &mut impl TickHost) -> Result<(), SchedulerError> {
        if self.state != SchedulerState::Idle {
            return Err(SchedulerError::NotIdle);
        }
        self.state = SchedulerState::Running;
        log::info!(
            "scheduler running: fixed step {:?}, catch-up cap {} ticks/frame",
            self.config.fixed_step,
            self.config.max_ticks_per_frame
        );

        let mut accumulator = Duration::ZERO;
        let mut previous = self.clock.elapsed();

        'frames: while !self.stop.load(Ordering::Acquire) {
            // entities spawned during the previous frame_update get their
            // init hooks even when this frame runs zero fixed ticks
            host.drain_pending_inits(self.tick);

            let now = self.clock.elapsed();
            accumulator += now - previous;
            previous = now;

            let mut ticks_this_frame = 0;
            while accumulator >= self.config.fixed_step {
                if ticks_this_frame == self.config.max_ticks_per_frame {
                    // stalled badly; drop the backlog instead of bursting
                    log::warn!(
                        "tick backlog exceeds cap at tick {}, discarding {:?}",
                        self.tick,
                        accumulator
                    );
                    accumulator = Duration::ZERO;
                    break;
                }
                accumulator -= self.config.fixed_step;
                ticks_this_frame += 1;

                host.drain_pending_inits(self.tick);
                let flow = host.fixed_tick(self.tick);
                self.tick += 1;
                if flow == TickFlow::Stop {
                    break 'frames;
                }
            }

            host.frame_update(self.tick);
            host.flush_events();

            let alpha = (accumulator.as_secs_f32() / self.config.fixed_step.as_secs_f32()).min(1.0);
            host.sync_render(alpha);

            let spent = self.clock.elapsed() - now;
            if spent < self.config.frame_duration {
                self.clock.sleep(self.config.frame_duration - spent);
            }
        }

        self.state = SchedulerState::Stopped;
        log::info!("scheduler stopped at tick {}", self.tick);
        Ok(())
    }
}
