//! Runtime wiring
//!
//! # Tasks
//!
//! ```text
//!  stdin thread ──mpsc──▶ ┌──────────────┐
//!                         │  board loop  │──crossbeam──▶ display thread
//!  acquisition task ─────▶│ (tick_hz)    │
//!   (acquisition_hz)  latest snapshot    └──────────────┘
//! ```
//!
//! - The acquisition task samples the simulated board and publishes into
//!   [`SharedReadings`]; it never waits on the board loop.
//! - The board loop is the single owner of [`BoardStateManager`]. Console
//!   commands reach it as messages; each tick copies the latest snapshot,
//!   runs the state machine to completion and moves on.
//! - The display thread drains render commands into a [`ConsoleDisplay`].

pub mod commands;

pub use commands::{CommandError, ConsoleCommand, ReviewStep, HELP};

use crate::core::{AppConfig, CoreResult, SensorSettings};
use crate::display::{run_display, ConsoleDisplay, NotifyKind, RenderCommand, RenderSender};
use crate::game::cell::CellGrid;
use crate::game::export::PgnHeaders;
use crate::game::manager::{BoardStateManager, TickOutcome};
use crate::game::resources::GameReview;
use magchess_sensors::{
    run_acquisition, CalibrationSampler, CalibrationTable, ReadingSource, SensorError,
    SharedReadings, SimulatedBoard, SimulatedSquare,
};
use parking_lot::Mutex;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Period of a `hz` cadence
pub fn period(hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(hz.max(1)))
}

/// State owned by the board tick task
pub struct BoardLoop {
    manager: BoardStateManager,
    grid: CellGrid,
    readings: SharedReadings,
    simulator: Arc<Mutex<SimulatedBoard>>,
    flipped_setup: bool,
    review: Option<GameReview>,
    render: RenderSender,
}

impl BoardLoop {
    pub fn new(
        settings: &SensorSettings,
        readings: SharedReadings,
        simulator: Arc<Mutex<SimulatedBoard>>,
        flipped_setup: bool,
        render: RenderSender,
    ) -> Self {
        Self {
            manager: BoardStateManager::new(render.clone()),
            grid: CellGrid::new(settings),
            readings,
            simulator,
            flipped_setup,
            review: None,
            render,
        }
    }

    pub fn manager(&self) -> &BoardStateManager {
        &self.manager
    }

    /// Classify the latest snapshot and advance the state machine
    ///
    /// Frames are not analysed while reviewing; the first tick after review
    /// picks up whatever the board shows by then.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        let frame = self.grid.update_from(&self.readings);
        if self.review.is_some() {
            return None;
        }
        Some(self.manager.tick(&frame))
    }

    /// Apply one console command; returns `false` on quit
    pub fn handle(&mut self, command: ConsoleCommand) -> bool {
        debug!("[RUNTIME] Console command {:?}", command);
        match command {
            ConsoleCommand::Lift(coords) => self.simulator.lock().lift(coords),
            ConsoleCommand::Place(coords, state) => self.simulator.lock().set(coords, state),
            ConsoleCommand::Cycle(coords) => {
                self.simulator.lock().cycle(coords);
            }
            ConsoleCommand::Move(from, to) => {
                let mut simulator = self.simulator.lock();
                let state = simulator.get(from);
                if state == SimulatedSquare::Empty {
                    self.render.notify(NotifyKind::Info, format!("Nothing on {}", from.to_algebraic()));
                } else {
                    simulator.lift(from);
                    simulator.set(to, state);
                }
            }
            ConsoleCommand::Start => self.simulator.lock().set_starting_layout(self.flipped_setup),
            ConsoleCommand::Clear => self.simulator.lock().clear(),
            ConsoleCommand::Sensors => {
                let fingerprint = self.grid.frame().fingerprint().to_string();
                let rows: Vec<&str> = fingerprint.split('/').rev().collect();
                self.render.notify(NotifyKind::Info, format!("sensors (top row is rank 8):\n{}", rows.join("\n")));
            }
            ConsoleCommand::Pgn => match self.manager.pgn(&PgnHeaders::default()) {
                Ok(pgn) => self.render.notify(NotifyKind::Info, pgn),
                Err(e) => self.render.notify(NotifyKind::Info, e.to_string()),
            },
            ConsoleCommand::Fen => match self.manager.fen() {
                Ok(fen) => self.render.notify(NotifyKind::Info, fen),
                Err(e) => self.render.notify(NotifyKind::Info, e.to_string()),
            },
            ConsoleCommand::Review(step) => self.review(step),
            ConsoleCommand::Replay => {
                self.review = None;
                self.manager.request_new_game();
            }
            ConsoleCommand::Help => self.render.notify(NotifyKind::Info, HELP),
            ConsoleCommand::Quit => return false,
        }
        true
    }

    fn review(&mut self, step: ReviewStep) {
        if step == ReviewStep::Exit {
            if self.review.take().is_some() {
                self.render.notify(NotifyKind::Info, "Review closed");
                self.manager.redraw();
            }
            return;
        }

        if self.review.is_none() {
            match self.manager.review() {
                Ok(review) => self.review = Some(review),
                Err(e) => {
                    self.render.notify(NotifyKind::Info, e.to_string());
                    return;
                }
            }
        }

        if let Some(review) = self.review.as_mut() {
            let state = match step {
                ReviewStep::First => review.first(),
                ReviewStep::Previous => review.previous(),
                ReviewStep::Next => review.next(),
                ReviewStep::Last => review.last(),
                ReviewStep::Exit => review.current(),
            };
            let layout = state.layout.clone();
            let player = state.player_to_move;
            let status = review.describe();
            self.render.send(RenderCommand::ShowLayout(layout));
            self.render.send(RenderCommand::SetPlayer(player));
            self.render.notify(NotifyKind::Info, format!("Review {}", status));
        }
    }

    /// Tick on `tick_period` and serve commands until quit or input closes
    pub async fn run(mut self, tick_period: Duration, mut commands: mpsc::Receiver<ConsoleCommand>) -> Self {
        let mut ticker = interval(tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("[RUNTIME] Board loop started ({:?} period)", tick_period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle(command) {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        info!("[RUNTIME] Board loop stopped");
        self
    }
}

/// Forward stdin lines as parsed commands; sends `Quit` at end of input
///
/// Runs on a plain thread because stdin reads block.
fn spawn_stdin_reader(tx: mpsc::Sender<ConsoleCommand>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<ConsoleCommand>() {
                Ok(command) => {
                    if tx.blocking_send(command).is_err() {
                        return;
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
        let _ = tx.blocking_send(ConsoleCommand::Quit);
    });
}

/// Interactive session against the simulated board
pub async fn run_simulation(config: &AppConfig, settings: SensorSettings, seed: Option<u64>) -> CoreResult<()> {
    let sensors = &config.sensors;
    let flipped_setup = config.board.flipped_simulation;

    let mut board = match seed {
        Some(seed) => SimulatedBoard::seeded(
            settings.calibration.clone(),
            settings.trigger_delta,
            sensors.simulated_noise,
            seed,
        ),
        None => SimulatedBoard::new(settings.calibration.clone(), settings.trigger_delta, sensors.simulated_noise),
    };
    board.set_starting_layout(flipped_setup);
    let initial = board.sample();
    let simulator = Arc::new(Mutex::new(board));
    let readings = SharedReadings::new(initial);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let acquisition = tokio::spawn(run_acquisition(
        Arc::clone(&simulator),
        readings.clone(),
        period(sensors.acquisition_hz),
        shutdown_rx,
    ));

    let (render_tx, render_rx) = crossbeam_channel::unbounded::<RenderCommand>();
    let display = std::thread::spawn(move || {
        run_display(render_rx, ConsoleDisplay::stdout().with_black_at_bottom(flipped_setup));
    });

    let (command_tx, command_rx) = mpsc::channel(32);
    spawn_stdin_reader(command_tx);

    let render = RenderSender::new(render_tx);
    render.notify(NotifyKind::Info, HELP);
    let board_loop = BoardLoop::new(&settings, readings, simulator, flipped_setup, render);
    let finished = board_loop.run(period(config.board.tick_hz), command_rx).await;
    info!("[RUNTIME] Session ended after {} committed states", finished.manager().history().len());
    drop(finished);

    let _ = shutdown_tx.send(true);
    match acquisition.await {
        Ok(published) => debug!("[RUNTIME] Acquisition published {} snapshots", published),
        Err(e) => warn!("[RUNTIME] Acquisition task failed: {}", e),
    }
    if !matches!(tokio::task::spawn_blocking(move || display.join()).await, Ok(Ok(()))) {
        warn!("[RUNTIME] Display thread did not shut down cleanly");
    }
    Ok(())
}

/// Average `samples` full snapshots from `source` into a calibration table
///
/// Returns the table and the achieved samples per second.
pub async fn run_calibration<S: ReadingSource>(
    mut source: S,
    samples: usize,
    sample_period: Duration,
) -> Result<(CalibrationTable, Option<f64>), SensorError> {
    let mut sampler = CalibrationSampler::new(samples);
    let mut ticker = interval(sample_period);
    info!("[CALIBRATION] Sampling {} snapshots", sampler.target());

    while !sampler.is_complete() {
        ticker.tick().await;
        let snapshot = source.sample();
        sampler.push(&snapshot, Instant::now().into_std());
    }

    let table = sampler.average()?;
    let rate = sampler.samples_per_second();
    match rate {
        Some(sps) => info!("[CALIBRATION] Done, {:.1} samples/s", sps),
        None => info!("[CALIBRATION] Done"),
    }
    Ok((table, rate))
}
