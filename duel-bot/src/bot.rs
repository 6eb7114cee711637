//! The agent's turn loop: keep the field current from protocol events, poll
//! our energy on a slow cadence, and on a faster cadence solve against the
//! current opponent and fire.

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use duel_core::sim::SimulationConfig;
use duel_core::Field;

use crate::net::Connection;
use crate::protocol::{ClientCommand, ProtocolError, ServerMessage};
use crate::solver::{self, Solution};
use crate::strategy::{create_strategy, AimStrategy, DEFAULT_STRATEGY};

const ENERGY_POLL_INTERVAL: Duration = Duration::from_secs(2);
const SOLVE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub name: String,
    pub strategy: String,
    /// Independent solver seeds per shot decision.
    pub seeds: usize,
    /// Objective-evaluation budget per seed.
    pub budget: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "gravbot".to_string(),
            strategy: DEFAULT_STRATEGY.to_string(),
            seeds: 4,
            budget: solver::DEFAULT_BUDGET,
        }
    }
}

pub struct DuelBot {
    config: BotConfig,
    sim: SimulationConfig,
    strategy: Box<dyn AimStrategy>,
    field: Field,
    own_id: Option<u32>,
    /// Last server-reported energy budget, floored to whole units.
    energy: f64,
    last_energy_poll: Instant,
    last_solve: Instant,
}

impl DuelBot {
    pub fn new(config: BotConfig) -> Result<Self> {
        let Some(strategy) = create_strategy(&config.strategy) else {
            bail!("unknown aiming strategy '{}'", config.strategy);
        };
        Ok(Self {
            config,
            sim: SimulationConfig::default(),
            strategy,
            field: Field::new(),
            own_id: None,
            energy: 0.0,
            last_energy_poll: Instant::now(),
            last_solve: Instant::now(),
        })
    }

    /// Drive the loop until the connection fails. The caller owns
    /// reconnect policy.
    pub fn run(&mut self, conn: &mut Connection) -> Result<()> {
        conn.send(&ClientCommand::SetName {
            name: self.config.name.clone(),
        })?;
        loop {
            if self.last_energy_poll.elapsed() > ENERGY_POLL_INTERVAL {
                conn.send(&ClientCommand::QueryEnergy)?;
                self.last_energy_poll = Instant::now();
            }
            if self.last_solve.elapsed() > SOLVE_INTERVAL && self.field_ready() {
                self.take_shot(conn)?;
                self.last_solve = Instant::now();
            }
            match conn.poll() {
                Ok(Some(message)) => self.apply(message),
                Ok(None) => {}
                // An unknown type may just be a newer server being chatty;
                // skip it and stay connected. Anything else is fatal to
                // this connection.
                Err(ProtocolError::UnknownMessage { kind, payload }) => {
                    warn!(kind, payload, "ignoring unknown message");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// A solve only makes sense once we know who we are, planet data has
    /// arrived, and somebody else is on the field.
    fn field_ready(&self) -> bool {
        self.own_id.is_some()
            && !self.field.planets().is_empty()
            && self.field.player_count() > 1
    }

    pub fn apply(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Welcome { id } => {
                info!(id, "joined as player {id}");
                self.own_id = Some(id);
            }
            ServerMessage::PlayerLeft { id } => {
                self.field.remove_player(id);
                info!(id, "player left");
            }
            ServerMessage::PlayerPos { id, position } => {
                let joined = self.field.upsert_player(id, position);
                if joined {
                    info!(id, x = position.x, y = position.y, "player joined");
                } else {
                    debug!(id, x = position.x, y = position.y, "player moved");
                }
            }
            ServerMessage::ShotBegin {
                shooter,
                angle,
                velocity,
            } => {
                debug!(shooter, angle, velocity, "missile launched");
            }
            ServerMessage::ShotEnd {
                angle,
                velocity,
                trace,
            } => {
                debug!(angle, velocity, segments = trace.len(), "missile resolved");
            }
            ServerMessage::Energy { value } => {
                self.energy = value.floor();
                debug!(energy = self.energy, "energy update");
            }
            ServerMessage::Planets { planets } => {
                info!(count = planets.len(), "planet data received");
                self.field.set_planets(planets);
            }
        }
    }

    /// First opponent in id order. Smarter target selection is out of
    /// scope for this bot.
    fn current_target(&self) -> Option<u32> {
        let own = self.own_id?;
        self.field.opponents(own).next().map(|p| p.id)
    }

    fn take_shot(&mut self, conn: &mut Connection) -> Result<()> {
        let Some(own) = self.own_id else {
            return Ok(());
        };
        let Some(target) = self.current_target() else {
            return Ok(());
        };
        match solver::solve_player_spread(
            &self.sim,
            &self.field,
            own,
            target,
            self.strategy.as_ref(),
            self.config.budget,
            self.config.seeds,
        ) {
            Ok(solution) => {
                self.report(&solution, target);
                conn.send(&ClientCommand::Shoot {
                    angle: solution.launch_angle,
                    energy: solution.energy,
                })?;
            }
            Err(err) => warn!(%err, "no shot this turn"),
        }
        Ok(())
    }

    fn report(&self, solution: &Solution, target_id: u32) {
        if solution.hit {
            info!(
                target_id,
                angle = solution.angle,
                energy = solution.energy,
                outcome = ?solution.outcome,
                "firing on an accepted solution"
            );
        } else {
            info!(
                target_id,
                angle = solution.angle,
                energy = solution.energy,
                objective = solution.objective,
                "firing best effort; solver did not reach the basin"
            );
        }
    }
}
