use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::api::VerificationResult;
use crate::prize::{Category, PrizeOutcome, TableVariant};

/// Where the roulette currently is.
///
/// `Idle -> Spinning -> Stopping -> Result`, then back to `Idle` on reset or
/// straight to `Spinning` when free spins remain.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Spinning,
    Stopping,
    Result,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Stop,
    Finish,
    Reset,
    Continue,
}

/// A transition the session refused. The session is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    InvalidPhase { operation: Operation, phase: Phase },
    NoRemainingSpins,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhase { operation, phase } => {
                write!(f, "{:?} is not allowed while {:?}", operation, phase)
            }
            Self::NoRemainingSpins => write!(f, "no remaining spins"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Telemetry payload produced by `finish`, one per completed spin.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SpinRecord {
    pub category: Category,
    pub prize_id: String,
    pub label: String,
    pub forced: bool,
    pub remaining_spins: u32,
}

/// Per-browser-session game state. Mutated only through the transition
/// methods below.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct GameSession {
    phase: Phase,
    outcome: Option<Category>,
    is_authenticated: bool,
    debug_mode: bool,
    debug_override: Option<Category>,
    remaining_spins: u32,
    variant: TableVariant,
    forced_outcome: bool,
}

impl GameSession {
    pub fn new(variant: TableVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&'static PrizeOutcome> {
        self.outcome.map(Category::outcome)
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn debug_override(&self) -> Option<Category> {
        self.debug_override
    }

    pub fn remaining_spins(&self) -> u32 {
        self.remaining_spins
    }

    pub fn variant(&self) -> TableVariant {
        self.variant
    }

    /// Applies a verification result. Only an allowed result changes
    /// anything, and authentication is never revoked afterwards.
    pub fn authenticate(&mut self, result: &VerificationResult) -> bool {
        if !result.allowed {
            return false;
        }
        self.is_authenticated = true;
        self.remaining_spins = result.remaining.unwrap_or(0);
        true
    }

    pub fn toggle_debug_mode(&mut self) {
        self.debug_mode = !self.debug_mode;
    }

    /// Pins the next draws to `category` while debug mode is on. Stays set
    /// until changed again.
    ///
    /// A category the variant's reel does not show is refused and the
    /// previous override kept; the reel would have nowhere to land.
    pub fn set_debug_override(&mut self, category: Option<Category>) -> bool {
        if category.is_some_and(|c| !self.variant.offers(c)) {
            return false;
        }
        self.debug_override = category;
        true
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Idle | Phase::Result => {
                self.enter_spinning();
                Ok(())
            }
            phase => Err(TransitionError::InvalidPhase {
                operation: Operation::Start,
                phase,
            }),
        }
    }

    pub fn stop(&mut self) -> Result<&'static PrizeOutcome, TransitionError> {
        self.stop_with_rng(&mut rand::thread_rng())
    }

    /// Draws the outcome and moves to `Stopping`. Rejected unless spinning,
    /// so duplicate input can never draw twice.
    pub fn stop_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&'static PrizeOutcome, TransitionError> {
        if self.phase != Phase::Spinning {
            return Err(TransitionError::InvalidPhase {
                operation: Operation::Stop,
                phase: self.phase,
            });
        }

        let forced = self
            .debug_override
            .filter(|category| self.debug_mode && self.variant.offers(*category));
        let outcome = self.variant.table().draw(forced, rng);
        self.outcome = Some(outcome.category);
        self.forced_outcome = forced.is_some();
        self.phase = Phase::Stopping;
        Ok(outcome)
    }

    /// Called once the reel has settled.
    pub fn finish(&mut self) -> Result<SpinRecord, TransitionError> {
        let category = match (self.phase, self.outcome) {
            (Phase::Stopping, Some(category)) => category,
            (phase, _) => {
                return Err(TransitionError::InvalidPhase {
                    operation: Operation::Finish,
                    phase,
                })
            }
        };

        if category == Category::RetryCredit {
            self.remaining_spins = self.remaining_spins.saturating_add(1);
        }
        self.phase = Phase::Result;

        let outcome = category.outcome();
        Ok(SpinRecord {
            category,
            prize_id: outcome.id.to_string(),
            label: outcome.label.to_string(),
            forced: self.forced_outcome,
            remaining_spins: self.remaining_spins,
        })
    }

    pub fn reset(&mut self) -> Result<(), TransitionError> {
        if self.phase != Phase::Result {
            return Err(TransitionError::InvalidPhase {
                operation: Operation::Reset,
                phase: self.phase,
            });
        }
        self.phase = Phase::Idle;
        self.outcome = None;
        self.forced_outcome = false;
        Ok(())
    }

    /// Spends one free spin straight from the result screen.
    pub fn continue_spin(&mut self) -> Result<(), TransitionError> {
        if self.phase != Phase::Result {
            return Err(TransitionError::InvalidPhase {
                operation: Operation::Continue,
                phase: self.phase,
            });
        }
        if self.remaining_spins == 0 {
            return Err(TransitionError::NoRemainingSpins);
        }
        self.remaining_spins -= 1;
        self.enter_spinning();
        Ok(())
    }

    fn enter_spinning(&mut self) {
        self.phase = Phase::Spinning;
        self.outcome = None;
        self.forced_outcome = false;
    }
}
