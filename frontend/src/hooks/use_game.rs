use std::rc::Rc;

use serde_json::json;
use shared::api::VerificationResult;
use shared::constants::{CONTINUE_INTERRUPTED_NOTICE, EVENT_ORDER_VERIFIED};
use shared::game_session::{GameSession, SpinRecord};
use shared::prize::{Category, TableVariant};
use yew::prelude::*;

use crate::api;

/// Everything the screens share for one browser session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameStore {
    pub session: GameSession,
    pub order_number: Option<String>,
    /// Spins still backed by ledger rows. Each one is consumed with a fresh
    /// verification before it is played; retry credits are not.
    pub ledger_units: u32,
    pub verifying: bool,
    /// Reason the last continue attempt was refused.
    pub notice: Option<String>,
    pub completed_spins: u32,
    pub last_record: Option<SpinRecord>,
}

impl GameStore {
    pub fn new(variant: TableVariant) -> Self {
        Self {
            session: GameSession::new(variant),
            ..Self::default()
        }
    }
}

pub enum GameAction {
    Verifying,
    Authenticated { order_number: String, result: VerificationResult },
    Start,
    Stop,
    Finish,
    Reset,
    /// Continue with a retry credit, or after `ContinueVerified` consumed a row.
    Continue,
    ContinueVerified(VerificationResult),
    ToggleDebug,
    SetOverride(Option<Category>),
}

impl Reducible for GameStore {
    type Action = GameAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        let outcome = match action {
            GameAction::Verifying => {
                next.verifying = true;
                next.notice = None;
                Ok(())
            }
            GameAction::Authenticated { order_number, result } => {
                next.verifying = false;
                if next.session.authenticate(&result) {
                    next.order_number = Some(order_number);
                    next.ledger_units = result.remaining.unwrap_or(0);
                }
                Ok(())
            }
            GameAction::Start => next.session.start(),
            GameAction::Stop => next.session.stop().map(|_| ()),
            GameAction::Finish => next.session.finish().map(|record| {
                next.completed_spins += 1;
                next.last_record = Some(record);
            }),
            GameAction::Reset => next.session.reset(),
            GameAction::Continue => {
                next.notice = None;
                next.session.continue_spin()
            }
            // The server has already answered, so its bookkeeping is kept
            // even when the session can no longer continue.
            GameAction::ContinueVerified(result) => {
                next.verifying = false;
                if result.allowed {
                    next.ledger_units = result.remaining.unwrap_or(0);
                    next.notice = None;
                    if let Err(e) = next.session.continue_spin() {
                        log::warn!("Verified continue not played: {}", e);
                        next.notice = Some(CONTINUE_INTERRUPTED_NOTICE.to_string());
                    }
                } else {
                    next.notice = result.reason;
                }
                Ok(())
            }
            GameAction::ToggleDebug => {
                next.session.toggle_debug_mode();
                Ok(())
            }
            GameAction::SetOverride(category) => {
                if !next.session.set_debug_override(category) {
                    log::warn!("Ignored override {:?}: not on this reel", category);
                    return self;
                }
                Ok(())
            }
        };

        match outcome {
            Ok(()) => Rc::new(next),
            Err(e) => {
                log::warn!("Ignored game action: {}", e);
                self
            }
        }
    }
}

pub type GameContext = UseReducerHandle<GameStore>;

#[hook]
pub fn use_game() -> Option<GameContext> {
    use_context::<GameContext>()
}

/// Verifies `order_number` and, when allowed, unlocks the roulette.
/// Returns the result so the title screen can show a denial reason.
pub async fn login(game: GameContext, order_number: String) -> VerificationResult {
    game.dispatch(GameAction::Verifying);
    let result = api::verify_order(&order_number).await;
    if result.allowed {
        api::log_event(
            EVENT_ORDER_VERIFIED,
            json!({ "orderNumber": order_number.trim(), "remaining": result.remaining }),
            None,
        );
    }
    game.dispatch(GameAction::Authenticated {
        order_number: order_number.trim().to_string(),
        result: result.clone(),
    });
    result
}

/// Plays the next free spin from the result screen.
pub async fn continue_spin(game: GameContext) {
    let store = (*game).clone();
    if store.ledger_units == 0 {
        game.dispatch(GameAction::Continue);
        return;
    }

    let Some(order_number) = store.order_number else {
        game.dispatch(GameAction::Continue);
        return;
    };
    game.dispatch(GameAction::Verifying);
    let result = api::verify_order(&order_number).await;
    game.dispatch(GameAction::ContinueVerified(result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::game_session::Phase;

    fn allowed(remaining: u32) -> VerificationResult {
        VerificationResult {
            allowed: true,
            remaining: Some(remaining),
            reason: None,
            retry_after: None,
        }
    }

    fn apply(store: Rc<GameStore>, actions: Vec<GameAction>) -> Rc<GameStore> {
        actions.into_iter().fold(store, |store, action| store.reduce(action))
    }

    fn authenticated(remaining: u32) -> Rc<GameStore> {
        apply(
            Rc::new(GameStore::new(TableVariant::Standard)),
            vec![
                GameAction::Verifying,
                GameAction::Authenticated {
                    order_number: "1234-5678".to_string(),
                    result: allowed(remaining),
                },
            ],
        )
    }

    #[test]
    fn test_denied_login_keeps_title_screen() {
        let store = apply(
            Rc::new(GameStore::new(TableVariant::Standard)),
            vec![
                GameAction::Verifying,
                GameAction::Authenticated {
                    order_number: "0000".to_string(),
                    result: VerificationResult::denied("nope"),
                },
            ],
        );
        assert!(!store.session.is_authenticated());
        assert!(store.order_number.is_none());
        assert!(!store.verifying);
    }

    #[test]
    fn test_full_cycle_records_one_spin() {
        let store = apply(
            authenticated(0),
            vec![GameAction::Start, GameAction::Stop, GameAction::Finish],
        );
        assert_eq!(store.session.phase(), Phase::Result);
        assert_eq!(store.completed_spins, 1);
        assert!(store.last_record.is_some());
    }

    #[test]
    fn test_rejected_transition_returns_same_store() {
        let store = authenticated(0);
        let after = store.clone().reduce(GameAction::Stop);
        assert!(Rc::ptr_eq(&store, &after));
    }

    #[test]
    fn test_continue_uses_verified_remaining_without_double_count() {
        let store = apply(
            authenticated(2),
            vec![GameAction::Start, GameAction::Stop, GameAction::Finish],
        );
        assert_eq!(store.ledger_units, 2);
        let base = store.session.remaining_spins();

        let store = apply(store, vec![GameAction::Verifying, GameAction::ContinueVerified(allowed(1))]);
        assert_eq!(store.session.phase(), Phase::Spinning);
        assert_eq!(store.ledger_units, 1);
        assert_eq!(store.session.remaining_spins(), base - 1);
    }

    #[test]
    fn test_refused_continue_shows_notice() {
        let store = apply(
            authenticated(1),
            vec![
                GameAction::Start,
                GameAction::Stop,
                GameAction::Finish,
                GameAction::Verifying,
                GameAction::ContinueVerified(VerificationResult::denied("used up")),
            ],
        );
        assert_eq!(store.session.phase(), Phase::Result);
        assert_eq!(store.notice.as_deref(), Some("used up"));
    }

    #[test]
    fn test_debug_override_forces_outcome() {
        let store = apply(
            authenticated(0),
            vec![
                GameAction::ToggleDebug,
                GameAction::SetOverride(Some(Category::Full)),
                GameAction::Start,
                GameAction::Stop,
                GameAction::Finish,
            ],
        );
        let record = store.last_record.clone().unwrap();
        assert_eq!(record.category, Category::Full);
        assert!(record.forced);
    }

    #[test]
    fn test_verified_continue_after_reset_keeps_bookkeeping() {
        let store = apply(
            authenticated(2),
            vec![
                GameAction::Start,
                GameAction::Stop,
                GameAction::Finish,
                GameAction::Verifying,
                GameAction::Reset,
                GameAction::ContinueVerified(allowed(1)),
            ],
        );
        assert!(!store.verifying);
        assert_eq!(store.ledger_units, 1);
        assert_eq!(store.session.phase(), Phase::Idle);
        assert_eq!(store.notice.as_deref(), Some(CONTINUE_INTERRUPTED_NOTICE));

        let store = store.reduce(GameAction::Start);
        assert_eq!(store.session.phase(), Phase::Spinning);
    }

    #[test]
    fn test_override_missing_from_reel_is_ignored() {
        let store = apply(
            authenticated(0),
            vec![GameAction::ToggleDebug, GameAction::SetOverride(Some(Category::Geisha))],
        );
        let after = store.clone().reduce(GameAction::SetOverride(Some(Category::RetryCredit)));
        assert!(Rc::ptr_eq(&store, &after));

        let store = apply(after, vec![GameAction::Start, GameAction::Stop, GameAction::Finish]);
        let record = store.last_record.clone().unwrap();
        assert_eq!(record.category, Category::Geisha);
        assert_eq!(store.session.remaining_spins(), 0);
    }
}
