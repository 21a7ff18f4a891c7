pub mod animation;
pub mod api;
pub mod components;
pub mod config;
pub mod hooks;
pub mod styles;

use gloo_events::EventListener;
use shared::game_session::Phase;
use web_sys::window;
use yew::prelude::*;

use crate::components::{Confetti, Controls, DebugMenu, ResultScreen, RouletteReel, TitleScreen};
use crate::hooks::{GameAction, GameContext, GameStore};

#[function_component(App)]
pub fn app() -> Html {
    let game = use_reducer(|| GameStore::new(config::table_variant()));
    let operator = use_state(config::is_operator_page);

    {
        let operator = operator.clone();
        use_effect_with((), move |_| {
            let listener = window().map(|window| {
                EventListener::new(&window, "hashchange", move |_| {
                    operator.set(config::is_operator_page());
                })
            });
            move || drop(listener)
        });
    }

    // One SpinResult row per finished spin
    {
        let last_record = game.last_record.clone();
        use_effect_with(game.completed_spins, move |_| {
            if let Some(record) = last_record {
                api::log_spin_result(&record);
            }
            || ()
        });
    }

    let on_settled = {
        let game = game.clone();
        Callback::from(move |_| game.dispatch(GameAction::Finish))
    };

    let session = &game.session;
    let phase = session.phase();
    let outcome = session.outcome().map(|outcome| outcome.category);

    let stage = if session.is_authenticated() {
        let celebration = outcome
            .filter(|category| phase == Phase::Result && category.is_win())
            .map(|category| html! { <Confetti key={game.completed_spins} category={category} /> });

        html! {
            <div class={styles::STAGE}>
                <RouletteReel
                    sequence={session.variant().reel_sequence()}
                    phase={phase}
                    outcome={outcome}
                    on_settled={on_settled}
                />
                <Controls />
                if phase == Phase::Result {
                    <ResultScreen />
                }
                {celebration}
            </div>
        }
    } else {
        html! { <TitleScreen /> }
    };

    html! {
        <ContextProvider<GameContext> context={game.clone()}>
            <div class={styles::CONTAINER}>
                {stage}
                if *operator {
                    <DebugMenu />
                }
            </div>
        </ContextProvider<GameContext>>
    }
}
