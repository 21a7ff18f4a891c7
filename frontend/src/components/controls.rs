use shared::game_session::Phase;
use yew::prelude::*;

use crate::hooks::{use_game, GameAction};
use crate::styles;

#[function_component(Controls)]
pub fn controls() -> Html {
    let Some(game) = use_game() else {
        return html! {};
    };

    let on_start = {
        let game = game.clone();
        Callback::from(move |_: MouseEvent| game.dispatch(GameAction::Start))
    };
    let on_stop = {
        let game = game.clone();
        Callback::from(move |_: MouseEvent| game.dispatch(GameAction::Stop))
    };

    match game.session.phase() {
        Phase::Idle => html! {
            <>
                {
                    game.notice.clone().map(|notice| html! {
                        <div class={styles::CARD_ERROR} role="alert">{notice}</div>
                    })
                }
                <button class={styles::BUTTON_START} onclick={on_start}>{"START"}</button>
            </>
        },
        Phase::Spinning => html! {
            <button class={styles::BUTTON_STOP} onclick={on_stop}>{"STOP"}</button>
        },
        Phase::Stopping => html! {
            <button class={styles::BUTTON_STOP} disabled=true>{"STOP"}</button>
        },
        Phase::Result => html! {},
    }
}
