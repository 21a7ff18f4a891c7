use shared::game_session::Phase;
use shared::prize::Category;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::hooks::{use_game, GameAction};
use crate::styles;

const NO_OVERRIDE: &str = "";

/// Operator panel: forces outcomes for demos and resets a finished spin
/// without consuming an order.
#[function_component(DebugMenu)]
pub fn debug_menu() -> Html {
    let is_open = use_state(|| false);
    let Some(game) = use_game() else {
        return html! {};
    };
    let debug_mode = game.session.debug_mode();
    let variant = game.session.variant();
    let table = variant.table();

    let on_open = {
        let is_open = is_open.clone();
        Callback::from(move |_: MouseEvent| is_open.set(!*is_open))
    };
    let on_toggle = {
        let game = game.clone();
        Callback::from(move |_: MouseEvent| game.dispatch(GameAction::ToggleDebug))
    };
    let on_override = {
        let game = game.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let category = select.value().parse::<Category>().ok();
            game.dispatch(GameAction::SetOverride(category));
        })
    };
    let on_reset = {
        let game = game.clone();
        Callback::from(move |_: MouseEvent| game.dispatch(GameAction::Reset))
    };

    let selected = game
        .session
        .debug_override()
        .map(Category::wire_name)
        .unwrap_or(NO_OVERRIDE);
    let switch_class = if debug_mode {
        "w-14 h-7 rounded-full p-1 transition-colors bg-cyan-500"
    } else {
        "w-14 h-7 rounded-full p-1 transition-colors bg-slate-600"
    };
    let knob_class = if debug_mode {
        "w-5 h-5 rounded-full bg-white transition-transform translate-x-7"
    } else {
        "w-5 h-5 rounded-full bg-white transition-transform translate-x-0"
    };

    html! {
        <>
            if *is_open {
                <div class={styles::DEBUG_PANEL}>
                    <div class="flex items-center justify-between">
                        <span>{"Debug mode"}</span>
                        <button type="button" class={switch_class} onclick={on_toggle}>
                            <div class={knob_class}></div>
                        </button>
                    </div>
                    <label class="block space-y-1">
                        <span>{"Force outcome"}</span>
                        <select class={styles::DEBUG_SELECT} onchange={on_override} disabled={!debug_mode}>
                            <option value={NO_OVERRIDE} selected={selected == NO_OVERRIDE}>{"(weighted)"}</option>
                            { for variant.reel_sequence().into_iter().map(|category| html! {
                                <option value={category.wire_name()} selected={selected == category.wire_name()}>
                                    {format!(
                                        "{} {} ({:.2}%)",
                                        category.wire_name(),
                                        category.outcome().label,
                                        table.probability(category) * 100.0,
                                    )}
                                </option>
                            }) }
                        </select>
                    </label>
                    <button
                        type="button"
                        class="w-full py-2 rounded-lg bg-slate-700 hover:bg-slate-600 disabled:opacity-50"
                        onclick={on_reset}
                        disabled={game.verifying || game.session.phase() != Phase::Result}
                    >
                        {"Reset"}
                    </button>
                </div>
            }
            <button type="button" class={styles::DEBUG_TOGGLE} onclick={on_open} aria-label="debug menu">
                {"⚙"}
            </button>
        </>
    }
}
