use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, SubmitEvent};
use yew::prelude::*;

use crate::hooks::{login, use_game};
use crate::styles;

#[function_component(TitleScreen)]
pub fn title_screen() -> Html {
    let order_number = use_state(String::new);
    let error = use_state(|| None::<String>);
    let Some(game) = use_game() else {
        return html! {};
    };
    let verifying = game.verifying;

    let on_input = {
        let order_number = order_number.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            order_number.set(input.value());
        })
    };

    let on_submit = {
        let order_number = order_number.clone();
        let error = error.clone();
        let game = game.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if game.verifying || order_number.trim().is_empty() {
                return;
            }

            error.set(None);
            let game = game.clone();
            let error = error.clone();
            let value = (*order_number).clone();
            spawn_local(async move {
                let result = login(game, value).await;
                if !result.allowed {
                    error.set(result.reason);
                }
            });
        })
    };

    let submit_disabled = verifying || order_number.trim().is_empty();

    html! {
        <div class={styles::CONTAINER_SM}>
            <div class={styles::CARD}>
                <h1 class={styles::TEXT_TITLE}>
                    {"サルバの"}<br/>{"ドキドキルーレット"}
                </h1>
                <p class={styles::TEXT_SUBTITLE}>{"へようこそ！"}</p>

                <form class={styles::FORM} onsubmit={on_submit}>
                    <div>
                        <label for="order-number" class={styles::TEXT_LABEL}>
                            {"注文番号を入力してください"}
                        </label>
                        <input
                            id="order-number"
                            type="text"
                            inputmode="text"
                            autocomplete="off"
                            placeholder="例: 1234-5678"
                            class={styles::INPUT}
                            value={(*order_number).clone()}
                            oninput={on_input}
                            disabled={verifying}
                        />
                    </div>

                    {
                        (*error).clone().map(|message| html! {
                            <div class={styles::CARD_ERROR} role="alert">{message}</div>
                        })
                    }

                    <button type="submit" class={styles::BUTTON_PRIMARY} disabled={submit_disabled}>
                        {
                            if verifying {
                                html! {
                                    <span class="flex items-center justify-center">
                                        <svg class={classes!(styles::LOADING_SPINNER, "-ml-1", "mr-2")} xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24">
                                            <circle class="opacity-25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4"></circle>
                                            <path class="opacity-75" fill="currentColor" d="M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4z"></path>
                                        </svg>
                                        {"確認中..."}
                                    </span>
                                }
                            } else {
                                html! { "認証する" }
                            }
                        }
                    </button>
                </form>

                <p class={styles::TEXT_HINT}>
                    {"※ 認証に成功するとルーレットが開始されます。"}<br/>
                    {"一度認証された番号は使用済みとなります。"}
                </p>
            </div>
        </div>
    }
}
