use js_sys::Reflect;
use serde_json::json;
use shared::constants::EVENT_COUPON_COPY;
use shared::prize::{Category, PrizeOutcome};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;

use crate::api;
use crate::hooks::{continue_spin, use_game};
use crate::styles;

pub const CONTACT_EMAIL: &str = "salvadorcoffeebar@gmail.com";

/// `navigator.clipboard.writeText`, looked up dynamically since the
/// Clipboard API is missing on insecure origins.
fn copy_to_clipboard(text: &str) -> bool {
    let Some(window) = window() else {
        return false;
    };
    let navigator = window.navigator();
    Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .ok()
        .filter(|clipboard| !clipboard.is_undefined())
        .and_then(|clipboard| {
            Reflect::get(&clipboard, &JsValue::from_str("writeText"))
                .ok()
                .and_then(|write| write.dyn_into::<js_sys::Function>().ok())
                .and_then(|write| write.call1(&clipboard, &JsValue::from_str(text)).ok())
        })
        .is_some()
}

#[derive(Properties, PartialEq)]
struct CouponProps {
    code: &'static str,
    #[prop_or_default]
    caption: Option<&'static str>,
}

#[function_component(Coupon)]
fn coupon(props: &CouponProps) -> Html {
    let copied = use_state(|| false);
    let code = props.code;

    let on_click = {
        let copied = copied.clone();
        Callback::from(move |_: MouseEvent| {
            if copy_to_clipboard(code) {
                copied.set(true);
            }
            api::log_event(EVENT_COUPON_COPY, json!({ "coupon_code": code }), None);
        })
    };

    html! {
        <div class="space-y-3">
            { props.caption.map(|caption| html! { <p class={styles::TEXT_BODY}>{caption}</p> }) }
            <button type="button" class={styles::COUPON_BOX} onclick={on_click}>
                <span class="block text-xs uppercase tracking-widest text-white/50">{"Coupon Code"}</span>
                <span class={styles::COUPON_CODE}>{code}</span>
                <span class={styles::TEXT_SMALL}>
                    { if *copied { "コピーしました！" } else { "クリックしてコピー" } }
                </span>
            </button>
        </div>
    }
}

fn review_prompt() -> Html {
    html! {
        <div class={styles::REVIEW_BOX}>
            <p class="text-base font-medium text-blue-200 text-center">
                {"オンラインショップにレビューを投稿すると"}<br/>
                {"さらに3回ルーレットを回すことができます！"}
            </p>
            <ul class="space-y-2 text-white/70">
                <li>
                    <strong>{"A. PayIDで購入した方："}</strong><br/>
                    {"注文履歴からレビュー投稿ができます。"}
                </li>
                <li>
                    <strong>{"B. ウェブから購入した方："}</strong><br/>
                    {"発送通知メールからレビュー投稿ができます。"}
                </li>
            </ul>
            <p class="pt-2 border-t border-white/10 font-bold text-cyan-200">{"再挑戦の方法"}</p>
            <p class="text-white/70">
                {"レビュー投稿後、24時間以内に3クレジット追加されるので、"}
                {"再度同じ注文IDでチャレンジしてみてください◎"}
            </p>
        </div>
    }
}

fn full_prize_instructions() -> Html {
    html! {
        <div class="space-y-4 text-yellow-100">
            <p class="text-xl font-bold">{"おめでとうございます！"}</p>
            <p>
                {"ご当選の確認のため、"}<br/>
                <span class="font-bold text-white border-b border-yellow-400">{"この画面のスクリーンショット"}</span><br/>
                {"を保存してください。"}
            </p>
            <div class="bg-black/30 p-4 rounded-xl text-sm space-y-2">
                <p class="text-yellow-200">{"画像の送付先"}</p>
                <code class="block bg-black/40 p-3 rounded font-mono select-all text-white">{CONTACT_EMAIL}</code>
                <p class="text-white/50 text-xs">{"上記メールアドレス宛にスクリーンショットをお送りください。"}</p>
            </div>
        </div>
    }
}

fn prize_body(outcome: &PrizeOutcome) -> Html {
    let headline = html! {
        <h2 class={styles::RESULT_HEADLINE} style={format!("color: {};", outcome.color)}>
            {outcome.label}
        </h2>
    };

    match outcome.category {
        Category::Full => html! {
            <>
                <div class="text-6xl">{"🏆"}</div>
                {headline}
                {full_prize_instructions()}
            </>
        },
        Category::Geisha | Category::Cashback100 => {
            let caption = if outcome.category == Category::Geisha {
                "次回の注文時に入力するとゲイシャが無料で同封されます！"
            } else {
                "次回の注文でご利用ください！"
            };
            html! {
                <>
                    <div class="text-6xl">{"🎉"}</div>
                    {headline}
                    {
                        outcome.coupon_code.map(|code| html! {
                            <Coupon code={code} caption={Some(caption)} />
                        })
                    }
                    {review_prompt()}
                </>
            }
        }
        Category::RetryCredit => html! {
            <>
                <div class="text-6xl">{"🎟️"}</div>
                {headline}
                <p class={styles::TEXT_BODY}>{"もう一回ルーレットを回せます！"}</p>
            </>
        },
        Category::Lose => html! {
            <>
                <div class="text-6xl">{"😢"}</div>
                {headline}
                {review_prompt()}
            </>
        },
    }
}

#[function_component(ResultScreen)]
pub fn result_screen() -> Html {
    let Some(game) = use_game() else {
        return html! {};
    };
    let Some(outcome) = game.session.outcome() else {
        return html! {};
    };
    let remaining = game.session.remaining_spins();

    let on_continue = {
        let game = game.clone();
        Callback::from(move |_: MouseEvent| {
            if game.verifying {
                return;
            }
            spawn_local(continue_spin(game.clone()));
        })
    };

    html! {
        <div class={styles::RESULT_CARD}>
            {prize_body(outcome)}

            {
                game.notice.clone().map(|notice| html! {
                    <div class={styles::CARD_ERROR} role="alert">{notice}</div>
                })
            }

            if remaining > 0 {
                <button class={styles::BUTTON_PRIMARY} onclick={on_continue} disabled={game.verifying}>
                    {"もう一回回す！ "}
                    <span class="ml-2 bg-white/20 px-2 py-0.5 rounded text-sm">
                        {format!("あと {} 回", remaining)}
                    </span>
                </button>
            }
        </div>
    }
}
