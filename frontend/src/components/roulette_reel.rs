use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use shared::game_session::Phase;
use shared::prize::Category;
use web_sys::HtmlElement;
use yew::prelude::*;

use super::reel_math::{
    spin_offset, stop_offset, stopping_offset, target_index, REPEAT_COUNT, SETTLE_DELAY_MS,
    STOP_DURATION_MS,
};
use crate::animation::FrameLoop;
use crate::styles;

#[derive(Properties, PartialEq)]
pub struct RouletteReelProps {
    pub sequence: Vec<Category>,
    pub phase: Phase,
    pub outcome: Option<Category>,
    /// Fired once the reel has come to rest after a stop.
    pub on_settled: Callback<()>,
}

fn place(strip: &NodeRef, offset: f64) {
    if let Some(element) = strip.cast::<HtmlElement>() {
        let _ = element
            .style()
            .set_property("transform", &format!("translateY({}px)", offset));
    }
}

#[function_component(RouletteReel)]
pub fn roulette_reel(props: &RouletteReelProps) -> Html {
    let strip = use_node_ref();
    let offset = use_mut_ref(|| 0.0_f64);

    {
        let strip = strip.clone();
        let offset = offset.clone();
        let sequence = props.sequence.clone();
        let on_settled = props.on_settled.clone();

        use_effect_with((props.phase, props.outcome), move |(phase, outcome)| {
            let len = sequence.len();
            let mut frames: Option<FrameLoop> = None;
            let mut settle: Option<Timeout> = None;

            match (phase, outcome) {
                (Phase::Idle, _) => {
                    *offset.borrow_mut() = 0.0;
                    place(&strip, 0.0);
                }
                (Phase::Spinning, _) => {
                    let started = Rc::new(Cell::new(None::<f64>));
                    let strip = strip.clone();
                    let offset = offset.clone();
                    frames = Some(FrameLoop::start(move |now| {
                        let start = started.get().unwrap_or_else(|| {
                            started.set(Some(now));
                            now
                        });
                        let y = spin_offset(now - start, len);
                        *offset.borrow_mut() = y;
                        place(&strip, y);
                        true
                    }));
                }
                (Phase::Stopping, Some(category)) => {
                    let from = *offset.borrow();
                    let to = match target_index(&sequence, *category) {
                        Some(index) => stop_offset(len, index),
                        None => {
                            log::warn!("{} is not on the reel", category);
                            from
                        }
                    };
                    let started = Rc::new(Cell::new(None::<f64>));
                    let strip = strip.clone();
                    let offset = offset.clone();
                    frames = Some(FrameLoop::start(move |now| {
                        let start = started.get().unwrap_or_else(|| {
                            started.set(Some(now));
                            now
                        });
                        let elapsed = now - start;
                        let y = stopping_offset(from, to, elapsed);
                        *offset.borrow_mut() = y;
                        place(&strip, y);
                        elapsed < STOP_DURATION_MS
                    }));
                    settle = Some(Timeout::new(
                        STOP_DURATION_MS as u32 + SETTLE_DELAY_MS,
                        move || on_settled.emit(()),
                    ));
                }
                // Result keeps the reel where it landed
                _ => place(&strip, *offset.borrow()),
            }

            move || {
                drop(frames);
                drop(settle);
            }
        });
    }

    let items = (0..REPEAT_COUNT).flat_map(|_| props.sequence.iter()).map(|category| {
        let outcome = category.outcome();
        html! {
            <div class={styles::REEL_ITEM} style={format!("color: {};", outcome.color)}>
                {outcome.label}
            </div>
        }
    });

    html! {
        <div class={styles::REEL_WINDOW}>
            <div class={styles::REEL_FADE_TOP}></div>
            <div class={styles::REEL_MARKER}></div>
            <div ref={strip} class={styles::REEL_STRIP}>
                { for items }
            </div>
            <div class={styles::REEL_FADE_BOTTOM}></div>
        </div>
    }
}
