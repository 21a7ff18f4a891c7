use std::cell::Cell;
use std::f64::consts::PI;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use shared::prize::Category;
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::animation::FrameLoop;
use crate::styles;

const CONFETTI_COLORS: [&str; 6] = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#FED766", "#FF69B4", "#00CED1"];
const FIREWORK_COLORS: [&str; 6] = ["#FF0000", "#FFD700", "#FF6347", "#FF1493", "#00FF00", "#00FFFF"];

const PIECES: usize = 15;
const PIECES_FULL: usize = 40;
const BURSTS: usize = 6;
const BURST_PARTICLES: usize = 12;
const BURST_SECONDS: f64 = 1.2;
const FLASH_SECONDS: f64 = 0.6;
const SECOND_WAVE_DELAY: f64 = 2.0;

/// One falling square. Positions are fractions of the viewport, times in seconds.
#[derive(Debug, Clone, PartialEq)]
struct Piece {
    x: f64,
    delay: f64,
    duration: f64,
    size: f64,
    color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PieceFrame {
    y: f64,
    rotation: f64,
    opacity: f64,
}

impl Piece {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.0..1.0),
            delay: rng.gen_range(0.0..0.5),
            duration: rng.gen_range(2.0..4.0),
            size: rng.gen_range(8.0..20.0),
            color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
        }
    }

    fn end(&self) -> f64 {
        self.delay + self.duration
    }

    /// `y` runs from just above the top edge (-0.02) to past the bottom (1.1).
    fn frame(&self, t: f64) -> Option<PieceFrame> {
        let progress = (t - self.delay) / self.duration;
        if !(0.0..=1.0).contains(&progress) {
            return None;
        }
        let opacity = if progress < 0.5 { 1.0 } else { 1.0 - (progress - 0.5) * 2.0 };
        Some(PieceFrame {
            y: -0.02 + progress * 1.12,
            rotation: progress * 4.0 * PI,
            opacity,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Burst {
    x: f64,
    y: f64,
    delay: f64,
    color: &'static str,
    distances: [f64; BURST_PARTICLES],
}

impl Burst {
    fn random<R: Rng + ?Sized>(rng: &mut R, delay: f64, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        let mut distances = [0.0; BURST_PARTICLES];
        for distance in distances.iter_mut() {
            *distance = rng.gen_range(80.0..120.0);
        }
        Self {
            x: rng.gen_range(x_range.0..x_range.1),
            y: rng.gen_range(y_range.0..y_range.1),
            delay,
            color: FIREWORK_COLORS[rng.gen_range(0..FIREWORK_COLORS.len())],
            distances,
        }
    }

    fn end(&self) -> f64 {
        self.delay + BURST_SECONDS
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Everything drawn for one win.
#[derive(Debug, Clone, PartialEq)]
struct Celebration {
    pieces: Vec<Piece>,
    bursts: Vec<Burst>,
}

impl Celebration {
    fn new<R: Rng + ?Sized>(category: Category, rng: &mut R) -> Self {
        let full = category == Category::Full;
        let count = if full { PIECES_FULL } else { PIECES };
        let pieces = (0..count).map(|_| Piece::random(rng)).collect();

        let mut bursts = Vec::new();
        if full {
            for i in 0..BURSTS {
                bursts.push(Burst::random(rng, i as f64 * 0.3, (0.15, 0.85), (0.2, 0.6)));
            }
            for i in 0..BURSTS {
                let delay = i as f64 * 0.3 + SECOND_WAVE_DELAY;
                bursts.push(Burst::random(rng, delay, (0.2, 0.8), (0.15, 0.65)));
            }
        }
        Self { pieces, bursts }
    }

    fn duration(&self) -> f64 {
        self.pieces
            .iter()
            .map(Piece::end)
            .chain(self.bursts.iter().map(Burst::end))
            .fold(0.0, f64::max)
    }

    fn draw(&self, context: &CanvasRenderingContext2d, width: f64, height: f64, t: f64) {
        for piece in &self.pieces {
            let Some(frame) = piece.frame(t) else {
                continue;
            };
            context.save();
            context.set_global_alpha(frame.opacity);
            let _ = context.translate(piece.x * width, frame.y * height);
            let _ = context.rotate(frame.rotation);
            context.set_fill_style_str(piece.color);
            context.fill_rect(-piece.size / 2.0, -piece.size / 2.0, piece.size, piece.size);
            context.restore();
        }

        for burst in &self.bursts {
            let elapsed = t - burst.delay;
            if !(0.0..=BURST_SECONDS).contains(&elapsed) {
                continue;
            }
            let center_x = burst.x * width;
            let center_y = burst.y * height;
            let progress = ease_out_cubic(elapsed / BURST_SECONDS);

            context.save();
            context.set_fill_style_str(burst.color);
            context.set_shadow_color(burst.color);
            context.set_shadow_blur(6.0);

            if elapsed < FLASH_SECONDS {
                let flash = elapsed / FLASH_SECONDS;
                // grows to twice its size, then collapses
                let radius = 8.0 * (1.0 - (2.0 * flash - 1.0).abs()) * 2.0;
                context.set_global_alpha(1.0 - flash);
                context.begin_path();
                let _ = context.arc(center_x, center_y, radius, 0.0, 2.0 * PI);
                context.fill();
            }

            context.set_global_alpha(if progress < 0.66 { 1.0 } else { (1.0 - progress) * 3.0 });
            for (i, distance) in burst.distances.iter().enumerate() {
                let angle = 2.0 * PI * i as f64 / BURST_PARTICLES as f64;
                let x = center_x + angle.cos() * distance * progress;
                let y = center_y + angle.sin() * distance * progress;
                context.begin_path();
                let _ = context.arc(x, y, 4.0 * (1.0 - progress * 0.5), 0.0, 2.0 * PI);
                context.fill();
            }
            context.restore();
        }
    }
}

fn canvas_context(canvas_ref: &NodeRef) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let canvas = canvas_ref.cast::<HtmlCanvasElement>()?;
    let context = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some((canvas, context))
}

#[derive(Properties, PartialEq)]
pub struct ConfettiProps {
    pub category: Category,
}

#[function_component(Confetti)]
pub fn confetti(props: &ConfettiProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with(props.category, move |category| {
            let mut frames = None;

            if let Some((canvas, context)) = canvas_context(&canvas_ref) {
                let (width, height) = window()
                    .map(|w| {
                        (
                            w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
                            w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
                        )
                    })
                    .unwrap_or((0.0, 0.0));
                canvas.set_width(width as u32);
                canvas.set_height(height as u32);

                let celebration = Celebration::new(*category, &mut SmallRng::from_entropy());
                let duration = celebration.duration();
                let started = Cell::new(None::<f64>);
                frames = Some(FrameLoop::start(move |now| {
                    let start = started.get().unwrap_or_else(|| {
                        started.set(Some(now));
                        now
                    });
                    let t = (now - start) / 1000.0;
                    context.clear_rect(0.0, 0.0, width, height);
                    if t > duration {
                        return false;
                    }
                    celebration.draw(&context, width, height, t);
                    true
                }));
            }

            move || drop(frames)
        });
    }

    html! {
        <canvas ref={canvas_ref} class={styles::CONFETTI_CANVAS}></canvas>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn test_full_prize_gets_more_confetti_and_two_firework_waves() {
        let mut rng = StdRng::seed_from_u64(11);
        let full = Celebration::new(Category::Full, &mut rng);
        assert_eq!(full.pieces.len(), PIECES_FULL);
        assert_eq!(full.bursts.len(), BURSTS * 2);
        assert!(full.bursts[BURSTS..].iter().all(|b| b.delay >= SECOND_WAVE_DELAY));

        let geisha = Celebration::new(Category::Geisha, &mut rng);
        assert_eq!(geisha.pieces.len(), PIECES);
        assert!(geisha.bursts.is_empty());
    }

    #[test]
    fn test_pieces_stay_within_their_window() {
        let mut rng = StdRng::seed_from_u64(12);
        let celebration = Celebration::new(Category::Cashback100, &mut rng);
        for piece in &celebration.pieces {
            assert!((2.0..4.0).contains(&piece.duration));
            assert!(piece.frame(piece.delay - 0.01).is_none());
            assert!(piece.frame(piece.end() + 0.01).is_none());
            let last = piece.frame(piece.delay + piece.duration * 0.999).unwrap();
            assert!(last.opacity < 0.01);
            assert!((last.rotation - 4.0 * PI).abs() < 0.02);
        }
        assert!(celebration.duration() <= 4.5);
    }

    #[test]
    fn test_duration_covers_second_wave() {
        let mut rng = StdRng::seed_from_u64(13);
        let full = Celebration::new(Category::Full, &mut rng);
        let last_burst = (BURSTS - 1) as f64 * 0.3 + SECOND_WAVE_DELAY + BURST_SECONDS;
        assert!(full.duration() >= last_burst - 1e-9);
    }
}
