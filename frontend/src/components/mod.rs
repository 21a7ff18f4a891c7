pub mod confetti;
pub mod controls;
pub mod debug_menu;
pub mod reel_math;
pub mod result_screen;
pub mod roulette_reel;
pub mod title_screen;

pub use confetti::Confetti;
pub use controls::Controls;
pub use debug_menu::DebugMenu;
pub use result_screen::ResultScreen;
pub use roulette_reel::RouletteReel;
pub use title_screen::TitleScreen;
