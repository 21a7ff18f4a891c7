pub const CONTAINER: &str = "min-h-screen w-full bg-gradient-to-b from-slate-900 via-blue-900 to-slate-900 text-white px-4 sm:px-6 lg:px-8";
pub const CONTAINER_SM: &str = "max-w-md mx-auto px-4 sm:px-6 py-8";
pub const STAGE: &str = "max-w-md mx-auto flex flex-col items-center gap-8 py-10";
pub const CARD: &str = "bg-white/10 backdrop-blur-md border border-white/20 rounded-2xl shadow-xl p-6 w-full";
pub const CARD_ERROR: &str = "bg-red-900/50 border border-red-800 rounded-lg p-4 text-red-200 text-sm";
pub const BUTTON_PRIMARY: &str = "w-full py-3 px-4 text-lg font-bold text-white bg-gradient-to-r from-pink-500 to-orange-400 hover:from-pink-600 hover:to-orange-500 rounded-full shadow-lg transition-all duration-200 transform hover:translate-y-[-1px] disabled:opacity-50 disabled:cursor-not-allowed disabled:transform-none";
pub const BUTTON_START: &str = "w-48 py-4 text-2xl font-black tracking-widest text-white rounded-full bg-gradient-to-r from-emerald-400 to-cyan-500 shadow-[0_0_24px_rgba(45,212,191,0.6)] hover:scale-105 transition-transform duration-200";
pub const BUTTON_STOP: &str = "w-48 py-4 text-2xl font-black tracking-widest text-white rounded-full bg-gradient-to-r from-red-500 to-pink-500 shadow-[0_0_24px_rgba(244,63,94,0.6)] hover:scale-105 transition-transform duration-200 disabled:opacity-50 disabled:hover:scale-100";
pub const INPUT: &str = "mt-2 block w-full rounded-lg border-0 bg-slate-900/80 py-3 px-4 text-lg text-white shadow-sm ring-1 ring-inset ring-white/30 placeholder:text-gray-500 focus:ring-2 focus:ring-pink-400";
pub const FORM: &str = "mt-6 space-y-4";
pub const TEXT_TITLE: &str = "text-4xl sm:text-5xl font-black text-center leading-tight text-transparent bg-clip-text bg-gradient-to-r from-yellow-300 via-pink-400 to-orange-400";
pub const TEXT_SUBTITLE: &str = "text-xl text-center text-white/90 mt-2";
pub const TEXT_LABEL: &str = "block text-sm font-medium text-white/90";
pub const TEXT_HINT: &str = "text-xs text-white/60 mt-4 leading-relaxed";
pub const TEXT_BODY: &str = "text-white/80 leading-relaxed";
pub const TEXT_SMALL: &str = "text-sm text-white/60";
pub const LOADING_SPINNER: &str = "animate-spin h-5 w-5 text-white";

// Reel
pub const REEL_WINDOW: &str = "relative w-full h-[400px] overflow-hidden rounded-2xl border-4 border-yellow-400/80 bg-slate-950 shadow-[0_0_40px_rgba(250,204,21,0.35)]";
pub const REEL_STRIP: &str = "absolute inset-x-0 top-0 will-change-transform";
pub const REEL_ITEM: &str = "h-[120px] flex items-center justify-center px-4 text-3xl sm:text-5xl font-black text-center drop-shadow-[0_2px_4px_rgba(0,0,0,0.8)]";
pub const REEL_FADE_TOP: &str = "pointer-events-none absolute inset-x-0 top-0 h-24 bg-gradient-to-b from-slate-950 to-transparent z-10";
pub const REEL_FADE_BOTTOM: &str = "pointer-events-none absolute inset-x-0 bottom-0 h-24 bg-gradient-to-t from-slate-950 to-transparent z-10";
pub const REEL_MARKER: &str = "pointer-events-none absolute inset-x-0 top-1/2 -translate-y-1/2 h-[120px] border-y-2 border-yellow-300/70 z-20";

// Result
pub const RESULT_CARD: &str = "bg-white/10 backdrop-blur-md border border-white/20 rounded-2xl shadow-xl p-6 w-full text-center space-y-4";
pub const RESULT_HEADLINE: &str = "text-3xl font-black";
pub const COUPON_BOX: &str = "w-full rounded-xl border-2 border-dashed border-yellow-300 bg-yellow-300/10 px-4 py-3 hover:bg-yellow-300/20 transition-colors duration-200 cursor-pointer";
pub const COUPON_CODE: &str = "block font-mono text-2xl tracking-widest text-yellow-200";
pub const REVIEW_BOX: &str = "rounded-xl bg-blue-950/60 border border-blue-400/30 p-4 text-left text-sm space-y-2";

// Debug menu
pub const DEBUG_TOGGLE: &str = "fixed bottom-4 right-4 z-50 w-12 h-12 rounded-full bg-slate-800/90 border border-white/20 text-2xl shadow-lg hover:bg-slate-700";
pub const DEBUG_PANEL: &str = "fixed bottom-20 right-4 z-50 w-64 rounded-xl bg-slate-800/95 border border-white/20 p-4 space-y-3 text-sm shadow-xl";
pub const DEBUG_SELECT: &str = "block w-full rounded-lg bg-slate-900 py-2 px-3 text-white ring-1 ring-inset ring-white/30 disabled:opacity-50";

pub const CONFETTI_CANVAS: &str = "pointer-events-none fixed inset-0 z-40";
