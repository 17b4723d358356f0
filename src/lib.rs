//! Coin Quest core crate.
//!
//! A tutorial page that teaches sequencing with a Mario-style practice row: blocks
//! are dragged into a sequence (or a method is typed into the editor) and replayed
//! step by step, collecting coins until the portal opens. A land map lets the
//! learner browse levels and collect coins by hand.
//!
//! The simulation, sequence, editor check, map and session state are plain Rust and
//! run natively; `dom` wires them to the page when built for the browser.

use wasm_bindgen::prelude::*;

pub mod config;
mod dom;
pub mod editor;
pub mod error;
pub mod logging;
pub mod map;
pub mod sequence;
pub mod session;
pub mod sim;

pub use config::TutorialConfig;
pub use error::TutorialError;
pub use session::{Session, UserAction};
pub use sim::{ActionKind, ActionToken, RunOutcome, World, run};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Wire the page with the default configuration.
#[wasm_bindgen]
pub fn start_tutorial() -> Result<(), JsValue> {
    let config = TutorialConfig::default();
    logging::init(&config.log_level);
    dom::start(config)
}

/// Wire the page with a JSON configuration; missing keys keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_tutorial_with_config(json: &str) -> Result<(), JsValue> {
    let config = TutorialConfig::from_json(json)?;
    logging::init(&config.log_level);
    dom::start(config)
}

/// Synchronous run of code strings on a fresh world built from the default
/// configuration. Returns the execution log joined by newlines.
#[wasm_bindgen]
pub fn simulate(codes: Vec<String>) -> Result<String, JsValue> {
    let config = TutorialConfig::default();
    if codes.is_empty() {
        return Err(TutorialError::EmptySequence.into());
    }
    let mut world = World::from_config(&config)?;
    let tokens = codes
        .into_iter()
        .map(|code| ActionToken::parse(code, config.repeat_fallback));
    Ok(run(tokens, &mut world).log.join("\n"))
}
