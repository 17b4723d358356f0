//! Tutorial session: everything the page mutates, owned in one place.
//!
//! Browser events are translated into a single `UserAction` and handed to
//! `Session::dispatch`. The returned `Effect` tells the DOM layer which part of
//! the page to redraw from the session state. Runs are started here and advanced
//! one token at a time through `advance`, so the caller decides the pacing.

use crate::config::TutorialConfig;
use crate::editor::{self, CodeError};
use crate::error::TutorialError;
use crate::map::MapState;
use crate::sequence::SequenceBuilder;
use crate::sim::{ActionToken, Run, RunOutcome, Step, World};
use tracing::{debug, info, warn};

const SPEECH_GREETING: &str = "Hi! I'll show you how to teach me using code 🎮";
const SPEECH_TIP: &str = "Tip: Use drag & drop for Levels 1–2, then type in Level 3.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Tutorial,
    Land,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Blocks,
    Typing,
}

impl Mode {
    /// Parse a mode button's `data-mode` value. Anything but `blocks` is typing.
    pub fn from_data(value: &str) -> Self {
        if value == "blocks" { Mode::Blocks } else { Mode::Typing }
    }
}

/// Inbound event, one per user gesture the page reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    /// Space bar; ignored while an input field has focus.
    Space { typing_in_field: bool },
    ShowMap,
    SetMode(Mode),
    ToggleSpeech,
    DropChip(String),
    RemoveChip(u32),
    ClearSequence,
    RunSequence,
    LoadExample,
    RunCode(String),
    SelectLand(usize),
    PrevLand,
    NextLand,
    ToggleMapCoin(usize),
    CollectAllCoins,
}

/// Which part of the page needs redrawing after a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Nothing,
    Screen,
    Mode,
    Speech,
    /// Chip list changed; the payload is the id of a newly added chip.
    Sequence(Option<u32>),
    /// Sequence, practice row and log were reset.
    Cleared,
    /// A run was started under this generation.
    RunStarted(u64),
    Example,
    Map,
}

/// Result of advancing the active run by one token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Step(Step),
    Done(RunOutcome),
}

pub struct Session {
    config: TutorialConfig,
    world: World,
    sequence: SequenceBuilder,
    map: MapState,
    screen: Screen,
    mode: Mode,
    show_tip: bool,
    active: Option<Run>,
    generation: u64,
}

impl Session {
    pub fn new(config: TutorialConfig) -> Result<Self, TutorialError> {
        config.validate()?;
        let world = World::from_config(&config)?;
        let map = MapState::new(config.map_coins, config.portal_threshold);
        Ok(Self {
            config,
            world,
            sequence: SequenceBuilder::new(),
            map,
            screen: Screen::Tutorial,
            mode: Mode::Blocks,
            show_tip: false,
            active: None,
            generation: 0,
        })
    }

    pub fn config(&self) -> &TutorialConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn sequence(&self) -> &SequenceBuilder {
        &self.sequence
    }

    pub fn map(&self) -> &MapState {
        &self.map
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn speech(&self) -> &'static str {
        if self.show_tip { SPEECH_TIP } else { SPEECH_GREETING }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Derived on every call: map coins, or a finished practice run that collected
    /// enough coins.
    pub fn portal_active(&self) -> bool {
        self.map.portal_active() || (self.active.is_none() && self.world.portal_active())
    }

    pub fn dispatch(&mut self, action: UserAction) -> Result<Effect, TutorialError> {
        debug!(?action, "dispatch");
        match action {
            UserAction::Space { typing_in_field: true } => Ok(Effect::Nothing),
            UserAction::Space { typing_in_field: false } => match self.screen {
                Screen::Tutorial => {
                    self.screen = Screen::Land;
                    Ok(Effect::Screen)
                }
                Screen::Land => {
                    self.map.next();
                    Ok(Effect::Map)
                }
            },
            UserAction::ShowMap => {
                self.screen = Screen::Land;
                Ok(Effect::Screen)
            }
            UserAction::SetMode(mode) => {
                self.mode = mode;
                Ok(Effect::Mode)
            }
            UserAction::ToggleSpeech => {
                self.show_tip = !self.show_tip;
                Ok(Effect::Speech)
            }
            UserAction::DropChip(code) => {
                let id = self.sequence.push(code);
                Ok(Effect::Sequence(Some(id)))
            }
            UserAction::RemoveChip(id) => {
                self.sequence.remove(id);
                Ok(Effect::Sequence(None))
            }
            UserAction::ClearSequence => {
                self.clear();
                Ok(Effect::Cleared)
            }
            UserAction::RunSequence => {
                if self.sequence.is_empty() {
                    warn!("run requested with an empty sequence");
                    return Err(TutorialError::EmptySequence);
                }
                let tokens = self.sequence.tokens(self.config.repeat_fallback);
                Ok(Effect::RunStarted(self.start_run(tokens)))
            }
            UserAction::LoadExample => Ok(Effect::Example),
            UserAction::RunCode(source) => {
                let source = source.trim();
                if source.is_empty() {
                    return Err(TutorialError::EmptyCode);
                }
                editor::check_code(source).inspect_err(|e: &CodeError| {
                    info!(reason = %e, "code check failed");
                })?;
                Ok(Effect::RunStarted(self.start_run(editor::demo_actions())))
            }
            UserAction::SelectLand(idx) => {
                self.map.select(idx);
                Ok(Effect::Map)
            }
            UserAction::PrevLand => {
                self.map.prev();
                Ok(Effect::Map)
            }
            UserAction::NextLand => {
                self.map.next();
                Ok(Effect::Map)
            }
            UserAction::ToggleMapCoin(idx) => {
                if self.map.toggle_coin(idx).is_none() {
                    warn!(idx, coins = self.map.coins().len(), "map coin out of range");
                }
                Ok(Effect::Map)
            }
            UserAction::CollectAllCoins => {
                self.map.collect_all();
                info!(portal = self.map.portal_active(), "all map coins collected");
                Ok(Effect::Map)
            }
        }
    }

    /// Abandon any run and put the practice row back to its initial state.
    pub fn clear(&mut self) {
        self.sequence.clear();
        self.abort_run();
        self.world.reset();
        info!("sequence cleared");
    }

    fn abort_run(&mut self) {
        if self.active.take().is_some() {
            debug!(generation = self.generation, "run abandoned");
        }
        self.generation += 1;
    }

    fn start_run(&mut self, tokens: Vec<ActionToken>) -> u64 {
        self.abort_run();
        info!(tokens = tokens.len(), generation = self.generation, "starting run");
        self.active = Some(Run::start(tokens, &mut self.world));
        self.generation
    }

    /// Execute one token of the run started under `generation`. Returns `None`
    /// when that run was cleared or replaced, so stale timers stop quietly.
    pub fn advance(&mut self, generation: u64) -> Option<Tick> {
        if generation != self.generation {
            return None;
        }
        let run = self.active.as_mut()?;
        if let Some(step) = run.step(&mut self.world) {
            return Some(Tick::Step(step));
        }
        let run = self.active.take()?;
        Some(Tick::Done(run.finish(&mut self.world)))
    }
}
