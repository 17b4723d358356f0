// Action tokens
// Classifies the opaque code strings produced by the block builder / editor.
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Code text inserted when a repeat block expands.
pub const MOVE_FORWARD: &str = "moveForward()";
/// Code text the editor demo alternates with `MOVE_FORWARD`.
pub const COLLECT_COIN: &str = "collectCoin()";
/// Largest loop bound honoured; bigger bounds saturate here.
pub const MAX_REPEAT: usize = 1000;

/// Classified meaning of one action token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    MoveForward,
    TurnLeft,
    TurnRight,
    CollectCoin,
    /// Simplified loop: expands into `count` forward moves, nothing else.
    RepeatBlock(usize),
    Unknown,
}

/// A token as the user built it, plus its classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionToken {
    code: String,
    kind: ActionKind,
}

impl ActionToken {
    /// Classify `code`. `repeat_fallback` is the count used when a `for(` block
    /// has no readable loop bound.
    pub fn parse(code: impl Into<String>, repeat_fallback: usize) -> Self {
        let code = code.into();
        let kind = classify(&code, repeat_fallback);
        Self { code, kind }
    }

    pub fn move_forward() -> Self {
        Self { code: MOVE_FORWARD.to_string(), kind: ActionKind::MoveForward }
    }

    pub fn collect_coin() -> Self {
        Self { code: COLLECT_COIN.to_string(), kind: ActionKind::CollectCoin }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Substring checks in a fixed order: a chip like `for(..) moveForward()` is a move,
/// not a loop.
fn classify(code: &str, repeat_fallback: usize) -> ActionKind {
    if code.contains("moveForward") {
        ActionKind::MoveForward
    } else if code.contains("turnLeft") {
        ActionKind::TurnLeft
    } else if code.contains("turnRight") {
        ActionKind::TurnRight
    } else if code.contains("collectCoin") {
        ActionKind::CollectCoin
    } else if code.starts_with("for(") {
        ActionKind::RepeatBlock(repeat_count(code).unwrap_or(repeat_fallback))
    } else {
        ActionKind::Unknown
    }
}

fn loop_bound() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Literal pattern; compiling it cannot fail.
    RE.get_or_init(|| Regex::new(r"i\s*<\s*([0-9]+)").unwrap())
}

/// Loop bound of a `for(int i=0; i<N; i++)` style header, if present, capped at
/// `MAX_REPEAT`.
pub fn repeat_count(code: &str) -> Option<usize> {
    let digits = loop_bound().captures(code)?.get(1)?.as_str();
    // Only overflow can fail on an all-digit capture.
    Some(digits.parse::<usize>().map_or(MAX_REPEAT, |n| n.min(MAX_REPEAT)))
}
