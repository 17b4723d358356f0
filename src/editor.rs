//! Typing mode (level 3). The "syntax check" is a heuristic, not a parser: braces
//! must balance and the method has to mention at least one known action.

use crate::sim::ActionToken;
use thiserror::Error;

/// Inserted by the "example" button.
pub const EXAMPLE_CODE: &str = "public void collectRowOfCoins() {\n  for (int i = 0; i < 4; i++) {\n    moveForward();\n    collectCoin();\n  }\n}";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodeError {
    #[error("Syntax: missing {{ or }}")]
    UnbalancedBraces,
    #[error("Try using moveForward() and collectCoin() in your method.")]
    NoActions,
}

/// Message shown once the check passes and the demo starts.
pub const CHECK_PASSED: &str = "Code looks good — running demo (simulated)...";

/// Check trimmed, non-empty source.
pub fn check_code(source: &str) -> Result<(), CodeError> {
    let open = source.matches('{').count();
    let close = source.matches('}').count();
    if open != close {
        return Err(CodeError::UnbalancedBraces);
    }
    if !source.contains("moveForward") && !source.contains("collectCoin") {
        return Err(CodeError::NoActions);
    }
    Ok(())
}

/// What runs after a passing check: three move-then-collect pairs, whatever was typed.
pub fn demo_actions() -> Vec<ActionToken> {
    (0..3)
        .flat_map(|_| [ActionToken::move_forward(), ActionToken::collect_coin()])
        .collect()
}
