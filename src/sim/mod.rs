//! Step simulation behind the "run sequence" button.
//!
//! A `World` is a single row of cells, some holding a coin, with Mario standing on
//! one of them. A run replays action tokens against it one at a time, producing an
//! execution log and, once the queue is empty, the portal state.
//!
//! Two ways to drive a run:
//! - `run()` executes everything synchronously and returns the `RunOutcome`.
//! - `Run` keeps the queue and log between calls so a driver can call `step()` on
//!   a timer; `Steps` wraps it as an `Iterator` over a borrowed world.
//!
//! Both produce the same outcome for the same input; pacing never affects state.

pub mod action;

pub use action::{ActionKind, ActionToken};

use crate::config::TutorialConfig;
use crate::error::TutorialError;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Coins needed before the portal opens.
pub const PORTAL_THRESHOLD: usize = 3;

/// Portal state is always derived from the collected count, never stored.
pub fn portal_active(collected: usize, threshold: usize) -> bool {
    collected >= threshold
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub index: usize,
    pub has_coin: bool,
    collected: bool,
}

impl Cell {
    pub fn collected(&self) -> bool {
        self.collected
    }
}

/// The simulated row of cells plus the cursor (Mario's position).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    cells: Vec<Cell>,
    cursor: usize,
    portal_threshold: usize,
}

impl World {
    pub fn new(len: usize, coin_cells: &[usize]) -> Result<Self, TutorialError> {
        if len == 0 {
            return Err(TutorialError::InvalidConfig("world needs at least one cell".into()));
        }
        if let Some(bad) = coin_cells.iter().find(|&&i| i >= len) {
            return Err(TutorialError::InvalidConfig(format!(
                "coin cell {bad} is outside a world of {len} cells"
            )));
        }
        let cells = (0..len)
            .map(|index| Cell { index, has_coin: coin_cells.contains(&index), collected: false })
            .collect();
        Ok(Self { cells, cursor: 0, portal_threshold: PORTAL_THRESHOLD })
    }

    pub fn from_config(config: &TutorialConfig) -> Result<Self, TutorialError> {
        let mut world = Self::new(config.cells, &config.coin_cells)?;
        world.portal_threshold = config.portal_threshold;
        Ok(world)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    // Never true: construction rejects empty worlds.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn portal_threshold(&self) -> usize {
        self.portal_threshold
    }

    pub fn collected_count(&self) -> usize {
        self.cells.iter().filter(|c| c.collected).count()
    }

    pub fn portal_active(&self) -> bool {
        portal_active(self.collected_count(), self.portal_threshold)
    }

    /// Back to the initial state: cursor on cell 0, no coin collected.
    pub fn reset(&mut self) {
        self.cursor = 0;
        for cell in &mut self.cells {
            cell.collected = false;
        }
    }

    fn move_forward(&mut self) {
        self.cursor = (self.cursor + 1).min(self.cells.len() - 1);
    }

    /// Collect the coin under the cursor; `None` when there is nothing to take.
    fn collect(&mut self) -> Option<usize> {
        let cell = &mut self.cells[self.cursor];
        if cell.has_coin && !cell.collected {
            cell.collected = true;
            Some(cell.index)
        } else {
            None
        }
    }
}

/// One executed token, as seen by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub token: ActionToken,
    /// Cursor after the token ran.
    pub cursor: usize,
    /// Log entries this step appended (the `Executing:` line plus any sub-note).
    pub entries: Vec<String>,
    /// Cell whose coin was collected by this step.
    pub collected: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub final_cursor: usize,
    pub log: Vec<String>,
    pub collected: usize,
    pub portal_active: bool,
}

/// Queue entry. A repeat block leaves a counter instead of `n` materialized moves.
#[derive(Debug)]
enum Pending {
    Token(ActionToken),
    Forward(usize),
}

/// A run in progress. Owns its queue and log; borrows the world only per step.
#[derive(Debug)]
pub struct Run {
    queue: VecDeque<Pending>,
    log: Vec<String>,
    executed: usize,
}

impl Run {
    /// Resets `world` and queues `actions`. Callers reject empty input before
    /// getting here.
    pub fn start<I>(actions: I, world: &mut World) -> Self
    where
        I: IntoIterator<Item = ActionToken>,
    {
        world.reset();
        let queue: VecDeque<Pending> = actions.into_iter().map(Pending::Token).collect();
        debug!(tokens = queue.len(), cells = world.len(), "run started");
        Self { queue, log: Vec::new(), executed: 0 }
    }

    pub fn is_halted(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Execute the token at the front of the queue.
    pub fn step(&mut self, world: &mut World) -> Option<Step> {
        let token = match self.queue.pop_front()? {
            Pending::Token(token) => token,
            Pending::Forward(left) => {
                if left > 1 {
                    self.queue.push_front(Pending::Forward(left - 1));
                }
                ActionToken::move_forward()
            }
        };
        let mut entries = vec![format!("Executing: {token}")];
        let mut collected = None;

        match token.kind() {
            ActionKind::MoveForward => world.move_forward(),
            ActionKind::TurnLeft | ActionKind::TurnRight => entries.push(" (turn)".into()),
            ActionKind::CollectCoin => match world.collect() {
                Some(index) => {
                    collected = Some(index);
                    entries.push(format!(" Collected coin at {index}!"));
                }
                None => entries.push(" Nothing to collect here.".into()),
            },
            // Front insertion: the expansion runs before whatever followed the block.
            ActionKind::RepeatBlock(count) if count > 0 => self.queue.push_front(Pending::Forward(count)),
            ActionKind::RepeatBlock(_) => {}
            ActionKind::Unknown => entries.push(" (unknown)".into()),
        }

        self.executed += 1;
        debug!(token = %token, cursor = world.cursor, "step");
        self.log.extend(entries.iter().cloned());
        Some(Step { token, cursor: world.cursor, entries, collected })
    }

    /// Drain whatever is left, then log completion and compute the portal state.
    pub fn finish(mut self, world: &mut World) -> RunOutcome {
        while self.step(world).is_some() {}
        self.log.push(format!("Done. Mario at cell {}.", world.cursor));
        let outcome = RunOutcome {
            final_cursor: world.cursor,
            log: self.log,
            collected: world.collected_count(),
            portal_active: world.portal_active(),
        };
        info!(
            steps = self.executed,
            cursor = outcome.final_cursor,
            collected = outcome.collected,
            portal = outcome.portal_active,
            "run finished"
        );
        outcome
    }
}

/// Iterator form of a run over a borrowed world.
pub struct Steps<'w> {
    run: Run,
    world: &'w mut World,
}

impl<'w> Steps<'w> {
    pub fn new<I>(actions: I, world: &'w mut World) -> Self
    where
        I: IntoIterator<Item = ActionToken>,
    {
        let run = Run::start(actions, world);
        Self { run, world }
    }

    pub fn finish(self) -> RunOutcome {
        self.run.finish(self.world)
    }
}

impl Iterator for Steps<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        self.run.step(self.world)
    }
}

/// Run `actions` to completion against `world`.
pub fn run<I>(actions: I, world: &mut World) -> RunOutcome
where
    I: IntoIterator<Item = ActionToken>,
{
    Run::start(actions, world).finish(world)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(codes: &[&str]) -> Vec<ActionToken> {
        codes.iter().map(|c| ActionToken::parse(*c, 2)).collect()
    }

    #[test]
    fn world_rejects_zero_cells_and_stray_coins() {
        assert!(World::new(0, &[]).is_err());
        assert!(World::new(3, &[3]).is_err());
        let w = World::new(3, &[2]).unwrap();
        assert_eq!(w.len(), 3);
        assert!(w.cells()[2].has_coin);
        assert!(!w.cells()[0].has_coin);
    }

    #[test]
    fn forward_moves_clamp_at_last_cell() {
        for moves in 0..9 {
            let mut world = World::new(5, &[]).unwrap();
            let actions = vec![ActionToken::move_forward(); moves];
            let outcome = run(actions, &mut world);
            assert_eq!(outcome.final_cursor, moves.min(4));
        }
    }

    #[test]
    fn single_cell_world_never_moves() {
        let mut world = World::new(1, &[0]).unwrap();
        let outcome = run(tokens(&["moveForward()", "collectCoin()"]), &mut world);
        assert_eq!(outcome.final_cursor, 0);
        assert_eq!(outcome.collected, 1);
    }

    #[test]
    fn collect_on_empty_cell_changes_nothing() {
        let mut world = World::new(5, &[2]).unwrap();
        let outcome = run(tokens(&["collectCoin()"]), &mut world);
        assert_eq!(
            outcome.log,
            vec!["Executing: collectCoin()", " Nothing to collect here.", "Done. Mario at cell 0."]
        );
        assert_eq!(world.collected_count(), 0);
    }

    #[test]
    fn coin_is_collected_once() {
        let mut world = World::new(3, &[1]).unwrap();
        let outcome = run(tokens(&["moveForward()", "collectCoin()", "collectCoin()"]), &mut world);
        assert_eq!(
            outcome.log,
            vec![
                "Executing: moveForward()",
                "Executing: collectCoin()",
                " Collected coin at 1!",
                "Executing: collectCoin()",
                " Nothing to collect here.",
                "Done. Mario at cell 1.",
            ]
        );
        assert_eq!(outcome.collected, 1);
        assert!(world.cells()[1].collected());
    }

    #[test]
    fn two_coins_do_not_open_portal() {
        let mut world = World::new(5, &[2, 4]).unwrap();
        let outcome = run(
            tokens(&[
                "moveForward()",
                "moveForward()",
                "collectCoin()",
                "moveForward()",
                "moveForward()",
                "collectCoin()",
            ]),
            &mut world,
        );
        assert_eq!(outcome.final_cursor, 4);
        assert_eq!(outcome.collected, 2);
        assert!(world.cells()[2].collected() && world.cells()[4].collected());
        assert!(!outcome.portal_active);
    }

    #[test]
    fn three_coins_open_portal_and_reset_closes_it() {
        let mut world = World::new(5, &[1, 2, 3]).unwrap();
        let demo = tokens(&[
            "moveForward()",
            "collectCoin()",
            "moveForward()",
            "collectCoin()",
            "moveForward()",
            "collectCoin()",
        ]);
        assert!(run(demo, &mut world).portal_active);
        // A fresh run starts from a reset world; the portal is not sticky.
        let outcome = run(tokens(&["moveForward()"]), &mut world);
        assert!(!outcome.portal_active);
        assert_eq!(outcome.collected, 0);
    }

    #[test]
    fn repeat_block_expands_to_forward_moves() {
        let mut world = World::new(5, &[]).unwrap();
        let outcome = run(tokens(&["for(int i=0; i<3; i++)"]), &mut world);
        assert_eq!(outcome.final_cursor, 3);

        let mut a = World::new(6, &[4]).unwrap();
        let mut b = World::new(6, &[4]).unwrap();
        let looped = run(tokens(&["for(int i=0; i<4; i++)", "collectCoin()"]), &mut a);
        let unrolled = run(
            tokens(&["moveForward()", "moveForward()", "moveForward()", "moveForward()", "collectCoin()"]),
            &mut b,
        );
        assert_eq!(looped.final_cursor, unrolled.final_cursor);
        assert_eq!(looped.collected, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn repeat_expansion_runs_before_following_tokens() {
        let mut world = World::new(5, &[]).unwrap();
        let steps: Vec<Step> = Steps::new(tokens(&["for(int i=0; i<2; i++)", "turnLeft()"]), &mut world).collect();
        let codes: Vec<&str> = steps.iter().map(|s| s.token.code()).collect();
        assert_eq!(codes, vec!["for(int i=0; i<2; i++)", "moveForward()", "moveForward()", "turnLeft()"]);
        assert_eq!(steps[3].entries, vec!["Executing: turnLeft()", " (turn)"]);
        assert_eq!(steps[3].cursor, 2);
    }

    #[test]
    fn zero_bound_loop_inserts_nothing() {
        let mut world = World::new(5, &[]).unwrap();
        let outcome = run(tokens(&["for(int i=0; i<0; i++)", "moveForward()"]), &mut world);
        assert_eq!(outcome.final_cursor, 1);
        assert_eq!(
            outcome.log,
            vec!["Executing: for(int i=0; i<0; i++)", "Executing: moveForward()", "Done. Mario at cell 1."]
        );
    }

    #[test]
    fn huge_loop_bound_is_expanded_lazily() {
        let mut world = World::new(5, &[]).unwrap();
        let mut run = Run::start(tokens(&["for(int i=0; i<4000000000; i++)", "turnLeft()"]), &mut world);
        run.step(&mut world);
        // One pending counter plus the turn, not thousands of queued moves.
        assert_eq!(run.queue.len(), 2);
        let outcome = run.finish(&mut world);
        assert_eq!(outcome.final_cursor, 4);
        assert_eq!(outcome.log.len(), 1 + action::MAX_REPEAT + 2 + 1);
        assert_eq!(outcome.log[outcome.log.len() - 3], "Executing: turnLeft()");
    }

    #[test]
    fn unknown_tokens_degrade_gracefully() {
        let mut world = World::new(2, &[]).unwrap();
        let outcome = run(tokens(&["dance()"]), &mut world);
        assert_eq!(outcome.log, vec!["Executing: dance()", " (unknown)", "Done. Mario at cell 0."]);
    }

    #[test]
    fn stepwise_and_synchronous_runs_agree() {
        let codes = ["turnRight()", "for(x)", "collectCoin()", "moveForward()", "collectCoin()"];
        let mut a = World::new(5, &[2, 3]).unwrap();
        let mut b = World::new(5, &[2, 3]).unwrap();
        let sync = run(tokens(&codes), &mut a);

        let mut paced = Run::start(tokens(&codes), &mut b);
        let mut collected = Vec::new();
        while let Some(step) = paced.step(&mut b) {
            collected.extend(step.collected);
        }
        assert!(paced.is_halted());
        let stepped = paced.finish(&mut b);
        assert_eq!(sync, stepped);
        assert_eq!(collected, vec![2, 3]);
    }

    #[test]
    fn start_resets_previous_state() {
        let mut world = World::new(4, &[1]).unwrap();
        run(tokens(&["moveForward()", "collectCoin()", "moveForward()"]), &mut world);
        assert_eq!(world.cursor(), 2);
        let run = Run::start(Vec::new(), &mut world);
        assert_eq!(world.cursor(), 0);
        assert_eq!(world.collected_count(), 0);
        assert!(run.is_halted());
    }

    #[test]
    fn portal_threshold_comes_from_config() {
        let config = TutorialConfig { portal_threshold: 1, ..TutorialConfig::default() };
        let mut world = World::from_config(&config).unwrap();
        let outcome = run(tokens(&["moveForward()", "collectCoin()"]), &mut world);
        assert!(outcome.portal_active);
        assert!(portal_active(3, 3));
        assert!(!portal_active(2, 3));
    }
}
