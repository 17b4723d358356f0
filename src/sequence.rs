// Block sequence built by drag & drop. Each dropped block becomes a chip with its
// own id so removing one chip never touches another chip carrying the same code.

use crate::sim::ActionToken;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chip {
    pub id: u32,
    pub code: String,
}

#[derive(Debug, Default)]
pub struct SequenceBuilder {
    chips: Vec<Chip>,
    next_id: u32,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chip and return its id.
    pub fn push(&mut self, code: impl Into<String>) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.chips.push(Chip { id, code: code.into() });
        id
    }

    /// Remove exactly the chip `id`; false if it is already gone.
    pub fn remove(&mut self, id: u32) -> bool {
        match self.chips.iter().position(|c| c.id == id) {
            Some(pos) => {
                self.chips.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.chips.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    pub fn tokens(&self, repeat_fallback: usize) -> Vec<ActionToken> {
        self.chips.iter().map(|c| ActionToken::parse(c.code.as_str(), repeat_fallback)).collect()
    }

    /// Text for the result line under the drop zone.
    pub fn summary(&self) -> String {
        if self.chips.is_empty() {
            "Sequence empty".to_string()
        } else {
            let codes: Vec<&str> = self.chips.iter().map(|c| c.code.as_str()).collect();
            format!("Sequence: {}", codes.join(" → "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ActionKind;

    #[test]
    fn summary_lists_codes_in_order() {
        let mut seq = SequenceBuilder::new();
        assert_eq!(seq.summary(), "Sequence empty");
        seq.push("moveForward()");
        seq.push("collectCoin()");
        assert_eq!(seq.summary(), "Sequence: moveForward() → collectCoin()");
    }

    #[test]
    fn remove_takes_only_the_given_chip() {
        let mut seq = SequenceBuilder::new();
        let a = seq.push("moveForward()");
        let b = seq.push("moveForward()");
        seq.push("turnLeft()");
        assert!(seq.remove(b));
        assert!(!seq.remove(b));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.chips()[0].id, a);
        assert_eq!(seq.chips()[1].code, "turnLeft()");
    }

    #[test]
    fn tokens_are_classified() {
        let mut seq = SequenceBuilder::new();
        seq.push("for(int i=0; i<3; i++)");
        seq.push("collectCoin()");
        let kinds: Vec<ActionKind> = seq.tokens(2).iter().map(|t| t.kind()).collect();
        assert_eq!(kinds, vec![ActionKind::RepeatBlock(3), ActionKind::CollectCoin]);
        seq.clear();
        assert!(seq.is_empty());
    }
}
