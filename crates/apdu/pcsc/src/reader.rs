//! Reader state snapshot for PC/SC devices

use pcsc::{ReaderState, State};

/// Representation of a PC/SC card reader at the time it was queried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcscReader {
    /// Name of the reader
    name: String,

    /// Whether a card is present
    has_card: bool,

    /// Answer To Reset of the card (if present)
    atr: Option<Vec<u8>>,
}

impl PcscReader {
    /// Create a new reader
    pub const fn new(name: String, has_card: bool, atr: Option<Vec<u8>>) -> Self {
        Self {
            name,
            has_card,
            atr,
        }
    }

    /// Get the reader name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a card is present in the reader
    pub const fn has_card(&self) -> bool {
        self.has_card
    }

    /// Get the ATR of the card if present
    pub fn atr(&self) -> Option<&[u8]> {
        self.atr.as_deref()
    }

    /// Create a reader from a reader state
    pub(crate) fn from_reader_state(reader_state: &ReaderState) -> Self {
        Self::from_state(
            reader_state.name().to_string_lossy().into_owned(),
            reader_state.event_state(),
            reader_state.atr(),
        )
    }

    fn from_state(name: String, state: State, atr: &[u8]) -> Self {
        let has_card = state.contains(State::PRESENT) && !state.contains(State::EMPTY);
        let atr = has_card.then(|| atr.to_vec());
        Self::new(name, has_card, atr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_from_state() {
        let atr = [0x3B, 0x8F, 0x80, 0x01];

        let reader = PcscReader::from_state("R".into(), State::PRESENT | State::CHANGED, &atr);
        assert_eq!(reader.name(), "R");
        assert!(reader.has_card());
        assert_eq!(reader.atr(), Some(&atr[..]));

        let reader = PcscReader::from_state("R".into(), State::EMPTY, &atr);
        assert!(!reader.has_card());
        assert_eq!(reader.atr(), None);

        let reader = PcscReader::from_state("R".into(), State::PRESENT | State::EMPTY, &[]);
        assert!(!reader.has_card());
    }
}
