//! Session ledger: the balance and the bounded log of resolved rounds.
//!
//! The ledger never checks whether a debit is affordable; the round engine
//! does that before calling [Ledger::debit].

use arcade_types::casino::{History, HistoryEntry};

#[derive(Clone, Debug)]
pub struct Ledger {
    balance: u64,
    history: History,
}

impl Ledger {
    pub fn new(balance: u64, history_capacity: usize) -> Self {
        Self {
            balance,
            history: History::new(history_capacity),
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn can_cover(&self, amount: u64) -> bool {
        self.balance >= amount
    }

    pub fn debit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_sub(amount);
    }

    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Append a resolved round, evicting the oldest entry once full.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Resolved rounds, most recent first.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Restore `balance` and forget every recorded round.
    pub fn reset(&mut self, balance: u64) {
        self.balance = balance;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_types::casino::{GameType, Outcome};

    fn entry(round_id: u64) -> HistoryEntry {
        HistoryEntry {
            round_id,
            game_type: GameType::Roulette,
            outcome: Outcome::roulette(0),
            wager: 5_000,
            winnings: 0,
            timestamp: 0,
        }
    }

    #[test]
    fn test_debit_credit() {
        let mut ledger = Ledger::new(10_000, 10);
        assert!(ledger.can_cover(10_000));
        assert!(!ledger.can_cover(10_001));

        ledger.debit(10_000);
        assert_eq!(ledger.balance(), 0);
        ledger.credit(20_000);
        assert_eq!(ledger.balance(), 20_000);

        // Saturates instead of wrapping
        ledger.debit(u64::MAX);
        assert_eq!(ledger.balance(), 0);
        ledger.credit(u64::MAX);
        ledger.credit(1);
        assert_eq!(ledger.balance(), u64::MAX);
    }

    #[test]
    fn test_record_bounded() {
        let mut ledger = Ledger::new(0, 3);
        for round_id in 0..5 {
            ledger.record(entry(round_id));
        }
        let ids: Vec<u64> = ledger.history().iter().map(|e| e.round_id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }

    #[test]
    fn test_reset() {
        let mut ledger = Ledger::new(1_000, 10);
        ledger.debit(500);
        ledger.record(entry(1));
        ledger.reset(1_000);
        assert_eq!(ledger.balance(), 1_000);
        assert!(ledger.history().is_empty());
    }
}
