use std::collections::VecDeque;

use lockstep_shared::{GameSnapshot, Tick};

/// Result of comparing arrived authoritative snapshots against the locally
/// predicted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutcome {
    /// No tick has both sides present yet.
    Nothing,
    /// First tick at which prediction and authority disagree.
    Divergent { tick: Tick },
    /// Every tick up to and including `up_to` is confirmed equal.
    MergeForward { up_to: Tick },
}

/// Host-authoritative reconciliation: a sliding window of locally predicted
/// snapshots, checked tick by tick against the host's authoritative ones.
///
/// Divergence is not an error. The expected flow is: compare, roll the
/// simulation back to the authoritative state at the divergent tick,
/// resimulate from buffered inputs (producing fresh pending snapshots),
/// and keep going. Confirmed ticks are folded into a merged baseline and
/// pruned, so both windows stay bounded.
pub struct ReconcileManager {
    pending: VecDeque<GameSnapshot>,
    arrived: VecDeque<GameSnapshot>,
    baseline: Option<GameSnapshot>,
    stopped: bool,
}

impl ReconcileManager {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            arrived: VecDeque::new(),
            baseline: None,
            stopped: false,
        }
    }

    /// Pushes a locally predicted snapshot onto the pending window.
    /// Snapshots must arrive in tick order.
    pub fn save_game_tick(&mut self, snapshot: GameSnapshot) {
        debug_assert!(
            self.pending
                .back()
                .map(|last| last.tick < snapshot.tick)
                .unwrap_or(true),
            "pending snapshots must be pushed in ascending tick order"
        );
        self.pending.push_back(snapshot);
    }

    /// Records an authoritative snapshot from the host.
    pub fn record_arrived(&mut self, snapshot: GameSnapshot) {
        self.arrived.push_back(snapshot);
    }

    pub fn earliest_pending_tick(&self) -> Option<Tick> {
        self.pending.front().map(|snapshot| snapshot.tick)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Scans the pending window in ascending tick order against the arrived
    /// snapshots. The scan stops at the first pending tick with no arrived
    /// counterpart: a gap ends the verified prefix, so a tick is never
    /// confirmed past one the authority has not vouched for.
    pub fn compare_arrived_and_pending(&self) -> CompareOutcome {
        let mut confirmed_up_to = None;

        for pending in &self.pending {
            let Some(arrived) = self.arrived.iter().find(|a| a.tick == pending.tick) else {
                break;
            };
            if pending.diverges_from(arrived) {
                return CompareOutcome::Divergent { tick: pending.tick };
            }
            confirmed_up_to = Some(pending.tick);
        }

        match confirmed_up_to {
            Some(up_to) => CompareOutcome::MergeForward { up_to },
            None => CompareOutcome::Nothing,
        }
    }

    /// The authoritative snapshot to restore before resimulating from
    /// `tick`.
    pub fn restore_point(&self, tick: Tick) -> Option<&GameSnapshot> {
        self.arrived.iter().find(|snapshot| snapshot.tick == tick)
    }

    /// Discards all pending snapshots from `tick` onward and returns the
    /// discarded ticks, oldest first. The caller restores the authoritative
    /// state for `tick`, resimulates each returned tick from its buffered
    /// inputs, and saves the fresh snapshots back.
    pub fn rollback(&mut self, tick: Tick) -> Vec<Tick> {
        let discarded: Vec<Tick> = self
            .pending
            .iter()
            .filter(|snapshot| snapshot.tick >= tick)
            .map(|snapshot| snapshot.tick)
            .collect();
        self.pending.retain(|snapshot| snapshot.tick < tick);

        log::info!(
            "rolling back {} predicted ticks from tick {}",
            discarded.len(),
            tick
        );
        discarded
    }

    /// Folds the confirmed range into the merged baseline and prunes both
    /// windows through `up_to`.
    ///
    /// The baseline accumulates per-field deltas tick over tick across the
    /// confirmed range, so after the fold it carries the state of the last
    /// confirmed tick. The earliest pending tick strictly increases, which
    /// is what bounds the window.
    pub fn merge_correct_game_state_tick(&mut self, up_to: Tick) {
        let mut confirmed = self
            .pending
            .iter()
            .filter(|snapshot| snapshot.tick <= up_to)
            .cloned();

        let Some(first) = confirmed.next() else {
            return;
        };
        let mut baseline = match self.baseline.take() {
            Some(baseline) => {
                let mut merged = baseline;
                Self::fold_into(&mut merged, &first);
                merged
            }
            None => first,
        };
        for snapshot in confirmed {
            Self::fold_into(&mut baseline, &snapshot);
        }
        self.baseline = Some(baseline);

        self.pending.retain(|snapshot| snapshot.tick > up_to);
        self.arrived.retain(|snapshot| snapshot.tick > up_to);
    }

    /// State confirmed so far: the fold of every merged range.
    pub fn merged_baseline(&self) -> Option<&GameSnapshot> {
        self.baseline.as_ref()
    }

    /// Marks the session over; no further comparison is meaningful.
    pub fn mark_stopped(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn fold_into(baseline: &mut GameSnapshot, next: &GameSnapshot) {
        for entry in &mut baseline.entries {
            let Some(update) = next
                .entries
                .iter()
                .find(|candidate| candidate.entity_id == entry.entity_id)
            else {
                continue;
            };
            entry.position += update.position - entry.position;
            entry.velocity += update.velocity - entry.velocity;
            entry.active = update.active;
        }
        // entities first seen in the newer snapshot join the baseline
        for update in &next.entries {
            if !baseline
                .entries
                .iter()
                .any(|entry| entry.entity_id == update.entity_id)
            {
                baseline.entries.push(*update);
            }
        }
        baseline.tick = next.tick;
    }
}

impl Default for ReconcileManager {
    fn default() -> Self {
        Self::new()
    }
}
