//! The terminal's view model.

use std::collections::HashMap;

use crate::data::ChartPoint;

use super::sync::{Binding, ChartHandle, Presentation, Slot};

/// Slot values and the bound sleep chart, as the views render them.
#[derive(Debug, Default)]
pub struct Board {
    slots: HashMap<Slot, Binding>,
    chart: Option<(ChartHandle, Vec<ChartPoint>)>,
    next_handle: u64,
    chart_releases: usize,
}

impl Board {
    /// A board exposing every slot.
    pub fn new() -> Self {
        Self::with_slots(&Slot::ALL)
    }

    /// A board exposing only `slots`.
    pub fn with_slots(slots: &[Slot]) -> Self {
        Self {
            slots: slots.iter().map(|s| (*s, Binding::default())).collect(),
            ..Self::default()
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&Binding> {
        self.slots.get(&slot)
    }

    /// True once something has been projected.
    pub fn is_populated(&self) -> bool {
        self.chart.is_some()
    }

    /// Points of the bound chart; empty when none is bound.
    pub fn chart(&self) -> &[ChartPoint] {
        self.chart.as_ref().map(|(_, p)| p.as_slice()).unwrap_or(&[])
    }

    pub fn chart_handle(&self) -> Option<ChartHandle> {
        self.chart.as_ref().map(|(h, _)| *h)
    }

    pub fn chart_releases(&self) -> usize {
        self.chart_releases
    }
}

impl Presentation for Board {
    fn slot(&mut self, slot: Slot) -> Option<&mut Binding> {
        self.slots.get_mut(&slot)
    }

    fn release_chart(&mut self) -> bool {
        let released = self.chart.take().is_some();
        if released {
            self.chart_releases += 1;
        }
        released
    }

    fn bind_chart(&mut self, points: Vec<ChartPoint>) -> ChartHandle {
        if let Some((old, _)) = &self.chart {
            tracing::warn!(handle = old.0, "chart rebound without release");
        }
        self.next_handle += 1;
        let handle = ChartHandle(self.next_handle);
        self.chart = Some((handle, points));
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_then_bind() {
        let mut board = Board::new();
        assert!(!board.release_chart());
        assert!(!board.is_populated());

        let first = board.bind_chart(Vec::new());
        assert!(board.is_populated());
        assert!(board.release_chart());
        let second = board.bind_chart(Vec::new());

        assert_ne!(first, second);
        assert_eq!(board.chart_releases(), 1);
        assert_eq!(board.chart_handle(), Some(second));
    }

    #[test]
    fn restricted_board_hides_slots() {
        let mut board = Board::with_slots(&[Slot::Score]);
        assert!(board.slot(Slot::Score).is_some());
        assert!(board.slot(Slot::Devices).is_none());
    }
}
