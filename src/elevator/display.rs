//! Floor indicators for one cab

use serde::{Deserialize, Serialize};

use crate::types::{DisplayStatus, Floor};

/// One floor indicator, inside the cab or at a landing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorDisplay {
    /// Landing the display hangs at, `None` for the one inside the cab
    pub landing: Option<Floor>,
    /// Power state
    pub status: DisplayStatus,
    /// Floor currently shown
    pub shown_floor: Floor,
}

/// Every indicator that reports one cab's position
#[derive(Debug, Clone)]
pub struct DisplayPanel {
    displays: Vec<FloorDisplay>,
}

impl DisplayPanel {
    /// Create a cab display plus one display per landing, all showing `floor`
    pub fn new(min_floor: Floor, max_floor: Floor, floor: Floor) -> Self {
        let displays = std::iter::once(None)
            .chain((min_floor..=max_floor).map(Some))
            .map(|landing| FloorDisplay { landing, status: DisplayStatus::On, shown_floor: floor })
            .collect();
        Self { displays }
    }

    /// Show `floor` on every powered display
    pub fn update_display(&mut self, floor: Floor) {
        for display in self.displays.iter_mut().filter(|d| d.status == DisplayStatus::On) {
            display.shown_floor = floor;
        }
    }

    /// Floor shown inside the cab
    pub fn cab_floor(&self) -> Option<Floor> {
        self.displays.iter().find(|d| d.landing.is_none()).map(|d| d.shown_floor)
    }

    /// Whether every powered display shows `floor`
    pub fn all_show(&self, floor: Floor) -> bool {
        self.displays
            .iter()
            .filter(|d| d.status == DisplayStatus::On)
            .all(|d| d.shown_floor == floor)
    }

    /// All displays
    pub fn displays(&self) -> &[FloorDisplay] {
        &self.displays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_has_cab_and_landing_displays() {
        let panel = DisplayPanel::new(1, 5, 1);
        assert_eq!(panel.displays().len(), 6);
        assert_eq!(panel.cab_floor(), Some(1));
        assert!(panel.all_show(1));
    }

    #[test]
    fn test_update_display_broadcasts() {
        let mut panel = DisplayPanel::new(1, 5, 1);
        panel.update_display(4);
        assert_eq!(panel.cab_floor(), Some(4));
        assert!(panel.all_show(4));
        assert!(!panel.all_show(1));
    }
}
