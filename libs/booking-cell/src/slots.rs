use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use doctor_cell::models::TimeSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAppearance {
    /// The selected slot.
    Filled,
    Outlined,
}

/// One button of the slot picker.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub slot: TimeSlot,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
}

impl SlotView {
    pub fn appearance(&self) -> SlotAppearance {
        if self.selected {
            SlotAppearance::Filled
        } else {
            SlotAppearance::Outlined
        }
    }
}

/// Past days are entirely disabled; on today a slot must start strictly after
/// the current time. Future days are never time-filtered. The backend stays
/// the authority on what can actually be booked.
pub fn is_slot_disabled(date: NaiveDate, start: NaiveTime, now: NaiveDateTime) -> bool {
    let today = now.date();
    if date < today {
        return true;
    }
    date == today && start <= now.time()
}

/// Every returned slot, in order, with its disabled and selected state.
pub fn slot_views(
    slots: &[TimeSlot],
    date: NaiveDate,
    selected: Option<&TimeSlot>,
    now: NaiveDateTime,
) -> Vec<SlotView> {
    slots
        .iter()
        .map(|slot| SlotView {
            slot: slot.clone(),
            label: slot.label(),
            disabled: is_slot_disabled(date, slot.start_time(), now),
            selected: selected.is_some_and(|s| s.id == slot.id),
        })
        .collect()
}
