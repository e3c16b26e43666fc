use std::sync::Arc;

use tracing::{debug, error};

use shared_config::AppConfig;
use shared_http::RestClient;
use shared_models::AppError;
use shared_utils::iso_date;

use crate::models::{SlotQuery, TimeSlot, UnbookedSlotsResponse};

pub struct AvailabilityService {
    rest: Arc<RestClient>,
    unbooked_slots_path: String,
}

impl AvailabilityService {
    pub fn new(rest: Arc<RestClient>, config: &AppConfig) -> Self {
        Self {
            rest,
            unbooked_slots_path: config.endpoints.unbooked_slots.clone(),
        }
    }

    /// Slots still free for the doctor on the queried date. Every returned slot
    /// carries the query date.
    pub async fn get_unbooked_slots(&self, query: &SlotQuery) -> Result<Vec<TimeSlot>, AppError> {
        debug!("Fetching unbooked slots for doctor {} on {}", query.doctor_id, query.date);

        let response: UnbookedSlotsResponse = self.rest
            .get(&self.unbooked_slots_path, &query.to_query_params())
            .await?;

        let mut slots = Vec::with_capacity(response.slots.len());
        for mut slot in response.slots {
            match slot.slot_date {
                Some(date) if date != query.date => {
                    error!("Slot {} is dated {} but {} was requested", slot.id, date, query.date);
                    return Err(self.malformed(format!(
                        "slot {} belongs to {}, not {}",
                        slot.id,
                        iso_date(date),
                        iso_date(query.date)
                    )));
                }
                Some(_) => {}
                None => slot.slot_date = Some(query.date),
            }

            if slot.end_time() <= slot.start_time() {
                return Err(self.malformed(format!(
                    "slot {} ends ({}) before it starts ({})",
                    slot.id, slot.slot_time_to, slot.slot_time_from
                )));
            }

            slots.push(slot);
        }

        slots.sort_by_key(TimeSlot::start_time);
        debug!("{} unbooked slots for doctor {} on {}", slots.len(), query.doctor_id, query.date);

        Ok(slots)
    }

    fn malformed(&self, message: String) -> AppError {
        AppError::Decode {
            path: self.unbooked_slots_path.clone(),
            message,
        }
    }
}
