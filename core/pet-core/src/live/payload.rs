//! Decoding of live pushes from the game.
//!
//! The game sends either a bare pet snapshot or the widget envelope:
//!
//! ```json
//! {
//!   "widgetEnabled": true,
//!   "selectedPetId": "pet-1",
//!   "selectedPetData": { "petId": "pet-1", "energy": 80, ... },
//!   "lastUpdateTime": "1758510136000"
//! }
//! ```
//!
//! An envelope is recognized by any of its own keys. A disabled widget or an
//! envelope without pet data carries no snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timestamp;
use crate::types::PetState;

const ENVELOPE_KEYS: [&str; 3] = ["widgetEnabled", "selectedPetId", "selectedPetData"];

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPayload {
    #[serde(default = "default_enabled")]
    pub widget_enabled: bool,
    #[serde(default)]
    pub selected_pet_id: String,
    #[serde(default)]
    pub selected_pet_data: Option<PetState>,
    #[serde(default)]
    pub last_update_time: String,
}

impl WidgetPayload {
    /// Extracts the pet snapshot, filling its id and capture instant from the
    /// envelope when the inner snapshot lacks them.
    pub fn into_live_snapshot(self) -> Option<PetState> {
        if !self.widget_enabled {
            tracing::debug!("Widget disabled in payload, ignoring pet data");
            return None;
        }

        let mut state = self.selected_pet_data?;
        if state.pet_id.trim().is_empty() {
            state.pet_id = self.selected_pet_id;
        }
        if state.captured_at == timestamp::epoch() {
            if let Some(envelope_time) = timestamp::parse_capture_timestamp(&self.last_update_time)
            {
                state.captured_at = envelope_time;
            }
        }
        Some(state)
    }
}

/// Parses a push from the game into a live snapshot.
///
/// Returns `Ok(None)` for well-formed payloads that carry no snapshot and an
/// error only when the input is not valid JSON of either shape.
pub fn parse_live_payload(json: &str) -> Result<Option<PetState>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;

    let object = value
        .as_object()
        .ok_or_else(|| {
            <serde_json::Error as serde::de::Error>::custom("live payload must be a JSON object")
        })?;
    let is_envelope = ENVELOPE_KEYS.iter().any(|key| object.contains_key(*key));

    if is_envelope {
        let payload: WidgetPayload = serde_json::from_value(value)?;
        Ok(payload.into_live_snapshot())
    } else {
        Ok(Some(serde_json::from_value(value)?))
    }
}
