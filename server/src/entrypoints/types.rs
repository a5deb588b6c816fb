use serde::{Deserialize, Serialize};
use shared::{Timeline, SCENE_COUNT};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub fps: u64,
    pub slot_duration: u64,
    pub duration_in_frames: u64,
    pub scenes: usize,
    pub audio: String,
}

impl TimelineResponse {
    pub fn new(timeline: &Timeline, audio: String) -> Self {
        Self {
            fps: timeline.fps(),
            slot_duration: timeline.slot_duration(),
            duration_in_frames: timeline.duration_in_frames(),
            scenes: SCENE_COUNT,
            audio,
        }
    }
}
