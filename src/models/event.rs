//! Notification events pushed to clients inside the `notification` envelope.
//!
//! The closed set is the four event payloads below; anything else lands in
//! [`NotificationEvent::Unknown`] and matches none of the predicates.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::response::{ACTION_DISCRIMINANT, NOTIFICATION};
use super::timestamp_now;
use super::unknown::{from_fields, serialize_tagged, take_tag, UnknownFrame};

/// Discriminant field of notification events (and of client messages).
pub const EVENT_DISCRIMINANT: &str = "type";

pub const GENERATION_AUDIO_OUTPUT: &str = "generation_audio_output";
pub const GENERATION_COMPLETE: &str = "generation_complete";
pub const PROJECT_UPDATE: &str = "project_update";
pub const PROJECT_DELETE: &str = "project_delete";

/// Terminal state of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Success,
    Failed,
}

/// An audio artifact was produced for a generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationAudioOutputEvent {
    pub generation_id: String,
    pub audio_id: String,
    pub output_name: String,
    pub timestamp: String,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

impl GenerationAudioOutputEvent {
    pub fn new(
        generation_id: impl Into<String>,
        audio_id: impl Into<String>,
        output_name: impl Into<String>,
    ) -> Self {
        Self {
            generation_id: generation_id.into(),
            audio_id: audio_id.into(),
            output_name: output_name.into(),
            timestamp: timestamp_now(),
            extra: Map::new(),
        }
    }
}

/// A generation job reached a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationCompleteEvent {
    pub generation_id: String,
    pub status: GenerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub timestamp: String,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

impl GenerationCompleteEvent {
    pub fn succeeded(generation_id: impl Into<String>) -> Self {
        Self {
            generation_id: generation_id.into(),
            status: GenerationStatus::Success,
            error_message: None,
            timestamp: timestamp_now(),
            extra: Map::new(),
        }
    }

    pub fn failed(generation_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            generation_id: generation_id.into(),
            status: GenerationStatus::Failed,
            error_message: Some(error_message.into()),
            timestamp: timestamp_now(),
            extra: Map::new(),
        }
    }
}

/// Payload shared by project update and delete events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEvent {
    pub project_id: String,
    pub user_id: String,
    pub timestamp: String,
    pub message: String,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

impl ProjectEvent {
    pub fn new(
        project_id: impl Into<String>,
        user_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            user_id: user_id.into(),
            timestamp: timestamp_now(),
            message: message.into(),
            extra: Map::new(),
        }
    }
}

pub type ProjectUpdateEvent = ProjectEvent;
pub type ProjectDeleteEvent = ProjectEvent;

/// Notification event, discriminated by `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    GenerationAudioOutput(GenerationAudioOutputEvent),
    GenerationComplete(GenerationCompleteEvent),
    ProjectUpdate(ProjectUpdateEvent),
    ProjectDelete(ProjectDeleteEvent),
    Unknown(UnknownFrame),
}

impl NotificationEvent {
    /// Value of the `type` field.
    pub fn event_type(&self) -> &str {
        match self {
            NotificationEvent::GenerationAudioOutput(_) => GENERATION_AUDIO_OUTPUT,
            NotificationEvent::GenerationComplete(_) => GENERATION_COMPLETE,
            NotificationEvent::ProjectUpdate(_) => PROJECT_UPDATE,
            NotificationEvent::ProjectDelete(_) => PROJECT_DELETE,
            NotificationEvent::Unknown(frame) => &frame.tag,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, NotificationEvent::Unknown(_))
    }

    pub fn as_generation_audio_output(&self) -> Option<&GenerationAudioOutputEvent> {
        match self {
            NotificationEvent::GenerationAudioOutput(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_generation_complete(&self) -> Option<&GenerationCompleteEvent> {
        match self {
            NotificationEvent::GenerationComplete(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_project_update(&self) -> Option<&ProjectUpdateEvent> {
        match self {
            NotificationEvent::ProjectUpdate(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_project_delete(&self) -> Option<&ProjectDeleteEvent> {
        match self {
            NotificationEvent::ProjectDelete(e) => Some(e),
            _ => None,
        }
    }
}

// Predicates match on the variant, so an `Unknown` frame never satisfies one
// even when its tag spells a known event type.

pub fn is_generation_audio_output_event(event: &NotificationEvent) -> bool {
    matches!(event, NotificationEvent::GenerationAudioOutput(_))
}

pub fn is_generation_complete_event(event: &NotificationEvent) -> bool {
    matches!(event, NotificationEvent::GenerationComplete(_))
}

pub fn is_project_update_event(event: &NotificationEvent) -> bool {
    matches!(event, NotificationEvent::ProjectUpdate(_))
}

pub fn is_project_delete_event(event: &NotificationEvent) -> bool {
    matches!(event, NotificationEvent::ProjectDelete(_))
}

impl From<GenerationAudioOutputEvent> for NotificationEvent {
    fn from(event: GenerationAudioOutputEvent) -> Self {
        NotificationEvent::GenerationAudioOutput(event)
    }
}

impl From<GenerationCompleteEvent> for NotificationEvent {
    fn from(event: GenerationCompleteEvent) -> Self {
        NotificationEvent::GenerationComplete(event)
    }
}

impl Serialize for NotificationEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field = EVENT_DISCRIMINANT;
        match self {
            NotificationEvent::GenerationAudioOutput(e) => {
                serialize_tagged(serializer, field, GENERATION_AUDIO_OUTPUT, e)
            }
            NotificationEvent::GenerationComplete(e) => {
                serialize_tagged(serializer, field, GENERATION_COMPLETE, e)
            }
            NotificationEvent::ProjectUpdate(e) => {
                serialize_tagged(serializer, field, PROJECT_UPDATE, e)
            }
            NotificationEvent::ProjectDelete(e) => {
                serialize_tagged(serializer, field, PROJECT_DELETE, e)
            }
            NotificationEvent::Unknown(frame) => frame.serialize_as(serializer, field),
        }
    }
}

impl<'de> Deserialize<'de> for NotificationEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        // Accept a full envelope too; the `action` belongs to the response.
        match fields.remove(ACTION_DISCRIMINANT) {
            None => {}
            Some(Value::String(action)) if action == NOTIFICATION => {}
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "notification event carries `{ACTION_DISCRIMINANT}` {other}, expected \"{NOTIFICATION}\""
                )))
            }
        }
        let tag = take_tag(&mut fields, EVENT_DISCRIMINANT).map_err(D::Error::custom)?;
        let event = match tag.as_str() {
            GENERATION_AUDIO_OUTPUT => {
                from_fields(fields).map(NotificationEvent::GenerationAudioOutput)
            }
            GENERATION_COMPLETE => from_fields(fields).map(NotificationEvent::GenerationComplete),
            PROJECT_UPDATE => from_fields(fields).map(NotificationEvent::ProjectUpdate),
            PROJECT_DELETE => from_fields(fields).map(NotificationEvent::ProjectDelete),
            _ => Ok(NotificationEvent::Unknown(UnknownFrame::new(tag, fields))),
        };
        event.map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type Predicate = fn(&NotificationEvent) -> bool;

    const PREDICATES: [(&str, Predicate); 4] = [
        (GENERATION_AUDIO_OUTPUT, is_generation_audio_output_event),
        (GENERATION_COMPLETE, is_generation_complete_event),
        (PROJECT_UPDATE, is_project_update_event),
        (PROJECT_DELETE, is_project_delete_event),
    ];

    fn sample_events() -> Vec<NotificationEvent> {
        vec![
            GenerationAudioOutputEvent::new("g1", "a1", "stem-vocals").into(),
            GenerationCompleteEvent::succeeded("g1").into(),
            NotificationEvent::ProjectUpdate(ProjectEvent::new("p1", "u1", "renamed")),
            NotificationEvent::ProjectDelete(ProjectEvent::new("p1", "u1", "deleted")),
        ]
    }

    #[test]
    fn exactly_one_predicate_matches_each_variant() {
        for event in sample_events() {
            for (tag, predicate) in PREDICATES {
                assert_eq!(
                    predicate(&event),
                    event.event_type() == tag,
                    "predicate for {tag} on {}",
                    event.event_type()
                );
            }
        }
    }

    #[test]
    fn no_predicate_matches_unknown_type() {
        for tag in ["generation_started", "", "PROJECT_UPDATE", "project_update "] {
            let event: NotificationEvent =
                serde_json::from_value(json!({ "type": tag, "projectId": "p1" })).unwrap();
            assert!(event.is_unknown());
            for (_, predicate) in PREDICATES {
                assert!(!predicate(&event), "{tag:?} must not match");
            }
        }
    }

    #[test]
    fn generation_complete_from_envelope() {
        let event: NotificationEvent = serde_json::from_value(json!({
            "action": "notification",
            "type": "generation_complete",
            "generationId": "g1",
            "status": "success",
            "timestamp": "t1"
        }))
        .unwrap();
        assert!(is_generation_complete_event(&event));
        assert!(!is_project_update_event(&event));

        let complete = event.as_generation_complete().unwrap();
        assert_eq!(complete.generation_id, "g1");
        assert_eq!(complete.status, GenerationStatus::Success);
        assert_eq!(complete.error_message, None);
        assert_eq!(complete.timestamp, "t1");
    }

    #[test]
    fn failed_generation_carries_error_message() {
        let event: NotificationEvent = GenerationCompleteEvent::failed("g2", "model timeout").into();
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "generation_complete");
        assert_eq!(value["status"], "failed");
        assert_eq!(value["errorMessage"], "model timeout");
        assert!(value.get("action").is_none());
    }

    #[test]
    fn success_omits_error_message() {
        let event: NotificationEvent = GenerationCompleteEvent::succeeded("g3").into();
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("errorMessage").is_none());
    }

    #[test]
    fn unrecognized_status_is_rejected() {
        let res = serde_json::from_value::<NotificationEvent>(json!({
            "type": "generation_complete",
            "generationId": "g1",
            "status": "running",
            "timestamp": "t1"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn audio_output_uses_camel_case_fields() {
        let event = NotificationEvent::GenerationAudioOutput(GenerationAudioOutputEvent {
            generation_id: "g1".into(),
            audio_id: "a9".into(),
            output_name: "mixdown".into(),
            timestamp: "t1".into(),
            extra: Map::new(),
        });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "generation_audio_output",
                "generationId": "g1",
                "audioId": "a9",
                "outputName": "mixdown",
                "timestamp": "t1"
            })
        );
    }

    #[test]
    fn unknown_frame_with_known_tag_matches_no_predicate() {
        let event = NotificationEvent::Unknown(UnknownFrame::new(GENERATION_COMPLETE, Map::new()));
        assert_eq!(event.event_type(), GENERATION_COMPLETE);
        for (tag, predicate) in PREDICATES {
            assert!(!predicate(&event), "{tag} must not match an unknown frame");
        }
        assert!(event.as_generation_complete().is_none());
    }

    #[test]
    fn extra_fields_survive_a_round_trip() {
        let raw = json!({
            "type": "generation_complete",
            "generationId": "g1",
            "status": "success",
            "timestamp": "t1",
            "projectId": "p7",
            "meta": { "attempt": 2 }
        });
        let event: NotificationEvent = serde_json::from_value(raw.clone()).unwrap();
        let complete = event.as_generation_complete().unwrap();
        assert_eq!(complete.extra.get("projectId"), Some(&json!("p7")));
        assert!(!complete.extra.contains_key("generationId"));
        assert_eq!(serde_json::to_value(&event).unwrap(), raw);
    }

    #[test]
    fn mismatched_action_is_rejected() {
        let res = serde_json::from_value::<NotificationEvent>(json!({
            "action": "error",
            "type": "project_delete",
            "projectId": "p1",
            "userId": "u1",
            "timestamp": "t",
            "message": "m"
        }));
        assert!(res.is_err());

        let event: NotificationEvent = serde_json::from_value(json!({
            "action": "notification",
            "type": "render_progress"
        }))
        .unwrap();
        match event {
            NotificationEvent::Unknown(frame) => assert!(frame.fields.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn narrowing_accessors_only_return_their_variant() {
        let event = NotificationEvent::ProjectDelete(ProjectEvent::new("p1", "u1", "gone"));
        assert!(event.as_project_delete().is_some());
        assert!(event.as_project_update().is_none());
        assert!(event.as_generation_complete().is_none());
        assert!(event.as_generation_audio_output().is_none());
    }
}
