//! Topic names and which notification events travel on them.
//!
//! Always build topics with these functions so producers and subscribers
//! agree on the format. Identifiers are not escaped: an id containing `:`
//! produces a topic that cannot be split back unambiguously.

use crate::models::event::{
    NotificationEvent, GENERATION_AUDIO_OUTPUT, GENERATION_COMPLETE, PROJECT_DELETE,
    PROJECT_UPDATE,
};

const GENERATION_PREFIX: &str = "generation:";
const PROJECT_PREFIX: &str = "studio-project:";
const AUDIO_OUTPUT_SUFFIX: &str = ":audio-output";
const COMPLETE_SUFFIX: &str = ":complete";
const UPDATE_SUFFIX: &str = ":update";

/// `generation:<id>`: every event of one generation job.
pub fn generation(id: &str) -> String {
    format!("{}{}", GENERATION_PREFIX, id)
}

/// `generation:<id>:audio-output`
pub fn generation_audio_output(id: &str) -> String {
    format!("{}{}{}", GENERATION_PREFIX, id, AUDIO_OUTPUT_SUFFIX)
}

/// `generation:<id>:complete`
pub fn generation_complete(id: &str) -> String {
    format!("{}{}{}", GENERATION_PREFIX, id, COMPLETE_SUFFIX)
}

/// `studio-project:<id>:update`: update and delete events of one project.
pub fn project(id: &str) -> String {
    format!("{}{}{}", PROJECT_PREFIX, id, UPDATE_SUFFIX)
}

/// Shape of a topic string, as produced by one of the builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicPattern {
    Generation,
    GenerationAudioOutput,
    GenerationComplete,
    Project,
}

impl TopicPattern {
    pub const ALL: [TopicPattern; 4] = [
        TopicPattern::Generation,
        TopicPattern::GenerationAudioOutput,
        TopicPattern::GenerationComplete,
        TopicPattern::Project,
    ];

    /// Classify a topic by prefix and suffix. The more specific generation
    /// suffixes win over the bare `generation:` form.
    pub fn classify(topic: &str) -> Option<Self> {
        if let Some(rest) = topic.strip_prefix(GENERATION_PREFIX) {
            if rest.ends_with(AUDIO_OUTPUT_SUFFIX) {
                Some(TopicPattern::GenerationAudioOutput)
            } else if rest.ends_with(COMPLETE_SUFFIX) {
                Some(TopicPattern::GenerationComplete)
            } else {
                Some(TopicPattern::Generation)
            }
        } else if topic.starts_with(PROJECT_PREFIX) && topic.ends_with(UPDATE_SUFFIX) {
            Some(TopicPattern::Project)
        } else {
            None
        }
    }

    /// Notification `type` tags that may be published on topics of this shape.
    pub fn event_types(self) -> &'static [&'static str] {
        match self {
            TopicPattern::Generation => &[GENERATION_AUDIO_OUTPUT, GENERATION_COMPLETE],
            TopicPattern::GenerationAudioOutput => &[GENERATION_AUDIO_OUTPUT],
            TopicPattern::GenerationComplete => &[GENERATION_COMPLETE],
            TopicPattern::Project => &[PROJECT_UPDATE, PROJECT_DELETE],
        }
    }

    /// Whether a subscriber of this topic shape should expect `event`.
    /// Advisory; delivery is never filtered on it. `Unknown` events are
    /// never accepted, whatever their tag.
    pub fn accepts(self, event: &NotificationEvent) -> bool {
        if event.is_unknown() {
            return false;
        }
        let event_type = event.event_type();
        self.event_types().iter().any(|t| *t == event_type)
    }

    /// Patterns whose subscribers may receive an event of the given tag.
    pub fn carrying(event_type: &str) -> Vec<TopicPattern> {
        Self::ALL
            .into_iter()
            .filter(|p| p.event_types().iter().any(|t| *t == event_type))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{GenerationCompleteEvent, ProjectEvent};
    use crate::models::UnknownFrame;

    #[test]
    fn builders_match_fixed_formats() {
        assert_eq!(generation("gen-42"), "generation:gen-42");
        assert_eq!(generation_audio_output("g1"), "generation:g1:audio-output");
        assert_eq!(generation_complete("g1"), "generation:g1:complete");
        assert_eq!(project("p1"), "studio-project:p1:update");
    }

    #[test]
    fn builders_are_plain_concatenation() {
        for id in ["", "abc", "a:b", "ünï", "  "] {
            assert_eq!(generation(id), format!("generation:{id}"));
            assert_eq!(generation_audio_output(id), format!("generation:{id}:audio-output"));
            assert_eq!(generation_complete(id), format!("generation:{id}:complete"));
            assert_eq!(project(id), format!("studio-project:{id}:update"));
        }
    }

    #[test]
    fn builders_are_idempotent() {
        assert_eq!(generation("x"), generation("x"));
        assert_eq!(generation_audio_output("x"), generation_audio_output("x"));
        assert_eq!(generation_complete("x"), generation_complete("x"));
        assert_eq!(project("x"), project("x"));
    }

    #[test]
    fn classify_builder_output() {
        assert_eq!(
            TopicPattern::classify(&generation("g1")),
            Some(TopicPattern::Generation)
        );
        assert_eq!(
            TopicPattern::classify(&generation_audio_output("g1")),
            Some(TopicPattern::GenerationAudioOutput)
        );
        assert_eq!(
            TopicPattern::classify(&generation_complete("g1")),
            Some(TopicPattern::GenerationComplete)
        );
        assert_eq!(
            TopicPattern::classify(&project("p1")),
            Some(TopicPattern::Project)
        );
    }

    #[test]
    fn classify_rejects_foreign_topics() {
        assert_eq!(TopicPattern::classify("studio-project:p1"), None);
        assert_eq!(TopicPattern::classify("private-user-1"), None);
        assert_eq!(TopicPattern::classify(""), None);
    }

    #[test]
    fn event_types_per_pattern() {
        let complete: NotificationEvent = GenerationCompleteEvent::succeeded("g1").into();
        let update = NotificationEvent::ProjectUpdate(ProjectEvent::new("p1", "u1", "m"));

        assert!(TopicPattern::Generation.accepts(&complete));
        assert!(TopicPattern::GenerationComplete.accepts(&complete));
        assert!(!TopicPattern::GenerationAudioOutput.accepts(&complete));
        assert!(!TopicPattern::Project.accepts(&complete));

        assert!(TopicPattern::Project.accepts(&update));
        assert!(!TopicPattern::Generation.accepts(&update));
    }

    #[test]
    fn unknown_event_is_never_accepted() {
        let spoofed = NotificationEvent::Unknown(UnknownFrame::new(
            GENERATION_COMPLETE.to_string(),
            serde_json::Map::new(),
        ));
        for pattern in TopicPattern::ALL {
            assert!(!pattern.accepts(&spoofed), "{pattern:?}");
        }
    }

    #[test]
    fn carrying_lists_every_matching_pattern() {
        assert_eq!(
            TopicPattern::carrying(GENERATION_AUDIO_OUTPUT),
            vec![TopicPattern::Generation, TopicPattern::GenerationAudioOutput]
        );
        assert_eq!(
            TopicPattern::carrying(PROJECT_DELETE),
            vec![TopicPattern::Project]
        );
        assert!(TopicPattern::carrying("unknown").is_empty());
    }
}
