//! Longitudinal event definitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::EventMapError;

/// One defined event: its stable unique name and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub unique_event_name: String,
    pub event_name: String,
}

impl EventDefinition {
    pub fn new(unique_event_name: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            unique_event_name: unique_event_name.into(),
            event_name: event_name.into(),
        }
    }
}

/// Ordered pairing of unique event names to event labels.
///
/// Unique names are unique; labels may repeat across arms (two arms can
/// both have a "Baseline" event). Label lookups resolve to the first event
/// carrying the label.
#[derive(Debug, Clone, Default)]
pub struct EventMap {
    events: Vec<EventDefinition>,
}

impl EventMap {
    pub fn new(events: Vec<EventDefinition>) -> Result<Self, EventMapError> {
        let mut seen = BTreeSet::new();
        for event in &events {
            if !seen.insert(event.unique_event_name.as_str()) {
                return Err(EventMapError::DuplicateEvent {
                    unique_event_name: event.unique_event_name.clone(),
                });
            }
        }
        Ok(Self { events })
    }

    pub fn events(&self) -> &[EventDefinition] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn unique_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .map(|event| event.unique_event_name.as_str())
            .collect()
    }

    /// Distinct labels in order of first appearance.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for event in &self.events {
            if !labels.contains(&event.event_name.as_str()) {
                labels.push(event.event_name.as_str());
            }
        }
        labels
    }

    pub fn is_unique_name(&self, value: &str) -> bool {
        self.events
            .iter()
            .any(|event| event.unique_event_name == value)
    }

    pub fn is_label(&self, value: &str) -> bool {
        self.events.iter().any(|event| event.event_name == value)
    }

    pub fn label_for(&self, unique_event_name: &str) -> Option<&str> {
        self.events
            .iter()
            .find(|event| event.unique_event_name == unique_event_name)
            .map(|event| event.event_name.as_str())
    }

    pub fn unique_name_for(&self, label: &str) -> Option<&str> {
        self.events
            .iter()
            .find(|event| event.event_name == label)
            .map(|event| event.unique_event_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_arms() -> EventMap {
        EventMap::new(vec![
            EventDefinition::new("baseline_arm_1", "Baseline"),
            EventDefinition::new("week_4_arm_1", "Week 4"),
            EventDefinition::new("baseline_arm_2", "Baseline"),
        ])
        .expect("valid event map")
    }

    #[test]
    fn rejects_duplicate_unique_names() {
        let err = EventMap::new(vec![
            EventDefinition::new("baseline_arm_1", "Baseline"),
            EventDefinition::new("baseline_arm_1", "Screening"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("baseline_arm_1"));
    }

    #[test]
    fn labels_are_distinct() {
        assert_eq!(two_arms().labels(), ["Baseline", "Week 4"]);
        assert_eq!(
            two_arms().unique_names(),
            ["baseline_arm_1", "week_4_arm_1", "baseline_arm_2"]
        );
    }

    #[test]
    fn lookups_in_both_directions() {
        let events = two_arms();
        assert_eq!(events.label_for("baseline_arm_2"), Some("Baseline"));
        assert_eq!(events.unique_name_for("Baseline"), Some("baseline_arm_1"));
        assert_eq!(events.unique_name_for("Week 8"), None);
        assert!(events.is_label("Week 4"));
        assert!(!events.is_label("week_4_arm_1"));
        assert!(events.is_unique_name("week_4_arm_1"));
    }
}
