// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of timeline events prefetched for a subscribed room.
pub const DEFAULT_TIMELINE_LIMIT: u32 = 20;

/// State events which are tracked for subscribed rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateEventType {
    #[serde(rename = "m.room.name")]
    RoomName,
    #[serde(rename = "m.room.topic")]
    RoomTopic,
    #[serde(rename = "m.room.avatar")]
    RoomAvatar,
    #[serde(rename = "m.room.canonical_alias")]
    RoomCanonicalAlias,
    #[serde(rename = "m.room.join_rules")]
    RoomJoinRules,
    #[serde(rename = "m.room.power_levels")]
    RoomPowerLevels,
    #[serde(rename = "m.room.pinned_events")]
    RoomPinnedEvents,
}

impl StateEventType {
    pub const ALL: [Self; 7] = [
        Self::RoomName,
        Self::RoomTopic,
        Self::RoomAvatar,
        Self::RoomCanonicalAlias,
        Self::RoomJoinRules,
        Self::RoomPowerLevels,
        Self::RoomPinnedEvents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoomName => "m.room.name",
            Self::RoomTopic => "m.room.topic",
            Self::RoomAvatar => "m.room.avatar",
            Self::RoomCanonicalAlias => "m.room.canonical_alias",
            Self::RoomJoinRules => "m.room.join_rules",
            Self::RoomPowerLevels => "m.room.power_levels",
            Self::RoomPinnedEvents => "m.room.pinned_events",
        }
    }
}

impl fmt::Display for StateEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state event to track, filtered by state key
///
/// An empty `value` matches any state key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredState {
    pub key: StateEventType,
    #[serde(default)]
    pub value: String,
}

impl RequiredState {
    pub fn any(key: StateEventType) -> Self {
        Self {
            key,
            value: String::new(),
        }
    }
}

/// What the sync service delivers for a subscribed room
///
/// Heroes are excluded by default because they are already part of the bulk
/// room list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionSettings {
    pub required_state: Vec<RequiredState>,
    pub timeline_limit: u32,
    pub include_heroes: bool,
}

impl Default for SubscriptionSettings {
    fn default() -> Self {
        Self {
            required_state: StateEventType::ALL
                .into_iter()
                .map(RequiredState::any)
                .collect(),
            timeline_limit: DEFAULT_TIMELINE_LIMIT,
            include_heroes: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = SubscriptionSettings::default();
        assert_eq!(settings.timeline_limit, 20);
        assert!(!settings.include_heroes);
        let keys: Vec<_> = settings
            .required_state
            .iter()
            .map(|state| state.key.as_str())
            .collect();
        assert_eq!(
            keys,
            [
                "m.room.name",
                "m.room.topic",
                "m.room.avatar",
                "m.room.canonical_alias",
                "m.room.join_rules",
                "m.room.power_levels",
                "m.room.pinned_events",
            ]
        );
        assert!(settings.required_state.iter().all(|s| s.value.is_empty()));
    }

    #[test]
    fn deserialize_partial_settings() {
        let settings: SubscriptionSettings =
            serde_json::from_str(r#"{ "timeline_limit": 50 }"#).unwrap();
        assert_eq!(settings.timeline_limit, 50);
        assert_eq!(
            settings.required_state,
            SubscriptionSettings::default().required_state
        );

        let settings: SubscriptionSettings = serde_json::from_str(
            r#"{ "required_state": [{ "key": "m.room.topic" }], "include_heroes": true }"#,
        )
        .unwrap();
        assert_eq!(
            settings.required_state,
            [RequiredState::any(StateEventType::RoomTopic)]
        );
        assert!(settings.include_heroes);
        assert_eq!(settings.timeline_limit, DEFAULT_TIMELINE_LIMIT);
    }

    #[test]
    fn unknown_state_event_is_rejected() {
        let res = serde_json::from_str::<SubscriptionSettings>(
            r#"{ "required_state": [{ "key": "m.room.member" }] }"#,
        );
        assert!(res.is_err());
    }
}
