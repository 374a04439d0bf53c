//! Action vocabulary understood by the reducer.
//!
//! Actions are a closed sum type. Callers that speak the loose
//! `{ "type": ..., "payload": ... }` record form go through [`ActionRecord`],
//! which either converts strictly ([`ActionRecord::into_action`]) or
//! collapses anything it cannot understand into [`Action::Unknown`]
//! ([`From`], which is also the serde path).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::numbers::{coerce_day_count, day_count_to_u32, json_day_count};

/// Recognised action tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Gather,
    Travel,
    TippedWagon,
}

impl ActionKind {
    pub const ALL: [Self; 3] = [Self::Gather, Self::Travel, Self::TippedWagon];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gather => "gather",
            Self::Travel => "travel",
            Self::TippedWagon => "tippedWagon",
        }
    }

    #[must_use]
    pub const fn needs_payload(self) -> bool {
        matches!(self, Self::Travel)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    /// Tags are exact: `Gather` or `tipped-wagon` is an unknown tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ActionError::UnknownTag(s.to_string()))
    }
}

/// Errors raised when a loose action record cannot be normalized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("action record has no type tag")]
    MissingTag,
    #[error("unknown action tag '{0}'")]
    UnknownTag(String),
    #[error("{0} requires a day count payload")]
    MissingPayload(ActionKind),
    #[error("payload '{0}' is not a whole number of days")]
    InvalidPayload(String),
    #[error("travel needs a positive day count (got {0})")]
    NonPositiveDays(i64),
}

/// A caller-issued instruction selecting one transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ActionRecord", into = "ActionRecord")]
pub enum Action {
    Gather,
    Travel { days: u32 },
    TippedWagon,
    /// Any tag the rules do not recognise. Resolves to the identity transition.
    Unknown,
}

impl Action {
    /// Build an action from a tag and an optional textual payload.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown tags and for travel payloads that are
    /// missing, non-numeric, fractional, or not positive.
    pub fn from_tagged(tag: &str, payload: Option<&str>) -> Result<Self, ActionError> {
        let kind: ActionKind = tag.parse()?;
        let days =
            payload.map(|text| coerce_day_count(text).ok_or_else(|| text.trim().to_string()));
        Self::resolve(kind, days)
    }

    /// Pairs a kind with its coerced day count. Only kinds that
    /// [need a payload](ActionKind::needs_payload) look at `days`; `Err`
    /// carries the raw payload text that failed coercion.
    fn resolve(
        kind: ActionKind,
        days: Option<Result<i64, String>>,
    ) -> Result<Self, ActionError> {
        let days = if kind.needs_payload() {
            Some(positive_days(kind, days)?)
        } else {
            None
        };
        match (kind, days) {
            (ActionKind::Gather, _) => Ok(Self::Gather),
            (ActionKind::TippedWagon, _) => Ok(Self::TippedWagon),
            (ActionKind::Travel, Some(days)) => Ok(Self::Travel { days }),
            (ActionKind::Travel, None) => Err(ActionError::MissingPayload(kind)),
        }
    }

    /// Like [`Action::from_tagged`] but never fails: anything that cannot be
    /// normalized becomes [`Action::Unknown`].
    #[must_use]
    pub fn lenient(tag: &str, payload: Option<&str>) -> Self {
        Self::from_tagged(tag, payload).unwrap_or_else(|err| {
            log::debug!("treating action '{tag}' as unknown: {err}");
            Self::Unknown
        })
    }

    #[must_use]
    pub const fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::Gather => Some(ActionKind::Gather),
            Self::Travel { .. } => Some(ActionKind::Travel),
            Self::TippedWagon => Some(ActionKind::TippedWagon),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.as_str(),
            None => "unknown",
        }
    }
}

fn positive_days(
    kind: ActionKind,
    days: Option<Result<i64, String>>,
) -> Result<u32, ActionError> {
    let raw = days
        .ok_or(ActionError::MissingPayload(kind))?
        .map_err(ActionError::InvalidPayload)?;
    if raw <= 0 {
        return Err(ActionError::NonPositiveDays(raw));
    }
    day_count_to_u32(raw).ok_or_else(|| ActionError::InvalidPayload(raw.to_string()))
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Travel { days } => write!(f, "travel:{days}"),
            other => f.write_str(other.label()),
        }
    }
}

impl FromStr for Action {
    type Err = ActionError;

    /// Parses the script token form: `gather`, `travel:3`, `tippedWagon`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((tag, payload)) => Self::from_tagged(tag, Some(payload)),
            None => Self::from_tagged(s, None),
        }
    }
}

/// Loose `{ "type": ..., "payload": ... }` record form of an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ActionRecord {
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            kind: Some(kind.into()),
            payload,
        }
    }

    /// Strict conversion: reports why a record does not name an action.
    ///
    /// # Errors
    ///
    /// Returns an error when the tag is missing or unknown, or when a travel
    /// payload is missing, non-numeric, fractional, or not positive.
    pub fn into_action(self) -> Result<Action, ActionError> {
        let tag = self.kind.ok_or(ActionError::MissingTag)?;
        let kind: ActionKind = tag.parse()?;
        let days = self
            .payload
            .map(|payload| json_day_count(&payload).ok_or_else(|| payload.to_string()));
        Action::resolve(kind, days)
    }
}

impl From<ActionRecord> for Action {
    fn from(record: ActionRecord) -> Self {
        record.into_action().unwrap_or_else(|err| {
            log::debug!("treating action record as unknown: {err}");
            Self::Unknown
        })
    }
}

impl From<Action> for ActionRecord {
    fn from(action: Action) -> Self {
        match action {
            Action::Gather => Self::new(ActionKind::Gather.as_str(), None),
            Action::Travel { days } => Self::new(ActionKind::Travel.as_str(), Some(days.into())),
            Action::TippedWagon => Self::new(ActionKind::TippedWagon.as_str(), None),
            Action::Unknown => Self::default(),
        }
    }
}
