use custody_canonical::Timestamp;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::shared::{lenient_number, lenient_text, GeoPoint};

/// Custody event kind.
///
/// Unrecognized strings are kept verbatim in [`EventType::Unrecognized`] so
/// that newer writers can record event kinds this crate does not score yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// A batch was registered.
    BatchCreated,
    /// A sensor reading was attached to the batch.
    IotUpdate,
    /// The batch left a custodian; opens a delivery leg.
    Dispatched,
    /// The batch arrived at a custodian; closes the open leg.
    Received,
    /// A consumer or partner rating.
    Rating,
    /// A formal inspection with a rating.
    QualityInspection,
    /// The batch history was closed off.
    Finalized,
    /// Any other event type string.
    Unrecognized(String),
}

impl EventType {
    /// All recognized event types, in lifecycle order.
    pub const KNOWN: [EventType; 7] = [
        EventType::BatchCreated,
        EventType::IotUpdate,
        EventType::Dispatched,
        EventType::Received,
        EventType::Rating,
        EventType::QualityInspection,
        EventType::Finalized,
    ];

    /// Wire name of the event type.
    pub fn as_str(&self) -> &str {
        match self {
            EventType::BatchCreated => "BATCH_CREATED",
            EventType::IotUpdate => "IOT_UPDATE",
            EventType::Dispatched => "DISPATCHED",
            EventType::Received => "RECEIVED",
            EventType::Rating => "RATING",
            EventType::QualityInspection => "QUALITY_INSPECTION",
            EventType::Finalized => "FINALIZED",
            EventType::Unrecognized(other) => other,
        }
    }

    /// True for every variant except [`EventType::Unrecognized`].
    pub fn is_known(&self) -> bool {
        !matches!(self, EventType::Unrecognized(_))
    }
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        match value {
            "BATCH_CREATED" => EventType::BatchCreated,
            "IOT_UPDATE" => EventType::IotUpdate,
            "DISPATCHED" => EventType::Dispatched,
            "RECEIVED" => EventType::Received,
            "RATING" => EventType::Rating,
            "QUALITY_INSPECTION" => EventType::QualityInspection,
            "FINALIZED" => EventType::Finalized,
            other => EventType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        match EventType::from(value.as_str()) {
            EventType::Unrecognized(_) => EventType::Unrecognized(value),
            known => known,
        }
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Unrecognized(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `IOT_UPDATE` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IotReading {
    /// Degrees Celsius.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature: Option<f64>,
    /// Relative humidity, percent.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub humidity: Option<f64>,
    /// Reading location.
    #[serde(flatten)]
    pub position: GeoPoint,
}

/// `DISPATCHED` / `RECEIVED` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Handoff {
    /// Free-form place name.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    /// Handoff coordinates.
    #[serde(flatten)]
    pub position: GeoPoint,
}

/// `RATING` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingData {
    /// Rating on a 1 to 5 scale.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    /// Where the rating was given.
    #[serde(flatten)]
    pub position: GeoPoint,
}

/// `QUALITY_INSPECTION` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    /// Inspection grade on a 1 to 5 scale.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    /// Inspector name.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub inspector: Option<String>,
    /// Inspector notes.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// Inspection site.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    /// Inspection coordinates.
    #[serde(flatten)]
    pub position: GeoPoint,
}

/// `FINALIZED` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finalization {
    /// Party that closed the batch.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub finalized_by: Option<String>,
    /// Closing site.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    /// Closing notes.
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    /// Closing coordinates.
    #[serde(flatten)]
    pub position: GeoPoint,
}

/// Typed view of an event's data, keyed by its [`EventType`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// `BATCH_CREATED` (no fields).
    BatchCreated,
    /// `IOT_UPDATE`.
    IotUpdate(IotReading),
    /// `DISPATCHED`.
    Dispatched(Handoff),
    /// `RECEIVED`.
    Received(Handoff),
    /// `RATING`.
    Rating(RatingData),
    /// `QUALITY_INSPECTION`.
    QualityInspection(Inspection),
    /// `FINALIZED`.
    Finalized(Finalization),
    /// Unrecognized event type with its raw data.
    Other {
        /// The unrecognized type string.
        event_type: String,
        /// Raw event data.
        data: Value,
    },
}

impl EventPayload {
    /// Builds the typed view of `data` for `event_type`.
    ///
    /// Never fails: fields that are missing or of the wrong shape read as
    /// absent, and a known type whose data is not an object yields its
    /// payload with every field absent.
    pub fn parse(event_type: &EventType, data: &Value) -> Self {
        match event_type {
            EventType::BatchCreated => EventPayload::BatchCreated,
            EventType::IotUpdate => EventPayload::IotUpdate(lenient(data)),
            EventType::Dispatched => EventPayload::Dispatched(lenient(data)),
            EventType::Received => EventPayload::Received(lenient(data)),
            EventType::Rating => EventPayload::Rating(lenient(data)),
            EventType::QualityInspection => EventPayload::QualityInspection(lenient(data)),
            EventType::Finalized => EventPayload::Finalized(lenient(data)),
            EventType::Unrecognized(other) => EventPayload::Other {
                event_type: other.clone(),
                data: data.clone(),
            },
        }
    }

    /// Event type this payload belongs to.
    pub fn event_type(&self) -> EventType {
        match self {
            EventPayload::BatchCreated => EventType::BatchCreated,
            EventPayload::IotUpdate(_) => EventType::IotUpdate,
            EventPayload::Dispatched(_) => EventType::Dispatched,
            EventPayload::Received(_) => EventType::Received,
            EventPayload::Rating(_) => EventType::Rating,
            EventPayload::QualityInspection(_) => EventType::QualityInspection,
            EventPayload::Finalized(_) => EventType::Finalized,
            EventPayload::Other { event_type, .. } => EventType::from(event_type.as_str()),
        }
    }

    /// Splits the payload into the `(eventType, eventData)` pair the ledger stores.
    pub fn into_parts(self) -> Result<(EventType, Value), serde_json::Error> {
        let event_type = self.event_type();
        let data = match self {
            EventPayload::BatchCreated => Value::Object(Default::default()),
            EventPayload::IotUpdate(p) => serde_json::to_value(p)?,
            EventPayload::Dispatched(p) | EventPayload::Received(p) => serde_json::to_value(p)?,
            EventPayload::Rating(p) => serde_json::to_value(p)?,
            EventPayload::QualityInspection(p) => serde_json::to_value(p)?,
            EventPayload::Finalized(p) => serde_json::to_value(p)?,
            EventPayload::Other { data, .. } => data,
        };
        Ok((event_type, data))
    }

    /// Coordinates recorded with the event, if any.
    pub fn position(&self) -> Option<GeoPoint> {
        match self {
            EventPayload::IotUpdate(p) => Some(p.position),
            EventPayload::Dispatched(p) | EventPayload::Received(p) => Some(p.position),
            EventPayload::Rating(p) => Some(p.position),
            EventPayload::QualityInspection(p) => Some(p.position),
            EventPayload::Finalized(p) => Some(p.position),
            EventPayload::BatchCreated | EventPayload::Other { .. } => None,
        }
    }
}

fn lenient<T: DeserializeOwned + Default>(data: &Value) -> T {
    match data {
        Value::Object(_) => serde_json::from_value(data.clone()).unwrap_or_default(),
        _ => T::default(),
    }
}

/// Read-side projection of a block: what happened to a batch and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEvent {
    /// Event type.
    pub event_type: EventType,
    /// Raw event data as recorded.
    pub event_data: Value,
    /// Time the block was appended.
    pub timestamp: Timestamp,
}

impl BatchEvent {
    /// Creates an event projection.
    pub fn new(event_type: EventType, event_data: Value, timestamp: Timestamp) -> Self {
        Self {
            event_type,
            event_data,
            timestamp,
        }
    }

    /// Typed view of [`BatchEvent::event_data`].
    pub fn payload(&self) -> EventPayload {
        EventPayload::parse(&self.event_type, &self.event_data)
    }
}
