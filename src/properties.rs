use crate::event::PropertyBag;
use serde::Serialize;
use std::collections::BTreeMap;

/// Flattened properties: string keys to optional string values.
pub type Properties = BTreeMap<String, Option<String>>;

/// Flatten an event's property bag into string form.
///
/// Returns an empty map when the event carries no properties. Strings are
/// taken verbatim, `null` becomes `None`, and any other JSON value uses its
/// JSON text.
pub fn flatten(properties: Option<&PropertyBag>) -> Properties {
    let Some(properties) = properties else {
        return Properties::new();
    };

    properties
        .iter()
        .map(|(key, value)| (key.clone(), value_to_string(value)))
        .collect()
}

fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Where the flattened properties of a report go. Tags and extras are
/// alternative views of the same map; a report never carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyDestination {
    None,
    Tags(Properties),
    Extras(Properties),
}

impl PropertyDestination {
    pub fn new(properties: Properties, as_tags: bool) -> Self {
        if properties.is_empty() {
            PropertyDestination::None
        } else if as_tags {
            PropertyDestination::Tags(properties)
        } else {
            PropertyDestination::Extras(properties)
        }
    }

    pub fn tags(&self) -> Option<&Properties> {
        match self {
            PropertyDestination::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    pub fn extras(&self) -> Option<&Properties> {
        match self {
            PropertyDestination::Extras(extras) => Some(extras),
            _ => None,
        }
    }
}
