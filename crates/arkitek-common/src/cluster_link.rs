use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle flag of a cluster link. Links are created active and nothing
/// transitions them afterwards; any other value found on disk is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LinkStatus {
    #[default]
    Active,
    Other(String),
}

impl LinkStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LinkStatus::Active => "active",
            LinkStatus::Other(s) => s,
        }
    }
}

impl From<String> for LinkStatus {
    fn from(s: String) -> Self {
        if s == "active" {
            LinkStatus::Active
        } else {
            LinkStatus::Other(s)
        }
    }
}

impl Serialize for LinkStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LinkStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_string(deserializer).map(LinkStatus::from)
    }
}

/// A registered reference to a remote cluster endpoint.
///
/// Persisted as one element of the JSON array in the links file, with
/// camelCase keys (`builderType`, `createdAt`). Reading is tolerant of
/// hand-edited records: scalar fields of the wrong JSON type are coerced and
/// missing ones defaulted, so one odd record never invalidates the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterLink {
    /// Opaque identifier, the only lookup/delete key.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    /// Human-readable label, unique across the collection (case-sensitive).
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Address of the remote cluster. Not validated.
    #[serde(default, deserialize_with = "lenient_string")]
    pub endpoint: String,

    /// Opaque credential string, stored as-is.
    #[serde(default, deserialize_with = "lenient_string")]
    pub credentials: String,

    /// Classification tag, e.g. "generic".
    #[serde(default = "default_builder_type", deserialize_with = "lenient_string")]
    pub builder_type: String,

    /// Unparsable or missing timestamps read as the Unix epoch.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub status: LinkStatus,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Other(IgnoredAny),
}

/// Strings pass through, numbers and booleans are rendered, anything else is empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawScalar::deserialize(deserializer)? {
        RawScalar::Text(s) => s,
        RawScalar::Int(n) => n.to_string(),
        RawScalar::UInt(n) => n.to_string(),
        RawScalar::Float(n) => n.to_string(),
        RawScalar::Bool(b) => b.to_string(),
        RawScalar::Other(_) => String::new(),
    })
}

/// RFC 3339 strings or epoch milliseconds.
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let parsed = match RawScalar::deserialize(deserializer)? {
        RawScalar::Text(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        RawScalar::Int(ms) => DateTime::from_timestamp_millis(ms),
        RawScalar::UInt(ms) => i64::try_from(ms).ok().and_then(DateTime::from_timestamp_millis),
        RawScalar::Float(_) | RawScalar::Bool(_) | RawScalar::Other(_) => None,
    };
    Ok(parsed.unwrap_or_default())
}

fn default_builder_type() -> String {
    LinkDefaults::DEFAULT_BUILDER_TYPE.to_string()
}

/// Input of a create operation. Absent and empty strings mean the same thing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewClusterLink {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub credentials: Option<String>,
    #[serde(default)]
    pub builder_type: Option<String>,
}

impl NewClusterLink {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    pub fn with_builder_type(mut self, builder_type: impl Into<String>) -> Self {
        self.builder_type = Some(builder_type.into());
        self
    }
}

/// Values filled in when a create request omits the optional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefaults {
    pub credentials: String,
    pub builder_type: String,
}

impl LinkDefaults {
    pub const DEFAULT_BUILDER_TYPE: &'static str = "generic";

    pub fn credentials_or_default(&self, supplied: Option<&str>) -> String {
        non_empty(supplied).unwrap_or(&self.credentials).to_string()
    }

    pub fn builder_type_or_default(&self, supplied: Option<&str>) -> String {
        non_empty(supplied).unwrap_or(&self.builder_type).to_string()
    }
}

impl Default for LinkDefaults {
    fn default() -> Self {
        Self {
            credentials: String::new(),
            builder_type: Self::DEFAULT_BUILDER_TYPE.to_string(),
        }
    }
}

/// Treats `Some("")` like `None`.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
