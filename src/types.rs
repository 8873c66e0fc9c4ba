use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::barcode::{self, Symbology};

/// Type identifier as the scanner reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawType {
    Code(i64),
    Text(String),
}

impl std::fmt::Display for RawType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawType::Code(code) => write!(f, "{}", code),
            RawType::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanEvent {
    #[serde(rename = "type")]
    pub raw_type: RawType,
    #[serde(rename = "data")]
    pub raw_data: String,
}

impl ScanEvent {
    pub fn new(raw_type: RawType, raw_data: impl Into<String>) -> Self {
        Self {
            raw_type,
            raw_data: raw_data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalBarcode {
    #[serde(rename = "tipo")]
    pub symbology: Symbology,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "dataLeitura", serialize_with = "serialize_scanned_at")]
    pub scanned_at: DateTime<Utc>,
}

fn serialize_scanned_at<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&crate::utils::format_wire_timestamp(at))
}

/// Builds the record submitted for one scan. The payload is copied verbatim;
/// check digits and lengths are left to the remote service.
pub fn assemble(raw_type: &RawType, raw_data: &str, now: DateTime<Utc>) -> CanonicalBarcode {
    CanonicalBarcode {
        symbology: barcode::normalize(raw_type),
        code: raw_data.to_string(),
        scanned_at: now,
    }
}
