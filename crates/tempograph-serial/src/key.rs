//! # Temporal Key Codec
//!
//! Pure conversion between [`TemporalKey`] and its tree representation: the
//! `businessDate` / `processingDate` entries of an object body, each an
//! ISO 8601 string. Encoding is order-stable (business before processing);
//! decoding enforces the dimensions the target type declares and rejects a
//! missing required dimension rather than defaulting it, so a type with no
//! temporal shape decodes to the empty key and never to a zeroed date.

use serde_json::{Map, Value};

use tempograph_model::{TemporalKey, TemporalShape, Timestamp};

use crate::error::SerialError;
use crate::wire::{BUSINESS_DATE_FIELD, PROCESSING_DATE_FIELD};

/// Append the key's dimensions to an object body, business date first.
/// The empty key appends nothing.
pub fn encode_key(key: &TemporalKey, out: &mut Map<String, Value>) {
    if let Some(business) = &key.business_date {
        out.insert(
            BUSINESS_DATE_FIELD.to_string(),
            Value::String(business.to_iso8601()),
        );
    }
    if let Some(processing) = &key.processing_date {
        out.insert(
            PROCESSING_DATE_FIELD.to_string(),
            Value::String(processing.to_iso8601()),
        );
    }
}

/// Read the dimensions `shape` declares out of an object body.
///
/// # Errors
///
/// [`SerialError::MalformedTemporalKey`] if a declared dimension is absent,
/// is not a string, or does not parse as a timestamp.
pub fn decode_key(body: &Map<String, Value>, shape: TemporalShape) -> Result<TemporalKey, SerialError> {
    let business_date = if shape.has_business() {
        Some(decode_dimension(body, BUSINESS_DATE_FIELD)?)
    } else {
        None
    };
    let processing_date = if shape.has_processing() {
        Some(decode_dimension(body, PROCESSING_DATE_FIELD)?)
    } else {
        None
    };
    Ok(TemporalKey {
        business_date,
        processing_date,
    })
}

fn decode_dimension(body: &Map<String, Value>, field: &str) -> Result<Timestamp, SerialError> {
    let value = body
        .get(field)
        .ok_or_else(|| SerialError::MalformedTemporalKey(format!("missing {field}")))?;
    let text = value.as_str().ok_or_else(|| {
        SerialError::MalformedTemporalKey(format!("{field} must be a string, got {value}"))
    })?;
    Timestamp::parse(text)
        .map_err(|e| SerialError::MalformedTemporalKey(format!("{field}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_empty_key_encodes_to_nothing() {
        let mut out = Map::new();
        encode_key(&TemporalKey::empty(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_key_decodes_symmetrically() {
        let body = Map::new();
        let key = decode_key(&body, TemporalShape::None).unwrap();
        assert!(key.is_empty());
    }

    #[test]
    fn test_bitemporal_key_round_trip() {
        let key = TemporalKey::bitemporal(ts("2026-01-15T00:00:00Z"), ts("2026-02-01T09:30:00.500Z"));
        let mut out = Map::new();
        encode_key(&key, &mut out);
        assert_eq!(
            out.get(BUSINESS_DATE_FIELD).and_then(|v| v.as_str()),
            Some("2026-01-15T00:00:00.000Z")
        );
        let decoded = decode_key(&out, TemporalShape::Bitemporal).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_business_before_processing() {
        let key = TemporalKey::bitemporal(ts("2026-01-15T00:00:00Z"), ts("2026-02-01T00:00:00Z"));
        let mut out = Map::new();
        encode_key(&key, &mut out);
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![BUSINESS_DATE_FIELD, PROCESSING_DATE_FIELD]);
    }

    #[test]
    fn test_missing_required_dimension_rejected() {
        let mut body = Map::new();
        body.insert(
            BUSINESS_DATE_FIELD.to_string(),
            Value::String("2026-01-15T00:00:00Z".to_string()),
        );
        let err = decode_key(&body, TemporalShape::Bitemporal).unwrap_err();
        assert!(matches!(err, SerialError::MalformedTemporalKey(_)));
        assert!(err.to_string().contains(PROCESSING_DATE_FIELD));
    }

    #[test]
    fn test_non_string_dimension_rejected() {
        let mut body = Map::new();
        body.insert(BUSINESS_DATE_FIELD.to_string(), Value::Bool(true));
        assert!(decode_key(&body, TemporalShape::Business).is_err());
    }

    #[test]
    fn test_unparsable_dimension_rejected() {
        let mut body = Map::new();
        body.insert(
            PROCESSING_DATE_FIELD.to_string(),
            Value::String("yesterday".to_string()),
        );
        assert!(decode_key(&body, TemporalShape::Processing).is_err());
    }

    #[test]
    fn test_undeclared_dimension_ignored() {
        // A type with no temporal shape never reads the date fields, even if
        // present; they fall through to the decoder's field policy.
        let mut body = Map::new();
        body.insert(
            BUSINESS_DATE_FIELD.to_string(),
            Value::String("2026-01-15T00:00:00Z".to_string()),
        );
        let key = decode_key(&body, TemporalShape::None).unwrap();
        assert!(key.is_empty());
    }
}
