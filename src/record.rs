use serde::{Deserialize, Serialize};

use crate::{assets::SAMPLE1_JSON, error::Error};

/// The record stored in `file/sample1.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample1 {
    pub hoge: i64,
    pub fuga: String,
}

impl Sample1 {
    /// Decodes a record from JSON bytes.
    ///
    /// Both fields are required; unknown fields are ignored.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decodes the copy of `file/sample1.json` compiled into the binary.
    pub fn embedded() -> Result<Self, Error> {
        Self::from_slice(SAMPLE1_JSON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_record() {
        let sample = Sample1::embedded().unwrap();
        assert_eq!(
            sample,
            Sample1 {
                hoge: 1,
                fuga: "2".into(),
            }
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let sample = Sample1::from_slice(br#"{"hoge":3,"fuga":"x","piyo":true}"#).unwrap();
        assert_eq!(sample.hoge, 3);
        assert_eq!(sample.fuga, "x");
    }

    #[test]
    fn malformed_json_is_a_decode_fault() {
        let err = Sample1::from_slice(b"{\"hoge\":1,").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn shape_mismatch_is_a_decode_fault() {
        let err = Sample1::from_slice(br#"{"hoge":"1","fuga":"2"}"#).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));

        let err = Sample1::from_slice(br#"{"hoge":1}"#).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(!err.is_not_found());
    }
}
