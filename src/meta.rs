use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::Resource;
use crate::LOG_PREFIX;

/// Snapshot of the facts a resource reports about itself.
///
/// Taken once per stream and reused afterwards, changes made to the
/// resource from outside the stream are not reflected.
#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
pub struct Metadata {
    pub timed_out: bool,
    pub blocked: bool,
    pub wrapper_type: String,
    pub stream_type: String,
    pub mode: String,
    pub unread_bytes: u64,
    pub seekable: bool,
    pub uri: Option<String>,
}

impl Metadata {
    pub fn scan(resource: &Resource) -> Self {
        let metadata = Self {
            timed_out: false,
            blocked: true,
            wrapper_type: resource.wrapper_type().to_owned(),
            stream_type: resource.stream_type().to_owned(),
            mode: resource.mode().to_owned(),
            unread_bytes: 0,
            seekable: resource.probe_seekable(),
            uri: resource.uri(),
        };
        log::trace!("{} Scanned metadata {:?}", LOG_PREFIX, metadata);
        metadata
    }

    /// Look up a single field by its name.
    ///
    /// Unknown names and empty fields both yield `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut fields)) => {
                fields.remove(key).filter(|value| !value.is_null())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn memory() -> Metadata {
        Metadata::scan(&Resource::memory(Vec::new()))
    }

    #[rstest]
    #[case("mode", json!("w+b"))]
    #[case("seekable", json!(true))]
    #[case("wrapper_type", json!("memory"))]
    #[case("stream_type", json!("MEMORY"))]
    #[case("uri", json!("memory"))]
    #[case("unread_bytes", json!(0))]
    #[case("timed_out", json!(false))]
    #[case("blocked", json!(true))]
    fn fields(#[case] key: &str, #[case] expected: Value) {
        assert_eq!(memory().get(key), Some(expected));
    }

    #[test]
    fn missing_fields() {
        assert_eq!(memory().get("invalid"), None);

        let reader = Metadata::scan(&Resource::reader(std::io::empty()));
        assert_eq!(reader.get("uri"), None);
        assert_eq!(reader.get("seekable"), Some(json!(false)));
        assert_eq!(reader.get("mode"), Some(json!("rb")));
    }
}
