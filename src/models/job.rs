use serde::{ Serialize, Deserialize };

use crate::error::ProtocolError;

/// One unit of work pulled from the queue.
///
/// `messages` is chronological: the last element is the current query and
/// everything before it is prior conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub messages: Vec<String>,
}

impl Job {
    /// Decodes a raw queue payload. Unknown fields are ignored.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(payload)?;
        let job: Job = serde_json::from_str(text)?;
        job.validate()?;
        Ok(job)
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.id.is_empty() {
            return Err(ProtocolError::EmptyId);
        }
        if self.messages.is_empty() {
            return Err(ProtocolError::EmptyMessages(self.id.clone()));
        }
        Ok(())
    }
}

/// The payload written to the result store under the job id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_well_formed_payload() {
        let raw = br#"{"id":"j1","messages":["hi","hello, how can I help?","what's the weather?"]}"#;
        let job = Job::from_payload(raw).unwrap();
        assert_eq!(job.id, "j1");
        assert_eq!(job.messages.len(), 3);
        assert_eq!(job.messages[2], "what's the weather?");
    }

    #[test]
    fn ignores_unknown_fields() {
        let raw = br#"{"id":"j1","messages":["q"],"priority":3}"#;
        assert!(Job::from_payload(raw).is_ok());
    }

    #[test]
    fn rejects_missing_messages() {
        let err = Job::from_payload(br#"{"id":"j1"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));
    }

    #[test]
    fn rejects_non_string_messages() {
        let err = Job::from_payload(br#"{"id":"j1","messages":[1,2]}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidJson(_)));
    }

    #[test]
    fn rejects_garbage_and_bad_utf8() {
        assert!(matches!(
            Job::from_payload(b"not json").unwrap_err(),
            ProtocolError::InvalidJson(_)
        ));
        assert!(matches!(
            Job::from_payload(&[0xff, 0xfe, 0x00]).unwrap_err(),
            ProtocolError::InvalidUtf8(_)
        ));
    }

    #[test]
    fn rejects_empty_id_and_empty_messages() {
        assert!(matches!(
            Job::from_payload(br#"{"id":"","messages":["q"]}"#).unwrap_err(),
            ProtocolError::EmptyId
        ));
        assert!(matches!(
            Job::from_payload(br#"{"id":"j9","messages":[]}"#).unwrap_err(),
            ProtocolError::EmptyMessages(id) if id == "j9"
        ));
    }

    #[test]
    fn result_serializes_to_content_document() {
        let json = serde_json::to_string(&JobResult { content: "It's sunny.".into() }).unwrap();
        assert_eq!(json, r#"{"content":"It's sunny."}"#);
    }
}
