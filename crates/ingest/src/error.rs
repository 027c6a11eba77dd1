use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("The survey does not contain any moons")]
    EmptySurvey,

    #[error("Survey line {line}: {message}")]
    Survey { line: usize, message: String },

    #[error("Failed to parse body of notification {id}: {source}")]
    NotificationBody {
        id: i64,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid LDAP timestamp: {0}")]
    InvalidTimestamp(i64),
}

impl IngestError {
    pub(crate) fn survey(line: usize, message: impl Into<String>) -> Self {
        IngestError::Survey {
            line,
            message: message.into(),
        }
    }
}
