//! Job descriptor wire types
//!
//! A job descriptor is transient: it exists only as a JSON-encoded queue
//! message body between producer and consumer. The wire envelope keeps the
//! historical `{id, category, action, params}` shape; in process, jobs are a
//! closed tagged union so the dispatcher can match exhaustively and an
//! unknown `(category, action)` pair is rejected at parse time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only category carried on the wire today.
pub const CATEGORY_ARTICLE: &str = "article";

const ACTION_INIT: &str = "init";
const ACTION_TRANSLATE: &str = "translate";

/// JSON envelope as carried on the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEnvelope {
    pub id: i64,
    pub category: String,
    pub action: String,
    #[serde(default)]
    pub params: JobParams,
}

/// Action parameters. `language` is present for `translate` only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Typed article pipeline job.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleJob {
    /// Summarize the canonical article, then fan out translate jobs.
    Init { article_id: i64 },
    /// Produce or refresh the one translated row for `(article_id, language)`.
    Translate { article_id: i64, language: String },
}

impl ArticleJob {
    pub fn article_id(&self) -> i64 {
        match self {
            ArticleJob::Init { article_id } => *article_id,
            ArticleJob::Translate { article_id, .. } => *article_id,
        }
    }

    /// Serialize to the wire envelope JSON.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&JobEnvelope::from(self))
    }

    /// Parse a queue message body into a typed job.
    pub fn decode(body: &str) -> Result<Self, JobParseError> {
        let envelope: JobEnvelope = serde_json::from_str(body)?;
        ArticleJob::try_from(envelope)
    }
}

impl From<&ArticleJob> for JobEnvelope {
    fn from(job: &ArticleJob) -> Self {
        match job {
            ArticleJob::Init { article_id } => JobEnvelope {
                id: *article_id,
                category: CATEGORY_ARTICLE.to_string(),
                action: ACTION_INIT.to_string(),
                params: JobParams::default(),
            },
            ArticleJob::Translate {
                article_id,
                language,
            } => JobEnvelope {
                id: *article_id,
                category: CATEGORY_ARTICLE.to_string(),
                action: ACTION_TRANSLATE.to_string(),
                params: JobParams {
                    language: Some(language.clone()),
                },
            },
        }
    }
}

impl TryFrom<JobEnvelope> for ArticleJob {
    type Error = JobParseError;

    fn try_from(envelope: JobEnvelope) -> Result<Self, JobParseError> {
        if envelope.category != CATEGORY_ARTICLE {
            return Err(JobParseError::UnknownCategory(envelope.category));
        }
        match envelope.action.as_str() {
            ACTION_INIT => Ok(ArticleJob::Init {
                article_id: envelope.id,
            }),
            ACTION_TRANSLATE => {
                let language = envelope
                    .params
                    .language
                    .ok_or(JobParseError::MissingLanguage)?;
                Ok(ArticleJob::Translate {
                    article_id: envelope.id,
                    language,
                })
            }
            other => Err(JobParseError::UnknownAction(other.to_string())),
        }
    }
}

/// Failure to turn a queue message body into a typed job.
#[derive(Debug, Error)]
pub enum JobParseError {
    #[error("Malformed job envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown job category: {0}")]
    UnknownCategory(String),

    #[error("Unknown job action: {0}")]
    UnknownAction(String),

    #[error("Translate job missing params.language")]
    MissingLanguage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_round_trip() {
        let job = ArticleJob::Init { article_id: 7 };
        let body = job.encode().unwrap();
        assert_eq!(
            body,
            r#"{"id":7,"category":"article","action":"init","params":{}}"#
        );
        assert_eq!(ArticleJob::decode(&body).unwrap(), job);
    }

    #[test]
    fn translate_round_trip() {
        let job = ArticleJob::Translate {
            article_id: 42,
            language: "English".to_string(),
        };
        let body = job.encode().unwrap();
        assert_eq!(
            body,
            r#"{"id":42,"category":"article","action":"translate","params":{"language":"English"}}"#
        );
        assert_eq!(ArticleJob::decode(&body).unwrap(), job);
    }

    #[test]
    fn decode_accepts_missing_params_for_init() {
        let job = ArticleJob::decode(r#"{"id":3,"category":"article","action":"init"}"#).unwrap();
        assert_eq!(job, ArticleJob::Init { article_id: 3 });
    }

    #[test]
    fn decode_rejects_unknown_category() {
        let err =
            ArticleJob::decode(r#"{"id":1,"category":"brand","action":"init","params":{}}"#)
                .unwrap_err();
        assert!(matches!(err, JobParseError::UnknownCategory(c) if c == "brand"));
    }

    #[test]
    fn decode_rejects_unknown_action() {
        let err =
            ArticleJob::decode(r#"{"id":1,"category":"article","action":"publish","params":{}}"#)
                .unwrap_err();
        assert!(matches!(err, JobParseError::UnknownAction(a) if a == "publish"));
    }

    #[test]
    fn decode_rejects_translate_without_language() {
        let err =
            ArticleJob::decode(r#"{"id":1,"category":"article","action":"translate","params":{}}"#)
                .unwrap_err();
        assert!(matches!(err, JobParseError::MissingLanguage));
    }

    #[test]
    fn decode_rejects_malformed_json() {
        assert!(matches!(
            ArticleJob::decode("not json").unwrap_err(),
            JobParseError::Json(_)
        ));
    }
}
