use serde::{Deserialize, Serialize};

use crate::domain::{FaqTopic, Feedback, ProblemKind};

pub const PROBLEM_PATH: &str = "/api/support/problem";
pub const FAQ_FEEDBACK_PATH: &str = "/api/support/faq_feedback";

/// Marker header attached to every widget submission.
pub const WIDGET_HEADER: &str = "X-Support-Widget";
pub const WIDGET_HEADER_VALUE: &str = "1";
pub const WIDGET_SOURCE: &str = "widget";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SupportRequest {
    ReportProblem { problem: ProblemKind },
    FaqFeedback { faq: FaqTopic, feedback: Feedback },
}

impl SupportRequest {
    pub fn path(&self) -> &'static str {
        match self {
            SupportRequest::ReportProblem { .. } => PROBLEM_PATH,
            SupportRequest::FaqFeedback { .. } => FAQ_FEEDBACK_PATH,
        }
    }

    /// Urlencoded body fields, `source` last.
    pub fn form_fields(&self) -> Vec<(&'static str, &'static str)> {
        let mut fields = match self {
            SupportRequest::ReportProblem { problem } => vec![("problem", problem.key())],
            SupportRequest::FaqFeedback { faq, feedback } => {
                vec![("faq", faq.key()), ("feedback", feedback.key())]
            }
        };
        fields.push(("source", WIDGET_SOURCE));
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportReply {
    pub ok: bool,
    pub message: String,
}

impl SupportReply {
    pub fn new(ok: bool, message: impl Into<String>) -> Self {
        Self {
            ok,
            message: message.into(),
        }
    }
}
