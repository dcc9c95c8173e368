use std::fmt;

use serde::{Deserialize, Serialize};

/// Category assigned to a sentence by the semantic classifier
///
/// The set is closed: classifiers pick the best-scoring member and never
/// report an "unknown" category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Commitment,
    Question,
    Action,
    Context,
    Noise,
    Answer,
}

impl Label {
    /// All labels, in prototype order
    pub const ALL: [Label; 6] = [
        Label::Commitment,
        Label::Question,
        Label::Action,
        Label::Context,
        Label::Noise,
        Label::Answer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Commitment => "commitment",
            Label::Question => "question",
            Label::Action => "action",
            Label::Context => "context",
            Label::Noise => "noise",
            Label::Answer => "answer",
        }
    }

    /// Whether a chunk with this label can resolve a preceding question
    pub fn answers_question(&self) -> bool {
        matches!(
            self,
            Label::Answer | Label::Commitment | Label::Action | Label::Context
        )
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label shown to consumers, with questions split by answer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayLabel {
    Commitment,
    Action,
    Context,
    Noise,
    Answer,
    OpenQuestion,
    AnsweredQuestion,
}

impl DisplayLabel {
    pub fn derive(label: Label, is_answered: bool) -> Self {
        if is_answered {
            return DisplayLabel::AnsweredQuestion;
        }
        match label {
            Label::Question => DisplayLabel::OpenQuestion,
            Label::Commitment => DisplayLabel::Commitment,
            Label::Action => DisplayLabel::Action,
            Label::Context => DisplayLabel::Context,
            Label::Noise => DisplayLabel::Noise,
            Label::Answer => DisplayLabel::Answer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayLabel::Commitment => "commitment",
            DisplayLabel::Action => "action",
            DisplayLabel::Context => "context",
            DisplayLabel::Noise => "noise",
            DisplayLabel::Answer => "answer",
            DisplayLabel::OpenQuestion => "open_question",
            DisplayLabel::AnsweredQuestion => "answered_question",
        }
    }
}

impl fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Downstream destination of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    CommitmentEngine,
    RagEngine,
    Discarded,
    Flagged,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::CommitmentEngine => "commitment_engine",
            Route::RagEngine => "rag_engine",
            Route::Discarded => "discarded",
            Route::Flagged => "flagged",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
