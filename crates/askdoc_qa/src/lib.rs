pub mod rank;
pub mod segment;
pub mod stopwords;
pub mod synthesize;
pub mod vectorize;

use askdoc_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::rank::RankOutcome;
use crate::vectorize::VectorizeOutcome;

/// Public result of answering a question against the stored document text.
///
/// `Answered` carries the synthesized answer verbatim; the other kinds map
/// to fixed user-facing messages at the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerResult {
    Answered { text: String },
    NoConfidentMatch,
    NoDocument,
}

/// Terminal states of one pipeline invocation, kept distinct so hosts can
/// log why a question went unanswered. The public mapping folds
/// `NoVocabulary` into [`AnswerResult::NoConfidentMatch`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Answered { text: String },
    NoConfidentMatch,
    NoVocabulary,
}

/// Runs the full retrieval pipeline: segment, vectorize, rank, synthesize.
///
/// Each invocation builds its own ephemeral vector space and shares no
/// state with any other; calling it twice with the same inputs yields the
/// same outcome. The question must be non-empty after trimming.
pub fn run_pipeline(document_text: &str, question: &str) -> Result<PipelineOutcome, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::new(
            "QA_QUESTION_EMPTY",
            "Question must not be empty",
        ));
    }

    let units = segment::segment(document_text);

    let (query_vector, unit_vectors) = match vectorize::build(&units, question) {
        VectorizeOutcome::EmptyVocabulary => return Ok(PipelineOutcome::NoVocabulary),
        VectorizeOutcome::Vectorized {
            query_vector,
            unit_vectors,
        } => (query_vector, unit_vectors),
    };

    let candidates = match rank::rank(&query_vector, unit_vectors) {
        RankOutcome::NoConfidentMatch => return Ok(PipelineOutcome::NoConfidentMatch),
        RankOutcome::Confident(candidates) => candidates,
    };

    match synthesize::synthesize(&candidates) {
        Some(text) => Ok(PipelineOutcome::Answered { text }),
        None => Ok(PipelineOutcome::NoConfidentMatch),
    }
}

/// Answers a question against one document's extracted text.
///
/// This is the single entry point hosts call once per question. An empty
/// document short-circuits to [`AnswerResult::NoDocument`] before
/// segmentation; sourcing the text is the caller's concern.
pub fn answer_question(document_text: &str, question: &str) -> Result<AnswerResult, AppError> {
    if document_text.trim().is_empty() {
        return Ok(AnswerResult::NoDocument);
    }
    Ok(match run_pipeline(document_text, question)? {
        PipelineOutcome::Answered { text } => AnswerResult::Answered { text },
        PipelineOutcome::NoConfidentMatch | PipelineOutcome::NoVocabulary => {
            AnswerResult::NoConfidentMatch
        }
    })
}
