//! The local practice-question dataset: record types, load-once process
//! cache, and the metadata summary served by the introspection endpoint.
//!
//! The dataset is immutable for the process lifetime. It is loaded at most
//! once; concurrent first access is safe because the cell is filled under
//! `OnceLock`.

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::ChatEngineError;

/// Default dataset location, overridable via `PRACTICE_DATA_PATH`.
pub const DEFAULT_DATA_PATH: &str = "data/practice_questions.json";

/// One canned exam question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRecord {
    pub id: String,
    pub subject: String,
    pub topic: String,
    pub year: i32,
    pub difficulty: String,
    pub question: String,
    pub answer: String,
    pub solution: String,
    pub marks: u32,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl PracticeRecord {
    /// Concatenation of every searchable field, used by the lexical matcher.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![
            &self.question,
            &self.topic,
            &self.subject,
            &self.answer,
            &self.solution,
        ];
        parts.extend(self.keywords.iter().map(String::as_str));
        parts.extend(self.learning_objectives.iter().map(String::as_str));
        parts.join(" ")
    }

    /// Human-readable context block listing the record's fields plus the
    /// formatted relevance percentage.
    pub fn render_block(&self, score: f32) -> String {
        let mut out = String::new();
        out.push_str(&format!("Subject: {} ({})\n", self.subject, self.year));
        out.push_str(&format!("Topic: {}\n", self.topic));
        out.push_str(&format!("Question: {}\n", self.question));
        out.push_str(&format!("Answer: {}\n", self.answer));
        out.push_str(&format!("Solution: {}\n", self.solution));
        out.push_str(&format!("Difficulty: {} | Marks: {}\n", self.difficulty, self.marks));
        if !self.learning_objectives.is_empty() {
            out.push_str(&format!(
                "Learning objectives: {}\n",
                self.learning_objectives.join("; ")
            ));
        }
        out.push_str(&format!("Relevance: {:.0}%", score * 100.0));
        out
    }
}

/// The immutable record set plus its descriptive header.
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeDataset {
    /// Dataset-level metadata, passed through by `/chat-metadata`.
    #[serde(default)]
    pub metadata: Value,
    pub questions: Vec<PracticeRecord>,
}

impl PracticeDataset {
    /// Build an in-memory dataset (tests, fixtures).
    pub fn from_records(questions: Vec<PracticeRecord>) -> Self {
        Self { metadata: Value::Null, questions }
    }

    /// Read and parse the dataset file.
    ///
    /// # Errors
    /// Returns [`ChatEngineError::Dataset`] on I/O or JSON failures.
    pub fn load(path: &Path) -> Result<Self, ChatEngineError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ChatEngineError::Dataset(format!("read {}: {e}", path.display())))?;
        let dataset: Self = serde_json::from_str(&raw)
            .map_err(|e| ChatEngineError::Dataset(format!("parse {}: {e}", path.display())))?;
        info!(
            path = %path.display(),
            questions = dataset.questions.len(),
            "practice dataset loaded"
        );
        Ok(dataset)
    }

    /// Aggregate view of the dataset for the introspection endpoint.
    pub fn summary(&self) -> DatasetSummary {
        let mut subjects: Vec<SubjectSummary> = Vec::new();
        for record in &self.questions {
            let idx = match subjects.iter().position(|s| s.subject == record.subject) {
                Some(idx) => idx,
                None => {
                    subjects.push(SubjectSummary {
                        subject: record.subject.clone(),
                        count: 0,
                        topics: Vec::new(),
                        years: Vec::new(),
                        difficulties: Vec::new(),
                    });
                    subjects.len() - 1
                }
            };
            let entry = &mut subjects[idx];
            entry.count += 1;
            if !entry.topics.contains(&record.topic) {
                entry.topics.push(record.topic.clone());
            }
            if !entry.years.contains(&record.year) {
                entry.years.push(record.year);
            }
            if !entry.difficulties.contains(&record.difficulty) {
                entry.difficulties.push(record.difficulty.clone());
            }
        }
        for entry in &mut subjects {
            entry.years.sort_unstable();
        }
        DatasetSummary {
            total_questions: self.questions.len(),
            subjects,
            metadata: self.metadata.clone(),
        }
    }
}

/// Per-subject breakdown of the dataset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub subject: String,
    pub count: usize,
    pub topics: Vec<String>,
    pub years: Vec<i32>,
    pub difficulties: Vec<String>,
}

/// Payload of `/chat-metadata`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub total_questions: usize,
    pub subjects: Vec<SubjectSummary>,
    pub metadata: Value,
}

/// How the pipeline obtains the practice dataset.
///
/// `Shared` defers to the process-wide load-once cache so the file is only
/// read when a specific request (or the metadata endpoint) first needs it;
/// `Fixed` injects an in-memory dataset (tests, fixtures).
#[derive(Debug, Clone)]
pub enum DatasetHandle {
    Shared,
    Fixed(std::sync::Arc<PracticeDataset>),
}

impl DatasetHandle {
    /// Resolve the dataset, loading the shared one on first access.
    ///
    /// # Errors
    /// Returns [`ChatEngineError::Dataset`] when the shared dataset file
    /// cannot be read or parsed.
    pub fn get(&self) -> Result<&PracticeDataset, ChatEngineError> {
        match self {
            Self::Shared => shared_dataset(),
            Self::Fixed(dataset) => Ok(dataset),
        }
    }
}

static DATASET_CELL: OnceLock<Result<PracticeDataset, String>> = OnceLock::new();

/// Process-wide dataset accessor (load-once, concurrency-safe).
///
/// The path comes from `PRACTICE_DATA_PATH` (default
/// [`DEFAULT_DATA_PATH`]). A load failure is cached for the process
/// lifetime and reported as [`ChatEngineError::Dataset`] on every access.
pub fn shared_dataset() -> Result<&'static PracticeDataset, ChatEngineError> {
    let cell = DATASET_CELL.get_or_init(|| {
        let path =
            std::env::var("PRACTICE_DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
        PracticeDataset::load(Path::new(&path)).map_err(|e| e.to_string())
    });
    cell.as_ref().map_err(|e| ChatEngineError::Dataset(e.clone()))
}

#[cfg(test)]
pub(crate) fn fixture_record(id: &str, subject: &str, topic: &str) -> PracticeRecord {
    PracticeRecord {
        id: id.to_string(),
        subject: subject.to_string(),
        topic: topic.to_string(),
        year: 2023,
        difficulty: "medium".to_string(),
        question: format!("Sample {topic} question"),
        answer: format!("Sample {topic} answer"),
        solution: format!("Sample {topic} solution"),
        marks: 4,
        learning_objectives: vec![format!("Understand {topic}")],
        keywords: vec![topic.to_lowercase()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_groups_by_subject() {
        let dataset = PracticeDataset::from_records(vec![
            fixture_record("q1", "Mathematics", "Calculus"),
            fixture_record("q2", "Mathematics", "Algebra"),
            fixture_record("q3", "Physics", "Waves"),
        ]);
        let summary = dataset.summary();
        assert_eq!(summary.total_questions, 3);
        assert_eq!(summary.subjects.len(), 2);

        let maths = summary.subjects.iter().find(|s| s.subject == "Mathematics").unwrap();
        assert_eq!(maths.count, 2);
        assert_eq!(maths.topics, vec!["Calculus", "Algebra"]);
    }

    #[test]
    fn render_block_carries_relevance_percentage() {
        let record = fixture_record("q1", "Physics", "Waves");
        let block = record.render_block(0.87);
        assert!(block.contains("Subject: Physics (2023)"));
        assert!(block.contains("Relevance: 87%"));
    }

    #[test]
    fn dataset_parses_camel_case_fields() {
        let raw = r#"{
            "metadata": {"name": "demo"},
            "questions": [{
                "id": "m1",
                "subject": "Mathematics",
                "topic": "Calculus",
                "year": 2022,
                "difficulty": "hard",
                "question": "Differentiate x^2",
                "answer": "2x",
                "solution": "Apply the power rule.",
                "marks": 2,
                "learningObjectives": ["Differentiation"],
                "keywords": ["derivative"]
            }]
        }"#;
        let dataset: PracticeDataset = serde_json::from_str(raw).unwrap();
        assert_eq!(dataset.questions[0].learning_objectives, vec!["Differentiation"]);
        assert_eq!(dataset.metadata["name"], "demo");
    }
}
