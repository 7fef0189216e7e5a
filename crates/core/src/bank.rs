use thiserror::Error;

use crate::model::{Difficulty, DifficultyFilter, QuestionDraft, QuestionError, QuestionRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank is empty")]
    Empty,

    #[error("question bank has no {0} questions")]
    MissingTier(Difficulty),

    #[error("question {index}: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Immutable, ordered catalog of questions.
///
/// Holds at least one question per tier so that no single-tier filter is
/// unsatisfiable by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<QuestionRecord>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `BankError::Empty` or `BankError::MissingTier` if a tier has no questions.
    pub fn new(questions: Vec<QuestionRecord>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        for tier in Difficulty::ALL {
            if !questions.iter().any(|q| q.difficulty() == tier) {
                return Err(BankError::MissingTier(tier));
            }
        }
        Ok(Self { questions })
    }

    /// Validate a list of drafts, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidQuestion` for the first invalid draft, or the
    /// errors of [`QuestionBank::new`].
    pub fn from_drafts(drafts: Vec<QuestionDraft>) -> Result<Self, BankError> {
        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate()
                    .map_err(|source| BankError::InvalidQuestion { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    /// The bundled cardiology bank: five questions per tier.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled data itself is invalid.
    pub fn builtin() -> Result<Self, BankError> {
        let drafts = BUILTIN
            .iter()
            .map(|(text, choices, answer, difficulty)| QuestionDraft {
                text: (*text).to_owned(),
                choices: choices.iter().map(|c| (*c).to_owned()).collect(),
                answer: (*answer).to_owned(),
                difficulty: *difficulty,
            })
            .collect();
        Self::from_drafts(drafts)
    }

    /// Every question, in bank order.
    #[must_use]
    pub fn all(&self) -> &[QuestionRecord] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions of exactly `difficulty`, in bank order.
    #[must_use]
    pub fn filter_by_difficulty(&self, difficulty: Difficulty) -> Vec<&QuestionRecord> {
        self.questions
            .iter()
            .filter(|q| q.difficulty() == difficulty)
            .collect()
    }

    /// Candidate pool for a session filter, in bank order.
    #[must_use]
    pub fn pool(&self, filter: DifficultyFilter) -> Vec<&QuestionRecord> {
        self.questions
            .iter()
            .filter(|q| filter.matches(q.difficulty()))
            .collect()
    }
}

type BuiltinQuestion = (&'static str, &'static [&'static str], &'static str, Difficulty);

const BUILTIN: &[BuiltinQuestion] = &[
    (
        "What is a healthy resting heart rate for most adults?",
        &["40-60 bpm", "60-100 bpm", "100-120 bpm", "120-140 bpm"],
        "60-100 bpm",
        Difficulty::Easy,
    ),
    (
        "Which organ is primarily affected by myocardial infarction?",
        &["Liver", "Heart", "Lungs", "Kidney"],
        "Heart",
        Difficulty::Easy,
    ),
    (
        "Is chest pain a common symptom of heart disease?",
        &["Yes", "No"],
        "Yes",
        Difficulty::Easy,
    ),
    (
        "What does 'BP' commonly stand for?",
        &["Blood Power", "Blood Pressure", "Body Pressure", "Base Pressure"],
        "Blood Pressure",
        Difficulty::Easy,
    ),
    (
        "Does exercise-induced angina mean chest pain during exercise?",
        &["Yes", "No"],
        "Yes",
        Difficulty::Easy,
    ),
    (
        "Which artery is commonly used to measure pulse at the wrist?",
        &["Carotid", "Femoral", "Radial", "Brachial"],
        "Radial",
        Difficulty::Medium,
    ),
    (
        "A thalach in the dataset refers to?",
        &["Cholesterol", "Max heart rate achieved", "Blood sugar", "ST depression"],
        "Max heart rate achieved",
        Difficulty::Medium,
    ),
    (
        "Which dataset field indicates fasting blood sugar > 120 mg/dl?",
        &["fbs", "cp", "thal", "slope"],
        "fbs",
        Difficulty::Medium,
    ),
    (
        "What does 'ca' represent in the dataset?",
        &["Cholesterol", "Number of major vessels", "Chest pain", "Thallium test"],
        "Number of major vessels",
        Difficulty::Medium,
    ),
    (
        "Is 'oldpeak' a measure of ST depression induced by exercise?",
        &["Yes", "No"],
        "Yes",
        Difficulty::Medium,
    ),
    (
        "Which thal value indicates a reversible defect?",
        &["normal", "fixed defect", "reversible defect"],
        "reversible defect",
        Difficulty::Hard,
    ),
    (
        "Which slope of the peak exercise ST segment is associated with worse prognosis?",
        &["upsloping", "flat", "downsloping"],
        "downsloping",
        Difficulty::Hard,
    ),
    (
        "Higher 'oldpeak' values indicate:",
        &["Less ischemia", "More ischemia"],
        "More ischemia",
        Difficulty::Hard,
    ),
    (
        "A patient with exang = 1 means:",
        &["No angina", "Exercise-induced angina"],
        "Exercise-induced angina",
        Difficulty::Hard,
    ),
    (
        "Thallium stress test is used to assess:",
        &["ECG rhythm", "Myocardial perfusion", "Blood pressure", "Cholesterol"],
        "Myocardial perfusion",
        Difficulty::Hard,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, difficulty: Difficulty) -> QuestionRecord {
        QuestionRecord::new(text, vec!["a".into(), "b".into()], "a", difficulty).unwrap()
    }

    #[test]
    fn builtin_bank_has_five_per_tier() {
        let bank = QuestionBank::builtin().unwrap();
        assert_eq!(bank.len(), 15);
        for tier in Difficulty::ALL {
            assert_eq!(bank.filter_by_difficulty(tier).len(), 5);
        }
    }

    #[test]
    fn filter_preserves_bank_order() {
        let bank = QuestionBank::new(vec![
            question("h1", Difficulty::Hard),
            question("e1", Difficulty::Easy),
            question("m1", Difficulty::Medium),
            question("h2", Difficulty::Hard),
        ])
        .unwrap();

        let hard: Vec<_> = bank
            .filter_by_difficulty(Difficulty::Hard)
            .iter()
            .map(|q| q.text())
            .collect();
        assert_eq!(hard, ["h1", "h2"]);
        assert_eq!(bank.pool(DifficultyFilter::Mixed).len(), 4);
    }

    #[test]
    fn bank_requires_every_tier() {
        let err = QuestionBank::new(vec![
            question("e1", Difficulty::Easy),
            question("h1", Difficulty::Hard),
        ])
        .unwrap_err();
        assert_eq!(err, BankError::MissingTier(Difficulty::Medium));
        assert_eq!(QuestionBank::new(Vec::new()).unwrap_err(), BankError::Empty);
    }

    #[test]
    fn invalid_draft_reports_its_index() {
        let drafts = vec![QuestionDraft {
            text: "Q".into(),
            choices: vec!["a".into(), "b".into()],
            answer: "z".into(),
            difficulty: Difficulty::Easy,
        }];
        let err = QuestionBank::from_drafts(drafts).unwrap_err();
        assert!(matches!(err, BankError::InvalidQuestion { index: 0, .. }));
    }
}
