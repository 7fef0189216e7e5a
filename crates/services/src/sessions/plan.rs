use rand::Rng;
use rand::seq::SliceRandom;
use tracing::warn;

use quiz_core::QuestionBank;
use quiz_core::model::{DifficultyFilter, QuestionRecord};

use crate::error::SessionError;

/// Ordered questions selected for one play-through.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<QuestionRecord>,
    pub filter: DifficultyFilter,
    pub requested: usize,
    pub pool_size: usize,
}

impl SessionPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Picks a random, duplicate-free sequence of questions from a bank.
///
/// The random source is passed to [`SessionBuilder::build`] so callers control
/// determinism; the builder itself holds no mutable state.
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
    filter: DifficultyFilter,
    count: usize,
}

impl<'a> SessionBuilder<'a> {
    pub const DEFAULT_COUNT: usize = 5;

    #[must_use]
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self {
            bank,
            filter: DifficultyFilter::Mixed,
            count: Self::DEFAULT_COUNT,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: DifficultyFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Use a filter given by name ("Mixed", "Easy", ...).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` for a name that matches no tier, the
    /// same error as a known tier with no questions.
    pub fn with_filter_label(self, label: &str) -> Result<Self, SessionError> {
        let filter = label
            .parse::<DifficultyFilter>()
            .map_err(|_| SessionError::EmptyPool {
                filter: label.to_owned(),
            })?;
        Ok(self.with_filter(filter))
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Build a session plan.
    ///
    /// - The pool is the whole bank for `Mixed`, otherwise the matching tier.
    /// - The pool is shuffled uniformly and truncated to `min(count, pool size)`.
    ///   Asking for more questions than exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidCount` for a zero count and
    /// `SessionError::EmptyPool` if no question matches the filter.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<SessionPlan, SessionError> {
        if self.count == 0 {
            return Err(SessionError::InvalidCount);
        }

        let mut questions: Vec<QuestionRecord> =
            self.bank.pool(self.filter).into_iter().cloned().collect();
        if questions.is_empty() {
            return Err(SessionError::EmptyPool {
                filter: self.filter.to_string(),
            });
        }

        let pool_size = questions.len();
        questions.shuffle(rng);
        questions.truncate(self.count);

        if self.count > pool_size {
            warn!(
                filter = %self.filter,
                requested = self.count,
                available = pool_size,
                "session size clamped to pool size"
            );
        }

        Ok(SessionPlan {
            questions,
            filter: self.filter,
            requested: self.count,
            pool_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Difficulty;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn question(text: String, difficulty: Difficulty) -> QuestionRecord {
        QuestionRecord::new(text, vec!["a".into(), "b".into()], "a", difficulty).unwrap()
    }

    fn bank_with_counts(easy: usize, medium: usize, hard: usize) -> QuestionBank {
        let mut questions = Vec::new();
        for (tier, n) in [
            (Difficulty::Easy, easy),
            (Difficulty::Medium, medium),
            (Difficulty::Hard, hard),
        ] {
            for i in 0..n {
                questions.push(question(format!("{tier} {i}"), tier));
            }
        }
        QuestionBank::new(questions).unwrap()
    }

    #[test]
    fn builder_returns_min_of_count_and_pool_without_duplicates() {
        let bank = bank_with_counts(4, 6, 5);
        let mut rng = StdRng::seed_from_u64(7);

        for filter in [
            DifficultyFilter::Mixed,
            DifficultyFilter::Only(Difficulty::Easy),
            DifficultyFilter::Only(Difficulty::Medium),
            DifficultyFilter::Only(Difficulty::Hard),
        ] {
            let pool = bank.pool(filter).len();
            for count in 1..=20 {
                let plan = SessionBuilder::new(&bank)
                    .with_filter(filter)
                    .with_count(count)
                    .build(&mut rng)
                    .unwrap();
                assert_eq!(plan.total(), count.min(pool));
                assert_eq!(plan.pool_size, pool);
                assert_eq!(plan.requested, count);

                let texts: HashSet<_> = plan.questions.iter().map(QuestionRecord::text).collect();
                assert_eq!(texts.len(), plan.total(), "duplicates for {filter}");
                assert!(plan.questions.iter().all(|q| filter.matches(q.difficulty())));
            }
        }
    }

    #[test]
    fn hard_filter_with_five_questions_clamps_ten_to_five() {
        let bank = bank_with_counts(2, 2, 5);
        let plan = SessionBuilder::new(&bank)
            .with_filter(DifficultyFilter::Only(Difficulty::Hard))
            .with_count(10)
            .build(&mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(plan.total(), 5);
        assert_eq!(plan.requested, 10);
        assert_eq!(plan.pool_size, 5);
    }

    #[test]
    fn unknown_filter_label_is_an_empty_pool() {
        let bank = bank_with_counts(1, 1, 1);
        let err = SessionBuilder::new(&bank)
            .with_filter_label("Purple")
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::EmptyPool { filter } if filter == "Purple"));
    }

    #[test]
    fn zero_count_is_rejected() {
        let bank = bank_with_counts(1, 1, 1);
        let err = SessionBuilder::new(&bank)
            .with_count(0)
            .build(&mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidCount));
    }

    #[test]
    fn same_seed_gives_same_order() {
        let bank = QuestionBank::builtin().unwrap();
        let a = SessionBuilder::new(&bank)
            .with_count(15)
            .build(&mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = SessionBuilder::new(&bank)
            .with_count(15)
            .build(&mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a.questions, b.questions);
    }

    #[test]
    fn every_question_can_come_first() {
        let bank = bank_with_counts(1, 1, 3);
        let mut rng = StdRng::seed_from_u64(3);
        let mut firsts = HashSet::new();
        for _ in 0..200 {
            let plan = SessionBuilder::new(&bank)
                .with_count(1)
                .build(&mut rng)
                .unwrap();
            firsts.insert(plan.questions[0].text().to_owned());
        }
        assert_eq!(firsts.len(), bank.len());
    }
}
