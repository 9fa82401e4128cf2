//! Interview question selection

use rand::Rng;

use crate::domain::error::InvalidQuestionIndex;

/// Questions shipped with the binary, used whenever the remote list
/// cannot be fetched.
pub const BUILT_IN_QUESTIONS: &[&str] = &[
    "Tell me about yourself.",
    "What are your strengths and weaknesses?",
    "Why do you want this job?",
    "Why did you leave your last job?",
];

/// Holds the question list and the currently selected question.
///
/// Exactly one question is current at any time. `randomize` draws
/// uniformly and independently, so it may land on the current question.
#[derive(Debug, Clone)]
pub struct QuestionSelector {
    questions: Vec<String>,
    current: usize,
}

impl QuestionSelector {
    /// Create a selector over the given list. An empty list falls back to
    /// the built-in questions so the selector is never unusable.
    pub fn new(questions: Vec<String>) -> Self {
        if questions.is_empty() {
            return Self::built_in();
        }
        Self {
            questions,
            current: 0,
        }
    }

    /// Create a selector over the built-in question list
    pub fn built_in() -> Self {
        Self {
            questions: BUILT_IN_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            current: 0,
        }
    }

    /// The currently selected question
    pub fn current(&self) -> &str {
        &self.questions[self.current]
    }

    /// All available questions, in list order
    pub fn all(&self) -> &[String] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        // The constructor guarantees a non-empty list
        false
    }

    /// Explicitly select a question by its index in the list
    pub fn select(&mut self, index: usize) -> Result<&str, InvalidQuestionIndex> {
        if index >= self.questions.len() {
            return Err(InvalidQuestionIndex {
                index,
                count: self.questions.len(),
            });
        }
        self.current = index;
        Ok(self.current())
    }

    /// Draw a question uniformly at random. Independent trials: the draw
    /// may repeat the current question.
    pub fn randomize(&mut self) -> &str {
        self.current = rand::thread_rng().gen_range(0..self.questions.len());
        self.current()
    }
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::built_in()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn built_in_list_is_available() {
        let selector = QuestionSelector::built_in();
        assert_eq!(selector.len(), BUILT_IN_QUESTIONS.len());
        assert_eq!(selector.current(), "Tell me about yourself.");
    }

    #[test]
    fn empty_list_falls_back_to_built_in() {
        let selector = QuestionSelector::new(vec![]);
        assert_eq!(selector.len(), BUILT_IN_QUESTIONS.len());
    }

    #[test]
    fn custom_list_is_used() {
        let selector = QuestionSelector::new(vec!["Q1".to_string(), "Q2".to_string()]);
        assert_eq!(selector.len(), 2);
        assert_eq!(selector.current(), "Q1");
    }

    #[test]
    fn select_by_index() {
        let mut selector = QuestionSelector::built_in();
        assert_eq!(selector.select(2).unwrap(), "Why do you want this job?");
        assert_eq!(selector.current(), "Why do you want this job?");
    }

    #[test]
    fn select_out_of_range_fails_and_keeps_current() {
        let mut selector = QuestionSelector::built_in();
        selector.select(1).unwrap();
        let err = selector.select(99).unwrap_err();
        assert_eq!(err.index, 99);
        assert_eq!(err.count, BUILT_IN_QUESTIONS.len());
        assert_eq!(selector.current(), BUILT_IN_QUESTIONS[1]);
    }

    #[test]
    fn randomize_stays_in_list() {
        let mut selector = QuestionSelector::built_in();
        for _ in 0..100 {
            let drawn = selector.randomize().to_string();
            assert!(BUILT_IN_QUESTIONS.contains(&drawn.as_str()));
        }
    }

    #[test]
    fn randomize_is_roughly_uniform() {
        let mut selector = QuestionSelector::built_in();
        let mut counts: HashMap<String, u32> = HashMap::new();
        let draws = 10_000;
        for _ in 0..draws {
            *counts.entry(selector.randomize().to_string()).or_default() += 1;
        }

        // Every question drawn, each within a generous band around the
        // expected draws/len. Statistical, not exact.
        assert_eq!(counts.len(), BUILT_IN_QUESTIONS.len());
        let expected = draws / BUILT_IN_QUESTIONS.len() as u32;
        for (question, count) in counts {
            assert!(
                count > expected / 2 && count < expected * 2,
                "question '{}' drawn {} times, expected about {}",
                question,
                count,
                expected
            );
        }
    }

    #[test]
    fn randomize_single_question_repeats() {
        let mut selector = QuestionSelector::new(vec!["only".to_string()]);
        assert_eq!(selector.randomize(), "only");
        assert_eq!(selector.randomize(), "only");
    }
}
