//! Choice responses and the submission-acceptance rule.

use super::roster::Roster;
use crate::primitives::CHOICES_PER_QUESTION;
use crate::{MemberId, QuestionId, SportmetryError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One respondent's choices, per question, by member name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceResponse {
    pub respondent: String,
    pub choices: BTreeMap<QuestionId, Vec<String>>,
}

impl ChoiceResponse {
    #[must_use]
    pub fn new(respondent: impl Into<String>) -> Self {
        Self {
            respondent: respondent.into(),
            choices: BTreeMap::new(),
        }
    }

    /// Builder: add the choices for one question.
    #[must_use]
    pub fn with_choices<I, S>(mut self, question: QuestionId, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices
            .insert(question, names.into_iter().map(Into::into).collect());
        self
    }
}

/// Accepted responses of one measurement.
///
/// Enforces, per response: the respondent is on the roster and has not
/// submitted before, every question of the questionnaire is answered, and
/// every answer names exactly three distinct roster members other than the
/// respondent. Rejected responses leave the collection untouched.
#[derive(Debug, Clone)]
pub struct Submissions {
    roster: Roster,
    questions: BTreeSet<QuestionId>,
    accepted: BTreeMap<MemberId, ChoiceResponse>,
}

impl Submissions {
    #[must_use]
    pub fn new(roster: Roster, questions: impl IntoIterator<Item = QuestionId>) -> Self {
        Self {
            roster,
            questions: questions.into_iter().collect(),
            accepted: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Validate and record a response.
    pub fn submit(&mut self, response: ChoiceResponse) -> Result<MemberId, SportmetryError> {
        let respondent = self
            .roster
            .resolve(&response.respondent)
            .ok_or_else(|| SportmetryError::UnknownRespondent(response.respondent.clone()))?;

        if self.accepted.contains_key(&respondent) {
            return Err(SportmetryError::DuplicateSubmission(
                response.respondent.clone(),
            ));
        }

        let reject = |question: QuestionId, reason: String| SportmetryError::InvalidSubmission {
            respondent: response.respondent.clone(),
            question,
            reason,
        };

        if let Some(extra) = response
            .choices
            .keys()
            .find(|q| !self.questions.contains(*q))
        {
            return Err(reject(*extra, "not part of the questionnaire".to_string()));
        }

        for &question in &self.questions {
            let names = response
                .choices
                .get(&question)
                .ok_or_else(|| reject(question, "missing answer".to_string()))?;

            if names.len() != CHOICES_PER_QUESTION {
                return Err(reject(
                    question,
                    format!("expected {CHOICES_PER_QUESTION} choices, got {}", names.len()),
                ));
            }

            let mut chosen = BTreeSet::new();
            for name in names {
                let target = self
                    .roster
                    .resolve(name)
                    .ok_or_else(|| reject(question, format!("{name} is not on the roster")))?;
                if target == respondent {
                    return Err(reject(question, "self-choice".to_string()));
                }
                if !chosen.insert(target) {
                    return Err(reject(question, format!("{name} chosen twice")));
                }
            }
        }

        self.accepted.insert(respondent, response);
        Ok(respondent)
    }

    /// Check if a member has already submitted.
    #[must_use]
    pub fn has_submitted(&self, member: MemberId) -> bool {
        self.accepted.contains_key(&member)
    }

    /// Members who have not submitted yet, in roster order.
    #[must_use]
    pub fn pending(&self) -> Vec<MemberId> {
        self.roster
            .members()
            .filter(|m| !self.accepted.contains_key(m))
            .collect()
    }

    /// Accepted responses in roster order.
    #[must_use]
    pub fn responses(&self) -> Vec<ChoiceResponse> {
        self.accepted.values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q1: QuestionId = QuestionId(1);
    const Q2: QuestionId = QuestionId(2);

    fn submissions() -> Submissions {
        let roster = Roster::new(["Anna", "Bence", "Csilla", "Dani", "Emese"]).expect("roster");
        Submissions::new(roster, [Q1, Q2])
    }

    fn valid(respondent: &str) -> ChoiceResponse {
        ChoiceResponse::new(respondent)
            .with_choices(Q1, ["Bence", "csilla", "Dani"])
            .with_choices(Q2, ["Emese", "Dani", "Bence"])
    }

    #[test]
    fn valid_response_is_accepted_once() {
        let mut subs = submissions();
        assert_eq!(subs.submit(valid("anna")).expect("accept"), MemberId(0));
        assert!(subs.has_submitted(MemberId(0)));
        assert_eq!(
            subs.submit(valid("Anna")),
            Err(SportmetryError::DuplicateSubmission("Anna".to_string()))
        );
        assert_eq!(subs.len(), 1);
        assert_eq!(subs.pending().len(), 4);
    }

    #[test]
    fn unknown_respondent_is_rejected() {
        let mut subs = submissions();
        assert!(matches!(
            subs.submit(valid("Zoltán")),
            Err(SportmetryError::UnknownRespondent(_))
        ));
    }

    #[test]
    fn choice_rules_are_enforced() {
        let mut subs = submissions();
        let cases = [
            valid("Anna").with_choices(Q1, ["Bence", "Dani"]),
            valid("Anna").with_choices(Q1, ["Bence", "Bence", "Dani"]),
            valid("Anna").with_choices(Q1, ["Anna", "Bence", "Dani"]),
            valid("Anna").with_choices(Q1, ["Bence", "Dani", "Zoltán"]),
            valid("Anna").with_choices(QuestionId(9), ["Bence", "Dani", "Emese"]),
            ChoiceResponse::new("Anna").with_choices(Q1, ["Bence", "Dani", "Emese"]),
        ];
        for response in cases {
            assert!(matches!(
                subs.submit(response),
                Err(SportmetryError::InvalidSubmission { .. })
            ));
        }
        assert!(subs.is_empty());
    }
}
