use std::ops::RangeInclusive;

use super::draft::{phone_digit_count, ApplicationDraft};

/// Minimum motivation length after trimming, in UTF-16 code units as the browser form
/// measures it, so an emoji counts twice.
pub const MIN_MOTIVATION_LEN: usize = 30;
/// Accepted number of digits in a phone number once formatting is stripped.
pub const PHONE_DIGIT_RANGE: RangeInclusive<usize> = 10..=15;

/// Pages of the application wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    BasicInfo,
    Motivation,
    Interests,
    Background,
    Confirm,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::BasicInfo,
        WizardStep::Motivation,
        WizardStep::Interests,
        WizardStep::Background,
        WizardStep::Confirm,
    ];
    pub const FIRST: WizardStep = WizardStep::BasicInfo;
    pub const LAST: WizardStep = WizardStep::Confirm;

    pub const fn index(self) -> usize {
        match self {
            WizardStep::BasicInfo => 0,
            WizardStep::Motivation => 1,
            WizardStep::Interests => 2,
            WizardStep::Background => 3,
            WizardStep::Confirm => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn title(self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "Basic Info",
            WizardStep::Motivation => "Motivation & Verticals",
            WizardStep::Interests => "Interest Areas",
            WizardStep::Background => "Background & Uploads",
            WizardStep::Confirm => "Confirm & Submit",
        }
    }

    /// Following step, staying on the last one.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(Self::LAST)
    }

    /// Preceding step, staying on the first one.
    pub fn previous(self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(Self::from_index)
            .unwrap_or(Self::FIRST)
    }

    pub const fn is_last(self) -> bool {
        matches!(self, WizardStep::Confirm)
    }
}

/// Read access to the answers the step predicates inspect.
///
/// Implemented by the client-side draft and by the payload the server receives, so both
/// ends gate on the same rules.
pub trait ApplicationAnswers {
    fn full_name(&self) -> &str;
    fn usn(&self) -> &str;
    fn phone(&self) -> &str;
    fn has_branch(&self) -> bool;
    fn has_year(&self) -> bool;
    fn motivation(&self) -> &str;
    fn vertical_count(&self) -> usize;
    fn has_interest_area(&self) -> bool;
    fn interest_other(&self) -> &str;
    fn has_residence(&self) -> bool;
    fn consent_gdpr(&self) -> bool;
    fn consent_terms(&self) -> bool;
}

impl ApplicationAnswers for ApplicationDraft {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn usn(&self) -> &str {
        &self.usn
    }

    fn phone(&self) -> &str {
        &self.phone
    }

    fn has_branch(&self) -> bool {
        self.branch.is_some()
    }

    fn has_year(&self) -> bool {
        self.year.is_some()
    }

    fn motivation(&self) -> &str {
        &self.motivation
    }

    fn vertical_count(&self) -> usize {
        self.verticals.len()
    }

    fn has_interest_area(&self) -> bool {
        !self.interest_areas.is_empty()
    }

    fn interest_other(&self) -> &str {
        &self.interest_other
    }

    fn has_residence(&self) -> bool {
        self.residence.is_some()
    }

    fn consent_gdpr(&self) -> bool {
        self.consent_gdpr
    }

    fn consent_terms(&self) -> bool {
        self.consent_terms
    }
}

pub fn is_phone_valid(phone: &str) -> bool {
    PHONE_DIGIT_RANGE.contains(&phone_digit_count(phone))
}

/// Whether the answers satisfy the gate of `step`. Depends on nothing but current values.
///
/// Email is not part of the basic-info gate: a blank address is accepted and stored blank.
pub fn is_step_valid<A: ApplicationAnswers + ?Sized>(answers: &A, step: WizardStep) -> bool {
    match step {
        WizardStep::BasicInfo => {
            !answers.full_name().trim().is_empty()
                && !answers.usn().trim().is_empty()
                && answers.has_branch()
                && answers.has_year()
                && is_phone_valid(answers.phone())
        }
        WizardStep::Motivation => {
            answers.motivation().trim().encode_utf16().count() >= MIN_MOTIVATION_LEN
                && answers.vertical_count() >= 1
        }
        WizardStep::Interests => {
            answers.has_interest_area() || !answers.interest_other().trim().is_empty()
        }
        WizardStep::Background => answers.has_residence(),
        WizardStep::Confirm => answers.consent_gdpr() && answers.consent_terms(),
    }
}

/// Earliest step whose gate currently fails.
pub fn first_invalid_step<A: ApplicationAnswers + ?Sized>(answers: &A) -> Option<WizardStep> {
    WizardStep::ALL
        .into_iter()
        .find(|step| !is_step_valid(answers, *step))
}
