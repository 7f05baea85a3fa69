use std::collections::BTreeSet;

use super::catalog::{Branch, InterestArea, Residence, Vertical, YearOfStudy};
use super::steps::is_phone_valid;

/// In-progress answers collected by the wizard before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub full_name: String,
    pub email: String,
    pub usn: String,
    pub branch: Option<Branch>,
    pub year: Option<YearOfStudy>,
    pub phone: String,
    pub motivation: String,
    pub verticals: BTreeSet<Vertical>,
    pub interest_areas: BTreeSet<InterestArea>,
    pub interest_other: String,
    pub residence: Option<Residence>,
    pub experience: String,
    /// Recorded for display only; it is never sent with the submission.
    pub resume: Option<ResumeAttachment>,
    pub links: String,
    pub consent_gdpr: bool,
    pub consent_terms: bool,
}

/// File picked in the background step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeAttachment {
    pub file_name: String,
    pub size_bytes: u64,
}

/// Single-field edit routed through the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    FullName(String),
    Email(String),
    Usn(String),
    Branch(Option<Branch>),
    Year(Option<YearOfStudy>),
    Phone(String),
    Motivation(String),
    InterestOther(String),
    Residence(Option<Residence>),
    Experience(String),
    Resume(Option<ResumeAttachment>),
    Links(String),
    ConsentGdpr(bool),
    ConsentTerms(bool),
}

/// Member of one of the set-valued fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMember {
    Vertical(Vertical),
    InterestArea(InterestArea),
}

impl ApplicationDraft {
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::FullName(value) => self.full_name = value,
            FieldUpdate::Email(value) => self.email = value,
            FieldUpdate::Usn(value) => self.usn = value,
            FieldUpdate::Branch(value) => self.branch = value,
            FieldUpdate::Year(value) => self.year = value,
            FieldUpdate::Phone(value) => self.phone = value,
            FieldUpdate::Motivation(value) => self.motivation = value,
            FieldUpdate::InterestOther(value) => self.interest_other = value,
            FieldUpdate::Residence(value) => self.residence = value,
            FieldUpdate::Experience(value) => self.experience = value,
            FieldUpdate::Resume(value) => self.resume = value,
            FieldUpdate::Links(value) => self.links = value,
            FieldUpdate::ConsentGdpr(value) => self.consent_gdpr = value,
            FieldUpdate::ConsentTerms(value) => self.consent_terms = value,
        }
    }

    /// Adds the member when absent and removes it when present.
    ///
    /// Returns whether the member is selected afterwards.
    pub fn toggle(&mut self, member: SetMember) -> bool {
        match member {
            SetMember::Vertical(vertical) => toggle_in(&mut self.verticals, vertical),
            SetMember::InterestArea(area) => toggle_in(&mut self.interest_areas, area),
        }
    }

    pub fn phone_digits(&self) -> usize {
        phone_digit_count(&self.phone)
    }

    pub fn is_phone_valid(&self) -> bool {
        is_phone_valid(&self.phone)
    }

    /// Selected interest labels in catalog order, followed by the free-text answer.
    pub fn interest_areas_for_submission(&self) -> Vec<String> {
        let mut areas: Vec<String> = self
            .interest_areas
            .iter()
            .map(|area| area.label().to_string())
            .collect();
        merge_free_text(&mut areas, &self.interest_other);
        areas
    }
}

fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

/// Appends trimmed free text unless it is blank or already listed.
pub(crate) fn merge_free_text(areas: &mut Vec<String>, other: &str) {
    let other = other.trim();
    if !other.is_empty() && !areas.iter().any(|area| area == other) {
        areas.push(other.to_string());
    }
}

/// Counts ASCII digits, ignoring spaces, `+`, dashes and any other decoration.
pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}
