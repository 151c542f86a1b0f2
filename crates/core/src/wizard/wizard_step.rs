use serde::Serialize;

/// Number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 5;

/// A position in the wizard. Serialized as its 1-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub enum WizardStep {
    AccountType = 1,
    PersonalInfo = 2,
    Address = 3,
    Education = 4,
    Review = 5,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(WizardStep::AccountType),
            2 => Some(WizardStep::PersonalInfo),
            3 => Some(WizardStep::Address),
            4 => Some(WizardStep::Education),
            5 => Some(WizardStep::Review),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::AccountType => "Choose Account",
            WizardStep::PersonalInfo => "Personal Information",
            WizardStep::Address => "Address",
            WizardStep::Education => "Education & Employment",
            WizardStep::Review => "Review & Submit",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn is_final(self) -> bool {
        self == WizardStep::Review
    }

    /// Completion of the flow when this step is shown, in whole percent.
    pub fn progress_percent(self) -> u8 {
        (u16::from(self.number()) * 100 / u16::from(TOTAL_STEPS)) as u8
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_linear() {
        assert_eq!(WizardStep::AccountType.previous(), None);
        assert_eq!(WizardStep::Review.next(), None);

        let mut step = WizardStep::AccountType;
        let mut visited = vec![step.number()];
        while let Some(next) = step.next() {
            assert_eq!(next.previous(), Some(step));
            step = next;
            visited.push(step.number());
        }
        assert_eq!(visited, vec![1, 2, 3, 4, 5]);
        assert!(step.is_final());
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(WizardStep::AccountType.progress_percent(), 20);
        assert_eq!(WizardStep::Education.progress_percent(), 80);
        assert_eq!(WizardStep::Review.progress_percent(), 100);
    }

    #[test]
    fn test_from_number_rejects_out_of_range() {
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(6), None);
        assert_eq!(serde_json::to_string(&WizardStep::Address).unwrap(), "3");
    }
}
