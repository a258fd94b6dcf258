//! Wizard steps.

use std::fmt;

/// The four steps every inspection form walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Metadata = 1,
    Location = 2,
    Checklist = 3,
    Photos = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Metadata,
        WizardStep::Location,
        WizardStep::Checklist,
        WizardStep::Photos,
    ];

    pub const TOTAL: usize = 4;

    pub fn number(self) -> usize {
        self as usize
    }

    pub fn from_number(number: usize) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)?).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn is_last(self) -> bool {
        self == WizardStep::Photos
    }

    /// Short name used in prompt keys and errors.
    pub fn name(self) -> &'static str {
        match self {
            WizardStep::Metadata => "metadata",
            WizardStep::Location => "location",
            WizardStep::Checklist => "checklist",
            WizardStep::Photos => "photos",
        }
    }

    /// Bilingual title.
    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Metadata => "Basic Information / मूलभूत माहिती",
            WizardStep::Location => "Location / स्थान",
            WizardStep::Checklist => "Inspection Checklist / तपासणी सूची",
            WizardStep::Photos => "Photos / छायाचित्रे",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_numbered_from_one() {
        assert_eq!(WizardStep::Metadata.number(), 1);
        assert_eq!(WizardStep::Photos.number(), WizardStep::TOTAL);
        assert_eq!(WizardStep::from_number(3), Some(WizardStep::Checklist));
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(5), None);
    }

    #[test]
    fn neighbours_stop_at_the_ends() {
        assert_eq!(WizardStep::Metadata.previous(), None);
        assert_eq!(WizardStep::Photos.next(), None);
        assert_eq!(WizardStep::Location.next(), Some(WizardStep::Checklist));
        assert_eq!(WizardStep::Location.previous(), Some(WizardStep::Metadata));
    }

    #[test]
    fn display_includes_name() {
        assert_eq!(WizardStep::Checklist.to_string(), "3 (checklist)");
    }
}
