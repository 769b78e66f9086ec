// Messages exchanged between the TUI, the app event loop, and spawned
// prediction tasks.

use homeval_core::store::{LocationZone, Predictor, ValuationError, ValuationSnapshot};

/// Commands sent from the TUI to the app event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    SetBedrooms(u8),
    SetBathrooms(u8),
    SetSize(String),
    SetYearBuilt(String),
    SetLocation(Option<LocationZone>),
    SetPredictor(Predictor),
    Submit,
    Quit,
}

/// Updates pushed from the app event loop to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Full copy of the store after a change.
    Snapshot(Box<ValuationSnapshot>),
}

/// Outcome of a spawned prediction request, tagged with the submission
/// token it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionEvent {
    pub generation: u64,
    pub outcome: Result<f64, ValuationError>,
}

/// Form fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormField {
    #[default]
    Bedrooms,
    Bathrooms,
    Size,
    YearBuilt,
    Location,
    Predictor,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Bedrooms,
        FormField::Bathrooms,
        FormField::Size,
        FormField::YearBuilt,
        FormField::Location,
        FormField::Predictor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Bedrooms => "Bedrooms",
            FormField::Bathrooms => "Bathrooms",
            FormField::Size => "Property Size (sqft)",
            FormField::YearBuilt => "Year Built",
            FormField::Location => "Location",
            FormField::Predictor => "Predictor",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next field, wrapping to the first.
    pub fn next(self) -> FormField {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous field, wrapping to the last.
    pub fn prev(self) -> FormField {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Whether the field takes typed text rather than a choice.
    pub fn is_text(self) -> bool {
        matches!(self, FormField::Size | FormField::YearBuilt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_wraps_both_ways() {
        assert_eq!(FormField::Bedrooms.next(), FormField::Bathrooms);
        assert_eq!(FormField::Predictor.next(), FormField::Bedrooms);
        assert_eq!(FormField::Bedrooms.prev(), FormField::Predictor);
        assert_eq!(FormField::Location.prev(), FormField::YearBuilt);
    }

    #[test]
    fn only_size_and_year_are_text() {
        let text: Vec<_> = FormField::ALL.into_iter().filter(|f| f.is_text()).collect();
        assert_eq!(text, vec![FormField::Size, FormField::YearBuilt]);
    }
}
