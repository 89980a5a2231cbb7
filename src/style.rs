/// How an amount cell is emphasized in the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Refund,
    ZeroAmount,
}

impl Highlight {
    /// Classified from the number itself; the display string is never inspected.
    /// Refund is checked before zero.
    pub fn for_amount(amount: f64) -> Self {
        if amount < 0.0 {
            Self::Refund
        } else if amount == 0.0 {
            Self::ZeroAmount
        } else {
            Self::Normal
        }
    }

    /// RGB text color used by the PDF backend.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Normal => (0, 0, 0),
            Self::Refund => (220, 38, 38),
            Self::ZeroAmount => (107, 114, 128),
        }
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Self::ZeroAmount)
    }
}
