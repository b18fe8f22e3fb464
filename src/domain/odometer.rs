// Odometer formatter - zero-padded digit cells with an accent region

/// Number of trailing cells the odometer keeps for the fraction: the decimal
/// point plus at least two digits.
const MIN_FRACTION_CELLS: usize = 2;

/// A formatted odometer value, one character per display cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdometerReading {
    cells: Vec<char>,
    accent_start: usize,
}

impl OdometerReading {
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of the first accent cell; equals `len()` when there is none.
    pub fn accent_start(&self) -> usize {
        self.accent_start
    }

    pub fn is_accent(&self, index: usize) -> bool {
        index >= self.accent_start && index < self.cells.len()
    }

    pub fn accent(&self) -> &[char] {
        &self.cells[self.accent_start..]
    }

    pub fn as_string(&self) -> String {
        self.cells.iter().collect()
    }
}

/// Format `value` as a zero-padded odometer reading.
///
/// `digit_count` is the width of the classic display, which shows the
/// integer part followed by the decimal point and two fraction cells
/// (`format(236.9, 8, 2)` is `00236.90`). The integer part is padded to
/// `digit_count - 1 - max(fraction_digits, 2)` digits, so fewer fraction
/// digits shorten the reading rather than growing the integer part
/// (`format(236.9, 8, 1)` is `00236.9`). With no fraction digits there is
/// no decimal point and the integer part fills every cell.
///
/// Values too large for the integer width widen the reading; magnitude is
/// never dropped. Negative and non-finite values read as zero.
pub fn format(value: f64, digit_count: usize, fraction_digits: usize) -> OdometerReading {
    let value = if value.is_finite() { value.max(0.0) } else { 0.0 };

    let rendered = std::format!("{:.*}", fraction_digits, value);
    let (whole, fraction) = match rendered.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let reserved = if fraction_digits == 0 {
        0
    } else {
        1 + fraction_digits.max(MIN_FRACTION_CELLS)
    };
    let whole_width = digit_count.saturating_sub(reserved).max(1);

    let mut cells: Vec<char> = Vec::with_capacity(whole_width + fraction_digits + 1);
    cells.extend(std::iter::repeat_n('0', whole_width.saturating_sub(whole.len())));
    cells.extend(whole.chars());

    let accent_start = cells.len();
    if let Some(fraction) = fraction {
        cells.push('.');
        cells.extend(fraction.chars());
    }

    OdometerReading {
        cells,
        accent_start,
    }
}
