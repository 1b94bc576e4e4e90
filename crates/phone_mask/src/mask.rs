//! Pure phone-number masking: digit extraction, country-code correction,
//! `+7 (900) 123-45-67` rendering and caret arithmetic.
//!
//! All positions are character offsets into the value, never byte offsets.

/// Digits in a complete Russian number, country code included.
pub const MAX_DIGITS: usize = 11;

pub const VALIDATION_MESSAGE: &str = "Введите номер в формате +7 (900) 123-45-67.";

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn extract_digits(text: &str) -> String {
    text.chars().filter(|ch| is_digit(*ch)).collect()
}

/// Extracts digits and applies the leading-digit correction: `8…` becomes
/// `7…`, a bare mobile `9…` gets a `7` prepended. Never longer than
/// [`MAX_DIGITS`].
pub fn normalize_digits(text: &str) -> String {
    let mut digits = extract_digits(text);
    if digits.is_empty() {
        return digits;
    }

    digits.truncate(MAX_DIGITS);

    if digits.starts_with('8') {
        digits.replace_range(..1, "7");
    } else if digits.starts_with('9') {
        digits.insert(0, '7');
        digits.truncate(MAX_DIGITS);
    }

    digits
}

fn group(digits: &str, start: usize, end: usize) -> &str {
    let len = digits.len();
    &digits[start.min(len)..end.min(len)]
}

/// Renders the (normalized) digits of `text` as a partial or complete mask.
pub fn format_phone(text: &str) -> String {
    let digits = normalize_digits(text);
    if digits.is_empty() {
        return String::new();
    }

    let country = group(&digits, 0, 1);
    let area = group(&digits, 1, 4);
    let exchange = group(&digits, 4, 7);
    let line_a = group(&digits, 7, 9);
    let line_b = group(&digits, 9, 11);

    let mut formatted = format!("+{country}");
    if !area.is_empty() {
        formatted.push_str(" (");
        formatted.push_str(area);
    }
    if area.len() == 3 {
        formatted.push(')');
    }
    if !exchange.is_empty() {
        formatted.push(' ');
        formatted.push_str(exchange);
    }
    if !line_a.is_empty() {
        formatted.push('-');
        formatted.push_str(line_a);
    }
    if !line_b.is_empty() {
        formatted.push('-');
        formatted.push_str(line_b);
    }
    formatted
}

/// Checks the raw digits, without leading-digit correction: an `8…` value is
/// invalid until it has been reformatted.
pub fn is_valid_phone(text: &str) -> bool {
    let digits = extract_digits(text);
    digits.len() == MAX_DIGITS && digits.starts_with('7')
}

pub fn count_digits_before(text: &str, offset: usize) -> usize {
    text.chars().take(offset).filter(|ch| is_digit(*ch)).count()
}

/// Character offset right after the `digit_index`-th digit of `formatted`.
pub fn caret_for_digit_index(formatted: &str, digit_index: usize) -> usize {
    if digit_index == 0 {
        return 0;
    }

    let mut seen = 0;
    for (position, ch) in formatted.chars().enumerate() {
        if !is_digit(ch) {
            continue;
        }
        seen += 1;
        if seen >= digit_index {
            return position + 1;
        }
    }

    formatted.chars().count()
}

/// Nearest digit strictly before `before`.
pub fn previous_digit_position(text: &str, before: usize) -> Option<usize> {
    text.chars()
        .take(before)
        .enumerate()
        .filter(|(_, ch)| is_digit(*ch))
        .map(|(position, _)| position)
        .last()
}

/// Nearest digit at or after `from`.
pub fn next_digit_position(text: &str, from: usize) -> Option<usize> {
    text.chars()
        .enumerate()
        .skip(from)
        .find(|(_, ch)| is_digit(*ch))
        .map(|(position, _)| position)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masked {
    pub text: String,
    pub caret: usize,
}

/// Reformats `raw` and places the caret after the same digit ordinal.
pub fn remask(raw: &str, digit_index: usize) -> Masked {
    let text = format_phone(raw);
    let digit_index = digit_index.min(extract_digits(&text).len());
    let caret = caret_for_digit_index(&text, digit_index);
    Masked { text, caret }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionKey {
    Backspace,
    Delete,
}

/// A deletion that skips mask punctuation and removes a real digit instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub raw: String,
    pub digit_index: usize,
}

impl Deletion {
    pub fn masked(&self) -> Masked {
        remask(&self.raw, self.digit_index)
    }
}

fn remove_char_at(text: &str, position: usize) -> String {
    text.chars()
        .enumerate()
        .filter(|(index, _)| *index != position)
        .map(|(_, ch)| ch)
        .collect()
}

/// Decides whether a Backspace/Delete press next to a mask character must be
/// redirected to the nearest digit. `None` leaves the default editing alone.
pub fn plan_deletion(value: &str, selection: Selection, key: DeletionKey) -> Option<Deletion> {
    if !selection.is_collapsed() || value.is_empty() {
        return None;
    }

    let caret = selection.start;
    let len = value.chars().count();

    match key {
        DeletionKey::Backspace => {
            if caret == 0 || caret > len {
                return None;
            }
            let before = value.chars().nth(caret - 1)?;
            if is_digit(before) {
                return None;
            }
            let remove_at = previous_digit_position(value, caret - 1)?;
            let raw = remove_char_at(value, remove_at);
            let digit_index = count_digits_before(&raw, remove_at);
            Some(Deletion { raw, digit_index })
        }
        DeletionKey::Delete => {
            if caret >= len {
                return None;
            }
            let at = value.chars().nth(caret)?;
            if is_digit(at) {
                return None;
            }
            let remove_at = next_digit_position(value, caret + 1)?;
            let raw = remove_char_at(value, remove_at);
            let digit_index = count_digits_before(value, caret);
            Some(Deletion { raw, digit_index })
        }
    }
}
