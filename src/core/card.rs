pub const CARD_NUMBER_WIDTH: usize = 16;

/// Formats a card number as four hyphen-separated groups.
///
/// Shorter inputs are left-padded with `'0'` to 16 characters. Nothing is
/// validated: the input is treated as plain characters, and anything beyond
/// the 16th character stays in the last group.
pub fn format_card_number(raw: &str) -> String {
    let padding = CARD_NUMBER_WIDTH.saturating_sub(raw.chars().count());
    let padded: Vec<char> = std::iter::repeat('0').take(padding).chain(raw.chars()).collect();

    let group = |from: usize, to: usize| padded[from..to].iter().collect::<String>();
    format!(
        "{}-{}-{}-{}",
        group(0, 4),
        group(4, 8),
        group(8, 12),
        group(12, padded.len())
    )
}
