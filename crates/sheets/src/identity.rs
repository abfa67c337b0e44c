const INVISIBLE: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];
const TRUTHY: [&str; 6] = ["true", "1", "yes", "y", "ok", "allow"];

// Spreadsheet copy-paste tends to carry zero-width characters into email cells.
pub fn normalize_identity(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !INVISIBLE.contains(ch))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

pub fn is_truthy(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    TRUTHY.contains(&lowered.as_str())
}
