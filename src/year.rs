/// Parses free-text year input. Blank or non-numeric text yields `None`;
/// any integer, including zero and negatives, is accepted as-is.
pub fn parse_year(raw: Option<&str>) -> Option<i32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}
