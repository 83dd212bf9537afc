use serde::Deserialize;

/// Body of `POST /request-book`.
///
/// Fields default to empty so a missing field is reported by validation
/// rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookRequest {
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// ISBN-13 as accepted here: exactly 13 ASCII digits, no separators.
pub fn is_valid_isbn(isbn: &str) -> bool {
    isbn.len() == 13 && isbn.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("9780441013593", true)]
    #[case("0000000000000", true)]
    #[case("978044101359", false)]
    #[case("97804410135930", false)]
    #[case("978-0441013593", false)]
    #[case("978044101359X", false)]
    #[case(" 9780441013593", false)]
    #[case("٩٧٨٠٤٤١٠١٣٥٩٣", false)]
    #[case("", false)]
    fn validates_isbn(#[case] isbn: &str, #[case] valid: bool) {
        assert_eq!(is_valid_isbn(isbn), valid);
    }
}
