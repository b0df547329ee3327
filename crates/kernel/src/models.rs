use serde::{Deserialize, Serialize, Serializer};

/// Largest integer a JSON number carries exactly through a double.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A record of the remote books collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-assigned identifier, never edited locally
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Shelf category
    pub category: String,
    /// Year of publication
    pub published_year: i64,
    /// Copies currently available; never negative on the server
    pub available_copies: i64,
}

/// Request body for creating a new book.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category: String,
    pub published_year: Numeric,
    pub available_copies: Numeric,
}

/// Request body for `PUT {endpoint}/{id}/copies`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiesChange {
    pub change: i64,
}

/// A form value coerced to a number at submit time.
///
/// Text that does not read as a finite number becomes [`Numeric::NotANumber`],
/// which is still submitted (as JSON `null`) so the server can reject it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
    NotANumber,
}

impl Numeric {
    /// Coerce raw form text using browser `Number(text)` rules.
    ///
    /// Surrounding whitespace is ignored and blank text reads as zero.
    /// Decimal, exponent, and `0x`/`0o`/`0b` literals are accepted.
    pub fn coerce(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Int(0);
        }

        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::Int(value);
        }

        parse_radix_literal(trimmed)
            .or_else(|| parse_decimal(trimmed))
            .map_or(Self::NotANumber, Self::from_f64)
    }

    fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            Self::NotANumber
        } else if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            #[allow(clippy::cast_possible_truncation)]
            Self::Int(value as i64)
        } else {
            Self::Float(value)
        }
    }

    pub const fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(value),
            _ => None,
        }
    }

    pub const fn is_nan(self) -> bool {
        matches!(self, Self::NotANumber)
    }
}

impl Serialize for Numeric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::Int(value) => serializer.serialize_i64(value),
            Self::Float(value) => serializer.serialize_f64(value),
            Self::NotANumber => serializer.serialize_unit(),
        }
    }
}

fn parse_radix_literal(text: &str) -> Option<f64> {
    let (radix, digits) = match text.get(..2)? {
        "0x" | "0X" => (16, &text[2..]),
        "0o" | "0O" => (8, &text[2..]),
        "0b" | "0B" => (2, &text[2..]),
        _ => return None,
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    u64::from_str_radix(digits, radix).ok().map(|value| value as f64)
}

fn parse_decimal(text: &str) -> Option<f64> {
    // `f64::from_str` also takes "inf" and "nan", which are not numbers here.
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_reads_plain_integers() {
        assert_eq!(Numeric::coerce("1999"), Numeric::Int(1999));
        assert_eq!(Numeric::coerce(" 42 "), Numeric::Int(42));
        assert_eq!(Numeric::coerce("-3"), Numeric::Int(-3));
        assert_eq!(Numeric::coerce("+7"), Numeric::Int(7));
    }

    #[test]
    fn coerce_treats_blank_as_zero() {
        assert_eq!(Numeric::coerce(""), Numeric::Int(0));
        assert_eq!(Numeric::coerce("   "), Numeric::Int(0));
    }

    #[test]
    fn coerce_normalizes_whole_decimals() {
        assert_eq!(Numeric::coerce("2001.0"), Numeric::Int(2001));
        assert_eq!(Numeric::coerce("1e3"), Numeric::Int(1000));
        assert_eq!(Numeric::coerce("0x1A"), Numeric::Int(26));
        assert_eq!(Numeric::coerce("0b101"), Numeric::Int(5));
    }

    #[test]
    fn coerce_keeps_fractions() {
        assert_eq!(Numeric::coerce("12.5"), Numeric::Float(12.5));
        assert_eq!(Numeric::coerce(".5"), Numeric::Float(0.5));
    }

    #[test]
    fn coerce_marks_garbage_as_not_a_number() {
        for text in ["abc", "12abc", "inf", "Infinity", "NaN", "1e999", "0x", "-0x10", "."] {
            assert!(Numeric::coerce(text).is_nan(), "{text:?} should not be a number");
        }
    }

    #[test]
    fn new_book_serializes_camel_case_with_null_sentinel() {
        let book = NewBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            category: "Sci-Fi".to_string(),
            published_year: Numeric::coerce("abc"),
            available_copies: Numeric::coerce("3"),
        };

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Dune",
                "author": "Frank Herbert",
                "category": "Sci-Fi",
                "publishedYear": null,
                "availableCopies": 3
            })
        );
    }

    #[test]
    fn book_reads_document_store_identifier() {
        let book: Book = serde_json::from_value(json!({
            "_id": "65f1c0",
            "title": "Dune",
            "author": "Frank Herbert",
            "category": "Sci-Fi",
            "publishedYear": 1965,
            "availableCopies": 2,
            "__v": 0
        }))
        .unwrap();

        assert_eq!(book.id, "65f1c0");
        assert_eq!(book.published_year, 1965);
        assert_eq!(book.available_copies, 2);
    }

    #[test]
    fn book_accepts_plain_id_alias() {
        let book: Book = serde_json::from_value(json!({
            "id": "b-1",
            "title": "Emma",
            "author": "Jane Austen",
            "category": "Classic",
            "publishedYear": 1815,
            "availableCopies": 0
        }))
        .unwrap();

        assert_eq!(book.id, "b-1");
    }

    #[test]
    fn copies_change_body_shape() {
        let body = serde_json::to_value(CopiesChange { change: -1 }).unwrap();
        assert_eq!(body, json!({ "change": -1 }));
    }
}
