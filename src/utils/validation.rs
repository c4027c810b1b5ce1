use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use crate::core::library::{BookCategory, MemberType};
use crate::utils::date::current_year;

pub const MIN_PUBLICATION_YEAR: i32 = 1450;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").expect("email regex");
    static ref ISBN_RE: Regex = Regex::new(r"^(\d{10}|\d{13})$").expect("isbn regex");
    static ref PHONE_RE: Regex = Regex::new(r"^0\d{9}$").expect("phone regex");
    static ref ZIP_CODE_RE: Regex = Regex::new(r"^\d{5}$").expect("zip code regex");
    static ref SEPARATORS_RE: Regex = Regex::new(r"[\s.\-]").expect("separators regex");
}

pub fn is_valid_email(email: Option<&str>) -> bool {
    email.map(|e| EMAIL_RE.is_match(e.trim())).unwrap_or(false)
}

// strips the dashes and spaces an ISBN may be written with
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.trim().replace(['-', ' '], "")
}

// ISBN-10 or ISBN-13, dashes and spaces allowed between digits
pub fn is_valid_isbn(isbn: Option<&str>) -> bool {
    match isbn {
        Some(isbn) => {
            ISBN_RE.is_match(normalize_isbn(isbn).as_str())
        }
        None => false,
    }
}

pub fn is_valid_phone(phone: Option<&str>) -> bool {
    match phone {
        Some(phone) => {
            let digits = SEPARATORS_RE.replace_all(phone, "");
            PHONE_RE.is_match(digits.as_ref())
        }
        None => false,
    }
}

pub fn is_valid_zip_code(zip_code: Option<&str>) -> bool {
    zip_code.map(|z| ZIP_CODE_RE.is_match(z)).unwrap_or(false)
}

pub fn is_not_empty(text: Option<&str>) -> bool {
    text.map(|t| !t.trim().is_empty()).unwrap_or(false)
}

pub fn is_positive(value: i64) -> bool {
    value > 0
}

pub fn is_in_range(value: i64, min: i64, max: i64) -> bool {
    value >= min && value <= max
}

pub fn is_valid_publication_year(year: i32) -> bool {
    (MIN_PUBLICATION_YEAR..=current_year()).contains(&year)
}

pub fn is_valid_member_type(kind: Option<&str>) -> bool {
    kind.map(|k| MemberType::from_str(k).is_ok()).unwrap_or(false)
}

pub fn is_valid_book_category(category: Option<&str>) -> bool {
    category.map(|c| BookCategory::from_str(c).is_ok()).unwrap_or(false)
}

pub fn email_error_message() -> &'static str {
    "email address is not valid"
}

pub fn isbn_error_message() -> &'static str {
    "ISBN must contain 10 or 13 digits"
}

pub fn phone_error_message() -> &'static str {
    "phone number must contain 10 digits starting with 0"
}

pub fn zip_code_error_message() -> &'static str {
    "postal code must contain 5 digits"
}

pub fn year_error_message() -> &'static str {
    "publication year must be between 1450 and the current year"
}

pub fn copies_error_message() -> &'static str {
    "number of copies must be positive"
}

pub fn member_type_error_message() -> &'static str {
    "member type must be one of STUDENT, TEACHER, STAFF, EXTERNAL"
}

pub fn category_error_message() -> &'static str {
    "category must be one of NOVEL, SCIENCE, TECHNICAL, HISTORY, YOUTH, COMICS, OTHER"
}

pub fn required_field_message(field: &str) -> String {
    format!("field '{}' is required", field)
}

#[cfg(test)]
mod tests {
    use crate::utils::date::current_year;
    use crate::utils::validation::*;

    #[tokio::test]
    async fn test_should_validate_emails() {
        for email in ["test@example.com", "user.name+tag@domain.co.uk", "user@sub.domain.com"] {
            assert!(is_valid_email(Some(email)), "{}", email);
        }
        for email in ["", "plainaddress", "@missingusername.com", "username@.com.my", "username@domain", "username@domain."] {
            assert!(!is_valid_email(Some(email)), "{}", email);
        }
        assert!(!is_valid_email(None));
    }

    #[tokio::test]
    async fn test_should_validate_isbns() {
        for isbn in ["0-12345678-9", "1234567890", "978-0-123456-47-2", "9781234567890"] {
            assert!(is_valid_isbn(Some(isbn)), "{}", isbn);
        }
        for isbn in ["", "123456789", "12345678901", "abcdefghij", "123-456"] {
            assert!(!is_valid_isbn(Some(isbn)), "{}", isbn);
        }
        assert!(!is_valid_isbn(None));
        assert_eq!("9780132350884", normalize_isbn(" 978-0-13 235088-4"));
    }

    #[tokio::test]
    async fn test_should_validate_phones() {
        for phone in ["0123456789", "06.12.34.56.78", "01 23 45 67 89", "09-87-65-43-21"] {
            assert!(is_valid_phone(Some(phone)), "{}", phone);
        }
        for phone in ["", "012345678", "01234567890", "abcdefghij"] {
            assert!(!is_valid_phone(Some(phone)), "{}", phone);
        }
        assert!(!is_valid_phone(None));
    }

    #[tokio::test]
    async fn test_should_validate_zip_codes() {
        for zip in ["75001", "13000", "01000", "99999"] {
            assert!(is_valid_zip_code(Some(zip)), "{}", zip);
        }
        for zip in ["", "7500", "750010", "abcde", "12A45"] {
            assert!(!is_valid_zip_code(Some(zip)), "{}", zip);
        }
    }

    #[tokio::test]
    async fn test_should_check_strings_and_numbers() {
        assert!(is_not_empty(Some("hello")));
        for text in ["", "   ", "\t", "\n"] {
            assert!(!is_not_empty(Some(text)));
        }
        assert!(!is_not_empty(None));
        assert!(is_positive(1));
        assert!(!is_positive(0));
        assert!(!is_positive(-100));
        assert!(is_in_range(1, 1, 10));
        assert!(is_in_range(10, 1, 10));
        assert!(!is_in_range(11, 1, 10));
    }

    #[tokio::test]
    async fn test_should_validate_publication_years() {
        assert!(is_valid_publication_year(2000));
        assert!(is_valid_publication_year(1450));
        assert!(is_valid_publication_year(current_year()));
        assert!(!is_valid_publication_year(1449));
        assert!(!is_valid_publication_year(current_year() + 1));
    }

    #[tokio::test]
    async fn test_should_validate_enumerations() {
        for kind in ["STUDENT", "TEACHER", "STAFF", "EXTERNAL"] {
            assert!(is_valid_member_type(Some(kind)));
        }
        assert!(!is_valid_member_type(Some("ALIEN")));
        assert!(!is_valid_member_type(None));
        for category in ["NOVEL", "SCIENCE", "TECHNICAL", "HISTORY", "YOUTH", "COMICS", "OTHER"] {
            assert!(is_valid_book_category(Some(category)));
        }
        assert!(!is_valid_book_category(Some("COOKING")));
        assert!(!is_valid_book_category(None));
    }

    #[tokio::test]
    async fn test_should_return_error_messages() {
        assert_eq!("email address is not valid", email_error_message());
        assert_eq!("ISBN must contain 10 or 13 digits", isbn_error_message());
        assert_eq!("field 'Name' is required", required_field_message("Name"));
    }
}
