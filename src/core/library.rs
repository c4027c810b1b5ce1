use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::utils::validation;

// RuleViolation names every business rule the circulation engine can refuse on.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum RuleViolation {
    MemberNotFound,
    BookNotFound,
    MemberInactive,
    MembershipExpired,
    PenaltiesTooHigh,
    TooManyLateReturns,
    BookUnavailable,
    AlreadyBorrowed,
    ReservedByOther,
    NoCopiesAvailable,
    QuotaExceeded,
    LoanNotFound,
    AlreadyReturned,
    MaxRenewalsReached,
    DuplicateReservation,
    ReservationNotFound,
    ReservationClosed,
    ActiveLoansExist,
}

impl RuleViolation {
    pub fn code(&self) -> &'static str {
        match self {
            RuleViolation::MemberNotFound => "MEMBER_NOT_FOUND",
            RuleViolation::BookNotFound => "BOOK_NOT_FOUND",
            RuleViolation::MemberInactive => "MEMBER_INACTIVE",
            RuleViolation::MembershipExpired => "MEMBERSHIP_EXPIRED",
            RuleViolation::PenaltiesTooHigh => "PENALTIES_TOO_HIGH",
            RuleViolation::TooManyLateReturns => "TOO_MANY_LATE_RETURNS",
            RuleViolation::BookUnavailable => "BOOK_UNAVAILABLE",
            RuleViolation::AlreadyBorrowed => "ALREADY_BORROWED",
            RuleViolation::ReservedByOther => "RESERVED_BY_OTHER",
            RuleViolation::NoCopiesAvailable => "NO_COPIES_AVAILABLE",
            RuleViolation::QuotaExceeded => "QUOTA_EXCEEDED",
            RuleViolation::LoanNotFound => "LOAN_NOT_FOUND",
            RuleViolation::AlreadyReturned => "ALREADY_RETURNED",
            RuleViolation::MaxRenewalsReached => "MAX_RENEWALS_REACHED",
            RuleViolation::DuplicateReservation => "DUPLICATE_RESERVATION",
            RuleViolation::ReservationNotFound => "RESERVATION_NOT_FOUND",
            RuleViolation::ReservationClosed => "RESERVATION_CLOSED",
            RuleViolation::ActiveLoansExist => "ACTIVE_LOANS_EXIST",
        }
    }
}

impl Display for RuleViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LibraryError {
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    #[error("conflict: {message}")]
    Conflict {
        message: String,
    },
    #[error("not found: {message}")]
    NotFound {
        message: String,
    },
    // Business rule refusals. None of these are recovered by the engine itself.
    #[error("{rule}: {message}")]
    Rule {
        rule: RuleViolation,
        message: String,
    },
    #[error("serialization failed: {message}")]
    Serialization {
        message: String,
    },
    #[error("runtime error: {message} {reason_code:?}")]
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn conflict(message: &str) -> LibraryError {
        LibraryError::Conflict { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn rule(rule: RuleViolation, message: &str) -> LibraryError {
        LibraryError::Rule { rule, message: message.to_string() }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    // violation returns the business rule behind this error, if any
    pub fn violation(&self) -> Option<RuleViolation> {
        match self {
            LibraryError::Rule { rule, .. } => Some(*rule),
            _ => None,
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Rule { rule, .. } => {
                matches!(rule, RuleViolation::NoCopiesAvailable | RuleViolation::ReservedByOther)
            }
            LibraryError::Validation { .. } => { false }
            LibraryError::Conflict { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json {:?}", err).as_str())
    }
}

impl From<config::ConfigError> for LibraryError {
    fn from(err: config::ConfigError) -> Self {
        LibraryError::validation(
            format!("invalid configuration {}", err).as_str(), Some("CONFIG".to_string()))
    }
}

/// A specialized Result type for the library services.
pub type LibraryResult<T> = Result<T, LibraryError>;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum MemberType {
    Student,
    Teacher,
    Staff,
    External,
}

impl MemberType {
    pub const ALL: [MemberType; 4] = [
        MemberType::Student,
        MemberType::Teacher,
        MemberType::Staff,
        MemberType::External,
    ];
}

impl FromStr for MemberType {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STUDENT" => Ok(MemberType::Student),
            "TEACHER" => Ok(MemberType::Teacher),
            "STAFF" => Ok(MemberType::Staff),
            "EXTERNAL" => Ok(MemberType::External),
            _ => Err(LibraryError::validation(
                validation::member_type_error_message(), Some("INVALID_MEMBER_TYPE".to_string()))),
        }
    }
}

impl Display for MemberType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            MemberType::Student => write!(f, "STUDENT"),
            MemberType::Teacher => write!(f, "TEACHER"),
            MemberType::Staff => write!(f, "STAFF"),
            MemberType::External => write!(f, "EXTERNAL"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum BookCategory {
    Novel,
    Science,
    Technical,
    History,
    Youth,
    Comics,
    Other,
}

impl BookCategory {
    pub const ALL: [BookCategory; 7] = [
        BookCategory::Novel,
        BookCategory::Science,
        BookCategory::Technical,
        BookCategory::History,
        BookCategory::Youth,
        BookCategory::Comics,
        BookCategory::Other,
    ];
}

impl FromStr for BookCategory {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NOVEL" => Ok(BookCategory::Novel),
            "SCIENCE" => Ok(BookCategory::Science),
            "TECHNICAL" => Ok(BookCategory::Technical),
            "HISTORY" => Ok(BookCategory::History),
            "YOUTH" => Ok(BookCategory::Youth),
            "COMICS" => Ok(BookCategory::Comics),
            "OTHER" => Ok(BookCategory::Other),
            _ => Err(LibraryError::validation(
                validation::category_error_message(), Some("INVALID_CATEGORY".to_string()))),
        }
    }
}

impl Display for BookCategory {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BookCategory::Novel => write!(f, "NOVEL"),
            BookCategory::Science => write!(f, "SCIENCE"),
            BookCategory::Technical => write!(f, "TECHNICAL"),
            BookCategory::History => write!(f, "HISTORY"),
            BookCategory::Youth => write!(f, "YOUTH"),
            BookCategory::Comics => write!(f, "COMICS"),
            BookCategory::Other => write!(f, "OTHER"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum LoanStatus {
    Active,
    Overdue,
    Returned,
}

impl LoanStatus {
    // open loans count against quota and block a second loan of the same book
    pub fn is_open(&self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::Overdue)
    }
}

impl From<String> for LoanStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ACTIVE" => LoanStatus::Active,
            "OVERDUE" => LoanStatus::Overdue,
            "RETURNED" => LoanStatus::Returned,
            _ => LoanStatus::Active,
        }
    }
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoanStatus::Active => write!(f, "ACTIVE"),
            LoanStatus::Overdue => write!(f, "OVERDUE"),
            LoanStatus::Returned => write!(f, "RETURNED"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum ReservationStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

impl From<String> for ReservationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => ReservationStatus::Pending,
            "FULFILLED" => ReservationStatus::Fulfilled,
            "CANCELLED" => ReservationStatus::Cancelled,
            _ => ReservationStatus::Pending,
        }
    }
}

impl Display for ReservationStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "PENDING"),
            ReservationStatus::Fulfilled => write!(f, "FULFILLED"),
            ReservationStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
