//! Translation of filter values into the source's query codes.
//!
//! Each dimension has a fixed lookup table. The unconstrained variant maps
//! to `None`, which means the query parameter is omitted.

use jobscout_core::{
    DatePosted, ExperienceLevel, FilterDimension, JobType, RemoteMode, SalaryFloor, SortOrder,
};

/// A filter dimension the listing source understands.
pub trait QueryCode: FilterDimension {
    /// Query parameter carrying this dimension.
    const PARAM: &'static str;

    /// Source code for this value, `None` when unconstrained.
    fn code(self) -> Option<&'static str>;
}

impl QueryCode for DatePosted {
    const PARAM: &'static str = "f_TPR";

    fn code(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Past24Hours => Some("r86400"),
            Self::PastWeek => Some("r604800"),
            Self::PastMonth => Some("r2592000"),
        }
    }
}

impl QueryCode for SalaryFloor {
    const PARAM: &'static str = "f_SB2";

    fn code(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Usd40k => Some("1"),
            Self::Usd60k => Some("2"),
            Self::Usd80k => Some("3"),
            Self::Usd100k => Some("4"),
            Self::Usd120k => Some("5"),
        }
    }
}

impl QueryCode for ExperienceLevel {
    const PARAM: &'static str = "f_E";

    fn code(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Internship => Some("1"),
            Self::EntryLevel => Some("2"),
            Self::Associate => Some("3"),
            Self::Senior => Some("4"),
            Self::Director => Some("5"),
            Self::Executive => Some("6"),
        }
    }
}

impl QueryCode for RemoteMode {
    const PARAM: &'static str = "f_WT";

    fn code(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::OnSite => Some("1"),
            Self::Remote => Some("2"),
            Self::Hybrid => Some("3"),
        }
    }
}

impl QueryCode for JobType {
    const PARAM: &'static str = "f_JT";

    fn code(self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::FullTime => Some("F"),
            Self::PartTime => Some("P"),
            Self::Contract => Some("C"),
            Self::Temporary => Some("T"),
            Self::Internship => Some("I"),
            Self::Volunteer => Some("V"),
        }
    }
}

impl QueryCode for SortOrder {
    const PARAM: &'static str = "sortBy";

    fn code(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Relevant => Some("R"),
            Self::Recent => Some("DD"),
        }
    }
}

/// Translate a human-readable label straight to a source code.
///
/// Empty and unrecognized labels yield `None`.
pub fn translate<T: QueryCode>(label: &str) -> Option<&'static str> {
    T::from_label(label).code()
}

/// The `(param, code)` pair for a value, if it constrains the search.
pub fn query_pair<T: QueryCode>(value: T) -> Option<(&'static str, &'static str)> {
    value.code().map(|code| (T::PARAM, code))
}
