// ── Typed filter sets ──
//
// One struct per domain. `None` means unset and is never sent; blank
// strings are normalized to `None` when applied. Sort column and order
// live here because the server sorts.

use chrono::NaiveDate;
use hot22_api::{GroupBy, QueryParams};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Server-side sort; both halves unset means "server default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub by: Option<String>,
    pub order: Option<SortOrder>,
}

impl Sort {
    fn params(&self, params: QueryParams) -> QueryParams {
        params
            .text("sortBy", self.by.as_deref())
            .value("sortOrder", self.order)
    }
}

/// A paginated filter set.
pub trait Filters: Clone + Default + Send + Sync + 'static {
    /// One edit to a non-paging field.
    type Change: std::fmt::Debug + Clone + Send + Sync + 'static;

    fn page(&self) -> u32;
    fn set_page(&mut self, page: u32);
    fn limit(&self) -> u32;
    fn set_limit(&mut self, limit: u32);

    fn apply(&mut self, change: Self::Change);

    /// Wire parameters with every unset field omitted.
    fn to_params(&self) -> QueryParams;
}

/// Blank means unset.
pub fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn paging(page: u32, limit: u32) -> QueryParams {
    QueryParams::new()
        .value("page", Some(page))
        .value("limit", Some(limit))
}

macro_rules! paged_filters {
    () => {
        fn page(&self) -> u32 {
            self.page
        }

        fn set_page(&mut self, page: u32) {
            self.page = page;
        }

        fn limit(&self) -> u32 {
            self.limit
        }

        fn set_limit(&mut self, limit: u32) {
            self.limit = limit;
        }
    };
}

// ── Offices ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeFilters {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub status: Option<String>,
    pub sort: Sort,
}

impl Default for OfficeFilters {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            city: None,
            country: None,
            status: None,
            sort: Sort::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfficeFilter {
    Search(Option<String>),
    City(Option<String>),
    Country(Option<String>),
    Status(Option<String>),
    Sort(Sort),
}

impl Filters for OfficeFilters {
    type Change = OfficeFilter;

    paged_filters!();

    fn apply(&mut self, change: OfficeFilter) {
        match change {
            OfficeFilter::Search(v) => self.search = normalize(v),
            OfficeFilter::City(v) => self.city = normalize(v),
            OfficeFilter::Country(v) => self.country = normalize(v),
            OfficeFilter::Status(v) => self.status = normalize(v),
            OfficeFilter::Sort(sort) => self.sort = sort,
        }
    }

    fn to_params(&self) -> QueryParams {
        let params = paging(self.page, self.limit)
            .text("search", self.search.as_deref())
            .text("city", self.city.as_deref())
            .text("country", self.country.as_deref())
            .text("status", self.status.as_deref());
        self.sort.params(params)
    }
}

// ── Passengers ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerFilters {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub agent_code: Option<String>,
    pub ticket_number: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort: Sort,
}

impl Default for PassengerFilters {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            agent_code: None,
            ticket_number: None,
            start_date: None,
            end_date: None,
            sort: Sort::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassengerFilter {
    Search(Option<String>),
    AgentCode(Option<String>),
    TicketNumber(Option<String>),
    DateRange(Option<NaiveDate>, Option<NaiveDate>),
    Sort(Sort),
}

impl Filters for PassengerFilters {
    type Change = PassengerFilter;

    paged_filters!();

    fn apply(&mut self, change: PassengerFilter) {
        match change {
            PassengerFilter::Search(v) => self.search = normalize(v),
            PassengerFilter::AgentCode(v) => self.agent_code = normalize(v),
            PassengerFilter::TicketNumber(v) => self.ticket_number = normalize(v),
            PassengerFilter::DateRange(start, end) => {
                self.start_date = start;
                self.end_date = end;
            }
            PassengerFilter::Sort(sort) => self.sort = sort,
        }
    }

    fn to_params(&self) -> QueryParams {
        let params = paging(self.page, self.limit)
            .text("search", self.search.as_deref())
            .text("agentCode", self.agent_code.as_deref())
            .text("ticketNumber", self.ticket_number.as_deref())
            .date("startDate", self.start_date)
            .date("endDate", self.end_date);
        self.sort.params(params)
    }
}

// ── Error logs ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogFilters {
    pub page: u32,
    pub limit: u32,
    pub record_type: Option<String>,
    pub error_type: Option<String>,
    pub status: Option<String>,
    pub has_errors: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub sort: Sort,
}

impl Default for ErrorLogFilters {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            record_type: None,
            error_type: None,
            status: None,
            has_errors: None,
            start_date: None,
            end_date: None,
            search: None,
            sort: Sort::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLogFilter {
    RecordType(Option<String>),
    ErrorType(Option<String>),
    Status(Option<String>),
    HasErrors(Option<bool>),
    DateRange(Option<NaiveDate>, Option<NaiveDate>),
    Search(Option<String>),
    Sort(Sort),
}

impl ErrorLogFilters {
    /// Filter parameters without paging, as sent to stats and export.
    pub fn criteria(&self) -> QueryParams {
        let params = QueryParams::new()
            .text("recordType", self.record_type.as_deref())
            .text("errorType", self.error_type.as_deref())
            .text("status", self.status.as_deref())
            .value("hasErrors", self.has_errors)
            .date("startDate", self.start_date)
            .date("endDate", self.end_date)
            .text("q", self.search.as_deref());
        self.sort.params(params)
    }
}

impl Filters for ErrorLogFilters {
    type Change = ErrorLogFilter;

    paged_filters!();

    fn apply(&mut self, change: ErrorLogFilter) {
        match change {
            ErrorLogFilter::RecordType(v) => self.record_type = normalize(v),
            ErrorLogFilter::ErrorType(v) => self.error_type = normalize(v),
            ErrorLogFilter::Status(v) => self.status = normalize(v),
            ErrorLogFilter::HasErrors(v) => self.has_errors = v,
            ErrorLogFilter::DateRange(start, end) => {
                self.start_date = start;
                self.end_date = end;
            }
            ErrorLogFilter::Search(v) => self.search = normalize(v),
            ErrorLogFilter::Sort(sort) => self.sort = sort,
        }
    }

    fn to_params(&self) -> QueryParams {
        paging(self.page, self.limit).extend(self.criteria())
    }
}

// ── Analytics ───────────────────────────────────────────────────────

/// Report criteria. Not paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub group_by: Option<GroupBy>,
    pub agent_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsFilter {
    DateRange(Option<NaiveDate>, Option<NaiveDate>),
    GroupBy(Option<GroupBy>),
    AgentCode(Option<String>),
}

impl AnalyticsFilters {
    pub fn apply(&mut self, change: AnalyticsFilter) {
        match change {
            AnalyticsFilter::DateRange(start, end) => {
                self.start_date = start;
                self.end_date = end;
            }
            AnalyticsFilter::GroupBy(g) => self.group_by = g,
            AnalyticsFilter::AgentCode(v) => self.agent_code = normalize(v),
        }
    }

    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .date("startDate", self.start_date)
            .date("endDate", self.end_date)
            .value("groupBy", self.group_by)
            .text("agentCode", self.agent_code.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pairs(params: &QueryParams) -> Vec<(&str, &str)> {
        params
            .pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn error_log_criteria_strip_unset_values() {
        let mut filters = ErrorLogFilters::default();
        filters.apply(ErrorLogFilter::Status(Some(String::new())));
        filters.apply(ErrorLogFilter::HasErrors(None));
        filters.apply(ErrorLogFilter::RecordType(Some("BKS24".into())));
        filters.apply(ErrorLogFilter::DateRange(None, None));

        assert_eq!(pairs(&filters.criteria()), vec![("recordType", "BKS24")]);
    }

    #[test]
    fn paged_params_lead_with_page_and_limit() {
        let mut filters = OfficeFilters::default();
        filters.apply(OfficeFilter::City(Some("  Madrid ".into())));
        filters.apply(OfficeFilter::Sort(Sort {
            by: Some("totalAmount".into()),
            order: Some(SortOrder::Asc),
        }));
        filters.set_page(2);

        assert_eq!(
            pairs(&filters.to_params()),
            vec![
                ("page", "2"),
                ("limit", "50"),
                ("city", "Madrid"),
                ("sortBy", "totalAmount"),
                ("sortOrder", "asc"),
            ]
        );
    }

    #[test]
    fn analytics_dates_use_wire_format() {
        let mut filters = AnalyticsFilters::default();
        filters.apply(AnalyticsFilter::DateRange(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        ));
        filters.apply(AnalyticsFilter::GroupBy(Some(GroupBy::Week)));

        assert_eq!(
            pairs(&filters.to_params()),
            vec![
                ("startDate", "2024-01-01"),
                ("endDate", "2024-01-31"),
                ("groupBy", "week"),
            ]
        );
    }

    #[test]
    fn sort_order_parses_case_insensitively() {
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
    }
}
