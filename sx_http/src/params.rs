use time::Duration;
use time::OffsetDateTime;

/// Results per page requested from the search endpoint
pub const PAGE_SIZE: u32 = 100;

/// How far back the search window reaches
pub const DATE_WINDOW: Duration = Duration::days(365);

/// Caller supplied search filters plus the fixed date window of a run
///
/// Built once per run and never mutated; the page number is only added when
/// a request's query is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    intitle: String,
    tagged: Option<String>,
    from_date: i64,
    to_date: i64,
}

impl SearchParams {
    /// Search window covering the trailing year, ending now
    pub fn trailing_year(intitle: impl Into<String>, tagged: Option<String>) -> Self {
        Self::ending_at(intitle, tagged, OffsetDateTime::now_utc())
    }

    /// Search window covering [`DATE_WINDOW`] ending at `now`
    pub fn ending_at(intitle: impl Into<String>, tagged: Option<String>, now: OffsetDateTime) -> Self {
        Self {
            intitle: intitle.into(),
            tagged: tagged.filter(|tag| !tag.trim().is_empty()),
            from_date: (now - DATE_WINDOW).unix_timestamp(),
            to_date: now.unix_timestamp(),
        }
    }

    pub fn intitle(&self) -> &str {
        &self.intitle
    }

    pub fn tagged(&self) -> Option<&str> {
        self.tagged.as_deref()
    }

    pub fn from_date(&self) -> i64 {
        self.from_date
    }

    pub fn to_date(&self) -> i64 {
        self.to_date
    }

    /// Query pairs for one page request
    pub fn query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(6);
        query.push(("intitle", self.intitle.clone()));
        if let Some(tagged) = &self.tagged {
            query.push(("tagged", tagged.clone()));
        }
        query.push(("pagesize", PAGE_SIZE.to_string()));
        query.push(("fromdate", self.from_date.to_string()));
        query.push(("todate", self.to_date.to_string()));
        query.push(("page", page.to_string()));
        query
    }
}
