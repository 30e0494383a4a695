use std::fmt::Display;

use api_types::{expense::ExpenseRecord, history::HistoryQuery};
use chrono::{DateTime, TimeZone, Utc};

use crate::{DateRange, Picker, ResultEngine, Summary, link};

/// A fetch the caller must perform against the expense service.
///
/// `seq` must be handed back to [`RangeSummaryEngine::complete`] together with
/// the response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub range: DateRange,
    pub query: HistoryQuery,
}

/// What happened to a completed fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response belonged to the latest request and replaced the records.
    Applied { count: usize },
    /// A newer request was issued in the meantime; the response was dropped.
    Stale,
    /// The latest request failed; previous records and summary are kept.
    Failed(String),
}

/// Range selection, request sequencing and summary of the loaded records.
///
/// The engine never performs I/O. Selecting a range returns a
/// [`FetchRequest`]; the caller runs it and reports back with
/// [`complete`](Self::complete). Only the response of the most recently issued
/// request may update the displayed state.
#[derive(Debug, Default)]
pub struct RangeSummaryEngine {
    range: Option<DateRange>,
    applied_range: Option<DateRange>,
    share_link: Option<String>,
    records: Vec<ExpenseRecord>,
    summary: Summary,
    loading: bool,
    last_issued: u64,
}

impl RangeSummaryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the last `days` days including today.
    pub fn select_preset(&mut self, days: u32, now: DateTime<Utc>) -> ResultEngine<FetchRequest> {
        let range = DateRange::trailing_days(days, now)?;
        self.issue(range)
    }

    /// Applies the custom picker selection.
    ///
    /// Fails without touching any state unless the picker holds a complete
    /// range.
    pub fn confirm_custom<Tz: TimeZone>(
        &mut self,
        picker: &Picker,
        tz: &Tz,
    ) -> ResultEngine<FetchRequest> {
        let range = picker.confirm(tz)?;
        self.issue(range)
    }

    /// Restores the range from a shared link, as on page load.
    ///
    /// A link without both bounds leaves the engine without a selection and
    /// returns `Ok(None)`.
    pub fn restore_from_link(&mut self, link: &str) -> ResultEngine<Option<FetchRequest>> {
        match link::parse(link)? {
            Some(range) => self.issue(range).map(Some),
            None => Ok(None),
        }
    }

    /// Re-issues the fetch for the current range.
    pub fn refresh(&mut self) -> ResultEngine<Option<FetchRequest>> {
        match self.range {
            Some(range) => self.issue(range).map(Some),
            None => Ok(None),
        }
    }

    fn issue(&mut self, range: DateRange) -> ResultEngine<FetchRequest> {
        let share_link = link::encode(&range)?;

        self.last_issued += 1;
        self.range = Some(range);
        self.share_link = Some(share_link);
        self.loading = true;

        tracing::debug!(
            "issuing history fetch #{} for {} .. {}",
            self.last_issued,
            range.from(),
            range.to()
        );

        Ok(FetchRequest {
            seq: self.last_issued,
            range,
            query: link::history_query(&range),
        })
    }

    /// Reports the response of request `seq`.
    pub fn complete<E: Display>(
        &mut self,
        seq: u64,
        response: Result<Vec<ExpenseRecord>, E>,
    ) -> FetchOutcome {
        if seq != self.last_issued {
            tracing::debug!(
                "dropping stale history response #{seq} (latest is #{})",
                self.last_issued
            );
            return FetchOutcome::Stale;
        }

        self.loading = false;
        match response {
            Ok(records) => {
                self.summary = Summary::compute(&records);
                self.records = records;
                self.applied_range = self.range;
                FetchOutcome::Applied {
                    count: self.records.len(),
                }
            }
            Err(err) => {
                tracing::error!("history fetch #{seq} failed: {err}");
                FetchOutcome::Failed(err.to_string())
            }
        }
    }

    /// The selected range: the latest one issued, loaded or not.
    #[must_use]
    pub fn range(&self) -> Option<&DateRange> {
        self.range.as_ref()
    }

    /// The range the current records were loaded for.
    ///
    /// Lags behind [`range`](Self::range) while a fetch is in flight and stays
    /// on the previous range when that fetch fails.
    #[must_use]
    pub fn applied_range(&self) -> Option<&DateRange> {
        self.applied_range.as_ref()
    }

    /// Query string mirroring the current range (`start=..&end=..`).
    #[must_use]
    pub fn share_link(&self) -> Option<&str> {
        self.share_link.as_deref()
    }

    #[must_use]
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    #[must_use]
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sequence number of the most recently issued request (0 if none).
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.last_issued
    }
}
