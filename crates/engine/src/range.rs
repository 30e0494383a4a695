use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::{EngineError, ResultEngine};

/// A closed interval `[from, to]` with `from <= to`.
///
/// "No selection" is modelled as `Option<DateRange>` by the owners of a range,
/// so a value of this type always has both bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> ResultEngine<Self> {
        if from > to {
            return Err(EngineError::InvalidRange(format!(
                "start {from} is after end {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// The last `days` days including today.
    ///
    /// `to` is `now` and `from` is `days - 1` days earlier at the same time of
    /// day. Bounds are not snapped to day boundaries, but `now` is truncated
    /// to milliseconds so the range survives a round trip through a share link.
    pub fn trailing_days(days: u32, now: DateTime<Utc>) -> ResultEngine<Self> {
        if days == 0 {
            return Err(EngineError::InvalidPreset(days));
        }
        let now = now.trunc_subsecs(3);
        let from = now
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .ok_or_else(|| EngineError::InvalidRange(format!("{days} days before {now}")))?;
        Self::new(from, now)
    }

    #[must_use]
    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// Length of the interval.
    #[must_use]
    pub fn span(&self) -> Duration {
        self.to - self.from
    }
}

/// A fixed-length trailing window selectable with one action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    pub label: &'static str,
    pub days: u32,
}

impl Preset {
    /// Span of a range built from this preset.
    #[must_use]
    pub fn span(&self) -> Duration {
        Duration::days(i64::from(self.days) - 1)
    }

    pub fn range(&self, now: DateTime<Utc>) -> ResultEngine<DateRange> {
        DateRange::trailing_days(self.days, now)
    }
}

pub const PRESETS: [Preset; 5] = [
    Preset {
        label: "7D",
        days: 7,
    },
    Preset {
        label: "1M",
        days: 30,
    },
    Preset {
        label: "3M",
        days: 90,
    },
    Preset {
        label: "6M",
        days: 180,
    },
    Preset {
        label: "1Y",
        days: 365,
    },
];

/// Returns the preset whose span matches `range` exactly.
///
/// `None` means the range is shown as a custom one.
#[must_use]
pub fn active_preset(range: &DateRange) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.span() == range.span())
}
