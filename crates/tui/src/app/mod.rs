use std::time::{Duration, Instant};

use api_types::expense::ExpenseRecord;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent};
use engine::{
    FetchOutcome, FetchRequest, PRESETS, Picker, Preset, RangeSummaryEngine, Selection,
};
use tokio::sync::mpsc;

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

const TOAST_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Picker,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

/// Response of a spawned history fetch, tagged with its request number.
#[derive(Debug)]
pub struct FetchDone {
    pub seq: u64,
    pub result: std::result::Result<Vec<ExpenseRecord>, ClientError>,
}

#[derive(Debug)]
pub struct AppState {
    pub history: RangeSummaryEngine,
    pub mode: Mode,
    pub picker: Option<Picker>,
    pub show_breakdown: bool,
    pub selected: usize,
    pub toast: Option<ToastState>,
    pub last_error: Option<String>,
    pub timezone: Tz,
    pub currency_symbol: String,
    pub base_url: String,
}

impl AppState {
    pub fn new(timezone: Tz, currency_symbol: String, base_url: String) -> Self {
        Self {
            history: RangeSummaryEngine::new(),
            mode: Mode::Browse,
            picker: None,
            show_breakdown: false,
            selected: 0,
            toast: None,
            last_error: None,
            timezone,
            currency_symbol,
            base_url,
        }
    }

    /// Handles one key action. Returns the fetch to run, if the action issued one.
    pub fn handle_action(&mut self, action: AppAction, now: DateTime<Utc>) -> Option<FetchRequest> {
        match self.mode {
            Mode::Browse => self.handle_browse(action, now),
            Mode::Picker => self.handle_picker(action),
            Mode::Detail => {
                if matches!(action, AppAction::Cancel | AppAction::Input('b' | 'B')) {
                    self.mode = Mode::Browse;
                }
                None
            }
        }
    }

    fn handle_browse(&mut self, action: AppAction, now: DateTime<Utc>) -> Option<FetchRequest> {
        match action {
            AppAction::Input(ch @ '1'..='5') => {
                let index = ch.to_digit(10).map_or(0, |digit| digit as usize - 1);
                PRESETS
                    .get(index)
                    .and_then(|preset| self.select_preset(preset, now))
            }
            AppAction::Input('c' | 'C') => {
                self.open_picker(now);
                None
            }
            AppAction::Input('b' | 'B') => {
                self.show_breakdown = !self.show_breakdown;
                None
            }
            AppAction::Input('r' | 'R') => match self.history.refresh() {
                Ok(Some(request)) => Some(request),
                Ok(None) => {
                    self.notify(ToastLevel::Info, "Pick a range first.");
                    None
                }
                Err(err) => {
                    self.notify(ToastLevel::Error, err.to_string());
                    None
                }
            },
            AppAction::Down | AppAction::Input('j' | 'J') => {
                self.select_next();
                None
            }
            AppAction::Up | AppAction::Input('k' | 'K') => {
                self.select_prev();
                None
            }
            AppAction::Submit => {
                if self.selected_record().is_some() {
                    self.mode = Mode::Detail;
                }
                None
            }
            _ => None,
        }
    }

    fn handle_picker(&mut self, action: AppAction) -> Option<FetchRequest> {
        if matches!(action, AppAction::Input('a' | 'A')) {
            return self.apply_custom();
        }
        if action == AppAction::Cancel {
            self.close_picker();
            return None;
        }

        let picker = self.picker.as_mut()?;
        match action {
            AppAction::Left | AppAction::Input('h') => picker.move_cursor(-1),
            AppAction::Right | AppAction::Input('l') => picker.move_cursor(1),
            AppAction::Up | AppAction::Input('k') => picker.move_cursor(-7),
            AppAction::Down | AppAction::Input('j') => picker.move_cursor(7),
            AppAction::PrevPage | AppAction::Input('<') => picker.prev_month(),
            AppAction::NextPage | AppAction::Input('>') => picker.next_month(),
            AppAction::Submit | AppAction::Input(' ') => picker.click_cursor(),
            _ => {}
        }
        None
    }

    fn select_preset(&mut self, preset: &Preset, now: DateTime<Utc>) -> Option<FetchRequest> {
        match self.history.select_preset(preset.days, now) {
            Ok(request) => {
                self.notify(ToastLevel::Success, format!("{} range applied!", preset.label));
                Some(request)
            }
            Err(err) => {
                self.notify(ToastLevel::Error, err.to_string());
                None
            }
        }
    }

    fn open_picker(&mut self, now: DateTime<Utc>) {
        let today = now.with_timezone(&self.timezone).date_naive();
        let selection = match self.history.range() {
            Some(range) => Selection::RangeSet {
                from: range.from().with_timezone(&self.timezone).date_naive(),
                to: range.to().with_timezone(&self.timezone).date_naive(),
            },
            None => Selection::Empty,
        };
        self.picker = Some(Picker::with_selection(today, selection));
        self.mode = Mode::Picker;
    }

    fn close_picker(&mut self) {
        self.picker = None;
        self.mode = Mode::Browse;
    }

    fn apply_custom(&mut self) -> Option<FetchRequest> {
        let picker = self.picker.as_ref()?;
        match self.history.confirm_custom(picker, &self.timezone) {
            Ok(request) => {
                self.close_picker();
                self.notify(ToastLevel::Success, "Custom range applied!");
                Some(request)
            }
            Err(err) => {
                self.notify(ToastLevel::Error, err.to_string());
                None
            }
        }
    }

    /// Restores the range of a shared link at startup.
    pub fn restore_link(&mut self, link: &str) -> Option<FetchRequest> {
        match self.history.restore_from_link(link) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!("ignoring shared link {link:?}: {err}");
                self.notify(ToastLevel::Error, err.to_string());
                None
            }
        }
    }

    /// Applies a finished fetch. Stale responses leave the state untouched.
    pub fn apply_fetch(&mut self, done: FetchDone) -> FetchOutcome {
        let outcome = self.history.complete(done.seq, done.result);
        match &outcome {
            FetchOutcome::Applied { count } => {
                tracing::info!("loaded {count} expenses");
                self.selected = 0;
                self.last_error = None;
            }
            FetchOutcome::Stale => {}
            FetchOutcome::Failed(message) => {
                self.last_error = Some(message.clone());
                self.notify(ToastLevel::Error, "Failed to fetch expenses!");
            }
        }
        outcome
    }

    pub fn selected_record(&self) -> Option<&ExpenseRecord> {
        self.history.records().get(self.selected)
    }

    fn select_next(&mut self) {
        let len = self.history.records().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
        }
    }
}

pub struct App {
    client: Client,
    link: Option<String>,
    pub state: AppState,
    fetch_tx: mpsc::UnboundedSender<FetchDone>,
    fetch_rx: mpsc::UnboundedReceiver<FetchDone>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(
            &config.base_url,
            config.session_cookie.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|err| AppError::Timezone(format!("{}: {err}", config.timezone)))?;
        let state = AppState::new(timezone, config.currency_symbol, config.base_url);
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();

        Ok(Self {
            client,
            link: config.link,
            state,
            fetch_tx,
            fetch_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        if let Some(link) = self.link.take()
            && let Some(request) = self.state.restore_link(&link)
        {
            self.dispatch(request);
        }

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            self.drain_fetches();
            self.state.expire_toast(Instant::now());

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }

            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if let Some(request) = self.state.handle_action(action, Utc::now()) {
            self.dispatch(request);
        }
    }

    /// Runs `request` in the background; the result comes back through the channel.
    fn dispatch(&self, request: FetchRequest) {
        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = client.expenses_history(&request.query).await;
            if tx
                .send(FetchDone {
                    seq: request.seq,
                    result,
                })
                .is_err()
            {
                tracing::debug!("fetch #{} finished after shutdown", request.seq);
            }
        });
    }

    fn drain_fetches(&mut self) {
        while let Ok(done) = self.fetch_rx.try_recv() {
            self.state.apply_fetch(done);
        }
    }
}

#[cfg(test)]
mod tests {
    use api_types::expense::{Category, CategoryRef};
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn state() -> AppState {
        AppState::new(
            chrono_tz::UTC,
            "₹".to_string(),
            "http://127.0.0.1:5000".to_string(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 15, 9, 30, 0).unwrap()
    }

    fn record(id: &str, amount: f64) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            title: format!("expense {id}"),
            amount,
            date: now(),
            category: Some(CategoryRef::Expanded(Category {
                id: "c1".to_string(),
                name: "Food".to_string(),
            })),
            description: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    #[test]
    fn preset_key_issues_fetch_and_toasts() {
        let mut state = state();
        let request = state.handle_action(AppAction::Input('1'), now()).unwrap();
        assert_eq!(request.range.to(), now());
        let toast = state.toast.as_ref().unwrap();
        assert_eq!(toast.message, "7D range applied!");
        assert_eq!(toast.level, ToastLevel::Success);
    }

    #[test]
    fn later_selection_wins_over_slow_response() {
        let mut state = state();
        let year = state.handle_action(AppAction::Input('5'), now()).unwrap();
        let week = state.handle_action(AppAction::Input('1'), now()).unwrap();

        let outcome = state.apply_fetch(FetchDone {
            seq: week.seq,
            result: Ok(vec![record("w", 5.0)]),
        });
        assert_eq!(outcome, FetchOutcome::Applied { count: 1 });

        let outcome = state.apply_fetch(FetchDone {
            seq: year.seq,
            result: Ok(vec![record("y1", 1.0), record("y2", 2.0)]),
        });
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(state.history.records()[0].id, "w");
        assert_eq!(state.history.summary().total_count, 1);
    }

    #[test]
    fn failed_fetch_toasts_and_keeps_records() {
        let mut state = state();
        let first = state.handle_action(AppAction::Input('1'), now()).unwrap();
        state.apply_fetch(FetchDone {
            seq: first.seq,
            result: Ok(vec![record("a", 5.0)]),
        });

        let second = state.handle_action(AppAction::Input('r'), now()).unwrap();
        let outcome = state.apply_fetch(FetchDone {
            seq: second.seq,
            result: Err(ClientError::Unauthorized),
        });
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(
            state.toast.as_ref().map(|t| t.message.as_str()),
            Some("Failed to fetch expenses!")
        );
        assert_eq!(state.history.records().len(), 1);
        assert_eq!(state.last_error.as_deref(), Some("not authenticated"));
    }

    #[test]
    fn apply_without_full_range_warns_and_keeps_picker() {
        let mut state = state();
        state.handle_action(AppAction::Input('c'), now());
        assert_eq!(state.mode, Mode::Picker);

        state.handle_action(AppAction::Submit, now());
        assert!(state.handle_action(AppAction::Input('a'), now()).is_none());

        assert_eq!(state.mode, Mode::Picker);
        assert_eq!(
            state.picker.as_ref().map(Picker::selection),
            Some(Selection::AnchorSet { from: day(15) })
        );
        assert_eq!(
            state.toast.as_ref().map(|t| t.message.as_str()),
            Some("Please select a full range!")
        );
        assert!(state.history.range().is_none());
    }

    #[test]
    fn custom_range_built_with_cursor() {
        let mut state = state();
        state.handle_action(AppAction::Input('c'), now());

        // Anchor on the 15th, then click a week earlier: the bounds swap.
        state.handle_action(AppAction::Submit, now());
        state.handle_action(AppAction::Up, now());
        state.handle_action(AppAction::Submit, now());

        let request = state.handle_action(AppAction::Input('a'), now()).unwrap();
        assert_eq!(request.query.start, "2026-04-08T00:00:00.000Z");
        assert_eq!(request.query.end, "2026-04-15T00:00:00.000Z");
        assert_eq!(state.mode, Mode::Browse);
        assert!(state.picker.is_none());
    }

    #[test]
    fn cancel_discards_picker_selection() {
        let mut state = state();
        let request = state.handle_action(AppAction::Input('1'), now()).unwrap();
        state.handle_action(AppAction::Input('c'), now());
        state.handle_action(AppAction::Submit, now());
        state.handle_action(AppAction::Cancel, now());

        assert_eq!(state.mode, Mode::Browse);
        assert_eq!(state.history.range(), Some(&request.range));
    }

    #[test]
    fn detail_opens_only_with_records() {
        let mut state = state();
        state.handle_action(AppAction::Submit, now());
        assert_eq!(state.mode, Mode::Browse);

        let request = state.handle_action(AppAction::Input('1'), now()).unwrap();
        state.apply_fetch(FetchDone {
            seq: request.seq,
            result: Ok(vec![record("a", 1.0), record("b", 2.0)]),
        });
        state.handle_action(AppAction::Down, now());
        state.handle_action(AppAction::Submit, now());
        assert_eq!(state.mode, Mode::Detail);
        assert_eq!(state.selected_record().map(|r| r.id.as_str()), Some("b"));

        state.handle_action(AppAction::Cancel, now());
        assert_eq!(state.mode, Mode::Browse);
    }

    #[test]
    fn restore_link_reports_bad_links() {
        let mut state = state();
        assert!(state.restore_link("?start=nope&end=never").is_none());
        assert_eq!(
            state.toast.as_ref().map(|t| t.level),
            Some(ToastLevel::Error)
        );

        let request = state
            .restore_link("?start=2026-04-03T00:00:00.000Z&end=2026-04-10T00:00:00.000Z")
            .unwrap();
        assert_eq!(request.query.start, "2026-04-03T00:00:00.000Z");
    }

    #[test]
    fn toast_expires() {
        let mut state = state();
        state.notify(ToastLevel::Info, "hello");
        state.expire_toast(Instant::now());
        assert!(state.toast.is_some());
        state.expire_toast(Instant::now() + TOAST_TTL);
        assert!(state.toast.is_none());
    }
}
