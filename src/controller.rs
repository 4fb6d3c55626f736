//! Search controller
//!
//! Owns every piece of mutable search state and drives the directory
//! client. Requests run on background threads and report back over a
//! channel that the UI loop drains with [`SearchController::poll`]; all
//! state changes therefore happen on the thread that owns the controller.
//!
//! Each request carries a [`RequestToken`]. A completion is applied only if
//! its token still matches the request the controller is waiting for, so a
//! slow response from a superseded query can never overwrite newer results.

use crate::client::{DirectoryClient, ProfileRecord, SearchPage};
use crate::session::{Session, SessionId};
use crate::watcher::VisibilityWatcher;
use crate::Result;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Results requested per page
pub const PAGE_SIZE: u32 = 16;

pub const NOT_FOUND_MESSAGE: &str = "User not found";
pub const ERROR_MESSAGE: &str = "API rate exceeded";
pub const LOADING_MESSAGE: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: &'static str,
    pub kind: NotificationKind,
}

/// Derived view of the controller flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    Results,
    Paginating,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub session: SessionId,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    FirstPage,
    NextPage,
}

struct Completion {
    token: RequestToken,
    kind: RequestKind,
    page: u32,
    outcome: Result<SearchPage>,
}

/// One row handed to the result renderer
#[derive(Debug, Clone, Copy)]
pub struct ResultRow<'a> {
    pub index: usize,
    pub profile: &'a ProfileRecord,
    pub is_sentinel: bool,
}

pub struct SearchController {
    client: Arc<dyn DirectoryClient>,
    input: String,
    session: Option<Session>,
    submitted: bool,
    error: bool,
    in_flight: Option<RequestToken>,
    next_session: u64,
    next_seq: u64,
    watcher: VisibilityWatcher,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    active: Arc<AtomicBool>,
}

impl SearchController {
    pub fn new(client: Arc<dyn DirectoryClient>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            client,
            input: String::new(),
            session: None,
            submitted: false,
            error: false,
            in_flight: None,
            next_session: 0,
            next_seq: 0,
            watcher: VisibilityWatcher::new(),
            tx,
            rx,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    // --- Inputs ---

    /// Replace the typed query. Never touches the network or the session.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Start a new session for the typed query.
    ///
    /// Returns `false` without contacting the client when the query is blank.
    pub fn submit(&mut self) -> bool {
        let query = self.input.trim();
        if query.is_empty() {
            tracing::debug!("ignoring submission of empty query");
            return false;
        }

        self.next_session += 1;
        let session = Session::new(SessionId(self.next_session), query);
        tracing::info!(query = session.query(), session = self.next_session, "new search");

        self.submitted = true;
        self.session = Some(session);
        self.dispatch(RequestKind::FirstPage, 1);
        true
    }

    /// The sentinel row scrolled into view.
    ///
    /// Advances the session by exactly one page unless a request is already
    /// in flight, the error latch is set, or the session has nothing left.
    pub fn on_sentinel_visible(&mut self) -> bool {
        if self.is_loading() || self.error {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.can_advance() {
            return false;
        }

        let page = session.advance();
        tracing::debug!(query = session.query(), page, "sentinel visible, fetching next page");
        self.dispatch(RequestKind::NextPage, page);
        true
    }

    /// Report which result rows are on screen. Fires pagination when the
    /// watched sentinel enters the viewport.
    pub fn on_viewport(&mut self, viewport: Range<usize>) -> bool {
        if self.watcher.observe(viewport) {
            self.on_sentinel_visible()
        } else {
            false
        }
    }

    // --- Completion handling ---

    /// Apply every completion that has arrived. Returns how many were received,
    /// including stale ones that were discarded.
    pub fn poll(&mut self) -> usize {
        let mut received = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            received += 1;
        }
        received
    }

    /// Block until the in-flight request resolves or `timeout` passes.
    /// Returns `true` when the controller is idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    self.apply(completion);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false;
                }
            }
        }
        true
    }

    /// Stop accepting completions. Workers still running drop their result.
    pub fn shutdown(&mut self) {
        if self.active.swap(false, Ordering::AcqRel) {
            tracing::debug!(pending = self.in_flight.is_some(), "controller shut down");
        }
        self.watcher.unsubscribe();
        self.in_flight = None;
    }

    fn dispatch(&mut self, kind: RequestKind, page: u32) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let query = session.query().to_string();
        self.next_seq += 1;
        let token = RequestToken {
            session: session.id(),
            seq: self.next_seq,
        };
        self.in_flight = Some(token);
        self.rewire_sentinel();

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let active = Arc::clone(&self.active);

        thread::spawn(move || {
            let outcome = client.search(&query, page, PAGE_SIZE);
            if !active.load(Ordering::Acquire) {
                tracing::debug!(query = %query, page, "controller gone, dropping response");
                return;
            }
            let _ = tx.send(Completion {
                token,
                kind,
                page,
                outcome,
            });
        });
    }

    fn apply(&mut self, completion: Completion) -> bool {
        if !self.active.load(Ordering::Acquire) || self.in_flight != Some(completion.token) {
            tracing::debug!(
                seq = completion.token.seq,
                page = completion.page,
                "discarding stale response"
            );
            return false;
        }
        self.in_flight = None;

        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.id() == completion.token.session)
        else {
            return false;
        };

        match (completion.kind, completion.outcome) {
            (RequestKind::FirstPage, Ok(page)) => {
                tracing::info!(
                    query = session.query(),
                    total = page.total_count,
                    items = page.items.len(),
                    "first page loaded"
                );
                session.apply_first_page(page);
                self.error = false;
            }
            (RequestKind::NextPage, Ok(page)) => {
                let added = session.apply_next_page(page);
                tracing::info!(
                    query = session.query(),
                    page = completion.page,
                    added,
                    accumulated = session.profiles().len(),
                    "page merged"
                );
            }
            (_, Err(err)) => {
                tracing::warn!(
                    query = session.query(),
                    page = completion.page,
                    rate_limited = err.is_rate_limit(),
                    error = %err,
                    "search request failed"
                );
                self.error = true;
            }
        }

        self.rewire_sentinel();
        true
    }

    /// Tear down the current subscription and watch the last row again.
    /// Nothing is watched while a request is in flight.
    fn rewire_sentinel(&mut self) {
        self.watcher.unsubscribe();
        if self.is_loading() {
            return;
        }
        let count = self.profiles().len();
        if count > 0 {
            self.watcher.subscribe(count - 1);
        }
    }

    // --- Read side ---

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn profiles(&self) -> &[ProfileRecord] {
        self.session.as_ref().map(Session::profiles).unwrap_or(&[])
    }

    pub fn page(&self) -> u32 {
        self.session.as_ref().map(Session::page).unwrap_or(1)
    }

    pub fn total_count(&self) -> Option<u64> {
        self.session.as_ref().and_then(Session::total_count)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn watcher(&self) -> &VisibilityWatcher {
        &self.watcher
    }

    pub fn phase(&self) -> Phase {
        match &self.session {
            None => Phase::Idle,
            Some(s) if self.is_loading() => {
                if s.total_count().is_none() {
                    Phase::Searching
                } else {
                    Phase::Paginating
                }
            }
            Some(_) if self.error => Phase::Errored,
            Some(_) => Phase::Results,
        }
    }

    /// Notifications to display. The conditions are independent, so the
    /// error and loading notices can show together.
    pub fn notifications(&self) -> Vec<Notification> {
        let mut out = Vec::new();
        if self.submitted && self.total_count() == Some(0) {
            out.push(Notification {
                message: NOT_FOUND_MESSAGE,
                kind: NotificationKind::Error,
            });
        }
        if self.error {
            out.push(Notification {
                message: ERROR_MESSAGE,
                kind: NotificationKind::Error,
            });
        }
        if self.is_loading() {
            out.push(Notification {
                message: LOADING_MESSAGE,
                kind: NotificationKind::Loading,
            });
        }
        out
    }

    /// Rows for the renderer, the last one flagged as the sentinel
    pub fn rows(&self) -> impl Iterator<Item = ResultRow<'_>> {
        let profiles = self.profiles();
        let last = profiles.len().saturating_sub(1);
        profiles
            .iter()
            .enumerate()
            .map(move |(index, profile)| ResultRow {
                index,
                profile,
                is_sentinel: index == last,
            })
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HubSeekError;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    #[derive(Clone)]
    enum Reply {
        Page(Vec<ProfileRecord>, u64),
        RateLimited,
    }

    /// Answers from a fixed script keyed by (query, page)
    #[derive(Default)]
    struct ScriptedClient {
        replies: Mutex<HashMap<(String, u32), Reply>>,
        calls: Mutex<Vec<(String, u32, u32)>>,
        gates: Mutex<HashMap<String, Receiver<()>>>,
    }

    impl ScriptedClient {
        fn reply(self, query: &str, page: u32, reply: Reply) -> Self {
            self.replies
                .lock()
                .unwrap()
                .insert((query.to_string(), page), reply);
            self
        }

        /// Hold every request for `query` until the returned sender fires
        fn gate(&self, query: &str) -> Sender<()> {
            let (tx, rx) = unbounded();
            self.gates.lock().unwrap().insert(query.to_string(), rx);
            tx
        }

        fn calls(&self) -> Vec<(String, u32, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DirectoryClient for ScriptedClient {
        fn search(&self, query: &str, page: u32, per_page: u32) -> Result<SearchPage> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), page, per_page));

            let gate = self.gates.lock().unwrap().get(query).cloned();
            if let Some(gate) = gate {
                let _ = gate.recv_timeout(WAIT);
            }

            let reply = self
                .replies
                .lock()
                .unwrap()
                .get(&(query.to_string(), page))
                .cloned();
            match reply {
                Some(Reply::Page(items, total_count)) => Ok(SearchPage { items, total_count }),
                Some(Reply::RateLimited) => Err(HubSeekError::from_status(
                    403,
                    Some("0"),
                    None,
                    r#"{"message":"API rate limit exceeded"}"#,
                )),
                None => Err(HubSeekError::Status {
                    status: 422,
                    message: "unscripted".to_string(),
                }),
            }
        }
    }

    fn profile(id: u64, login: &str) -> ProfileRecord {
        ProfileRecord {
            id,
            login: login.to_string(),
            avatar_url: String::new(),
            html_url: format!("https://github.com/{login}"),
            account_type: "User".to_string(),
            score: 1.0,
        }
    }

    fn controller(client: &Arc<ScriptedClient>) -> SearchController {
        SearchController::new(Arc::clone(client) as Arc<dyn DirectoryClient>)
    }

    fn logins(controller: &SearchController) -> Vec<&str> {
        controller.profiles().iter().map(|p| p.login.as_str()).collect()
    }

    fn messages(controller: &SearchController) -> Vec<&'static str> {
        controller.notifications().iter().map(|n| n.message).collect()
    }

    fn submit(controller: &mut SearchController, query: &str) {
        controller.set_input(query);
        assert!(controller.submit());
        assert!(controller.wait_idle(WAIT));
    }

    fn wait_received(controller: &mut SearchController) -> usize {
        let deadline = Instant::now() + WAIT;
        loop {
            let received = controller.poll();
            if received > 0 || Instant::now() >= deadline {
                return received;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn submission_replaces_results() {
        let client = Arc::new(ScriptedClient::default().reply(
            "octocat",
            1,
            Reply::Page(vec![profile(1, "A"), profile(2, "B")], 2),
        ));
        let mut c = controller(&client);

        c.set_input("octocat");
        assert!(c.submit());
        assert!(c.is_loading());
        assert!(c.is_submitted());
        assert_eq!(c.phase(), Phase::Searching);
        assert_eq!(messages(&c), vec![LOADING_MESSAGE]);

        assert!(c.wait_idle(WAIT));
        assert_eq!(logins(&c), vec!["A", "B"]);
        assert_eq!(c.total_count(), Some(2));
        assert!(!c.is_loading());
        assert!(c.notifications().is_empty());
        assert_eq!(c.phase(), Phase::Results);
        assert_eq!(client.calls(), vec![("octocat".to_string(), 1, PAGE_SIZE)]);
    }

    #[test]
    fn empty_result_shows_not_found() {
        let client = Arc::new(ScriptedClient::default().reply(
            "zzz_no_such_user_zzz",
            1,
            Reply::Page(Vec::new(), 0),
        ));
        let mut c = controller(&client);

        submit(&mut c, "zzz_no_such_user_zzz");

        assert!(c.profiles().is_empty());
        assert!(!c.has_error());
        assert_eq!(
            c.notifications(),
            vec![Notification {
                message: NOT_FOUND_MESSAGE,
                kind: NotificationKind::Error,
            }]
        );
    }

    #[test]
    fn not_found_hidden_before_first_submission() {
        let client = Arc::new(ScriptedClient::default());
        let c = controller(&client);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.notifications().is_empty());
    }

    #[test]
    fn failed_submission_latches_error() {
        let client = Arc::new(ScriptedClient::default().reply("octocat", 1, Reply::RateLimited));
        let mut c = controller(&client);

        submit(&mut c, "octocat");

        assert!(c.has_error());
        assert!(!c.is_loading());
        assert_eq!(c.phase(), Phase::Errored);
        assert_eq!(messages(&c), vec![ERROR_MESSAGE]);
    }

    #[test]
    fn empty_query_never_reaches_client() {
        let client = Arc::new(ScriptedClient::default());
        let mut c = controller(&client);

        c.set_input("");
        assert!(!c.submit());
        c.set_input("   ");
        assert!(!c.submit());

        assert!(client.calls().is_empty());
        assert!(!c.is_submitted());
        assert!(!c.is_loading());
    }

    #[test]
    fn input_change_does_not_touch_session() {
        let client = Arc::new(ScriptedClient::default().reply(
            "octo",
            1,
            Reply::Page(vec![profile(1, "A")], 40),
        ));
        let mut c = controller(&client);
        submit(&mut c, "octo");

        c.set_input("something else");

        assert_eq!(c.input(), "something else");
        assert_eq!(c.session().map(Session::query), Some("octo"));
        assert_eq!(logins(&c), vec!["A"]);
        assert_eq!(client.calls().len(), 1);
    }

    #[test]
    fn sentinel_appends_next_page_without_duplicates() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("octo", 1, Reply::Page(vec![profile(1, "A"), profile(2, "B")], 40))
                .reply("octo", 2, Reply::Page(vec![profile(2, "B"), profile(3, "C")], 40)),
        );
        let mut c = controller(&client);
        submit(&mut c, "octo");

        assert!(c.on_sentinel_visible());
        assert_eq!(c.page(), 2);
        assert_eq!(c.phase(), Phase::Paginating);
        assert!(c.wait_idle(WAIT));

        assert_eq!(logins(&c), vec!["A", "B", "C"]);
        assert_eq!(
            client.calls(),
            vec![
                ("octo".to_string(), 1, PAGE_SIZE),
                ("octo".to_string(), 2, PAGE_SIZE),
            ]
        );
    }

    #[test]
    fn each_trigger_advances_exactly_one_page() {
        let mut client = ScriptedClient::default();
        for page in 1..=4u32 {
            let base = u64::from(page) * 10;
            client = client.reply(
                "octo",
                page,
                Reply::Page(vec![profile(base, "x"), profile(base + 1, "y")], 100),
            );
        }
        let client = Arc::new(client);
        let mut c = controller(&client);
        submit(&mut c, "octo");

        for expected in 2..=4u32 {
            assert!(c.on_sentinel_visible());
            assert_eq!(c.page(), expected);
            assert!(c.wait_idle(WAIT));
        }

        let pages: Vec<u32> = client.calls().iter().map(|(_, p, _)| *p).collect();
        assert_eq!(pages, vec![1, 2, 3, 4]);
        assert_eq!(c.profiles().len(), 8);
    }

    #[test]
    fn trigger_ignored_while_loading() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("octo", 1, Reply::Page(vec![profile(1, "A")], 40))
                .reply("octo", 2, Reply::Page(vec![profile(2, "B")], 40)),
        );
        let mut c = controller(&client);
        submit(&mut c, "octo");

        assert!(c.on_sentinel_visible());
        assert!(!c.on_sentinel_visible());
        assert!(!c.on_sentinel_visible());
        assert_eq!(c.page(), 2);

        assert!(c.wait_idle(WAIT));
        assert_eq!(client.calls().len(), 2);
    }

    #[test]
    fn error_suppresses_pagination_until_resubmission() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("octo", 1, Reply::Page(vec![profile(1, "A")], 40))
                .reply("octo", 2, Reply::RateLimited),
        );
        let mut c = controller(&client);
        submit(&mut c, "octo");

        assert!(c.on_sentinel_visible());
        assert!(c.wait_idle(WAIT));
        assert!(c.has_error());
        assert_eq!(logins(&c), vec!["A"]);

        assert!(!c.on_sentinel_visible());
        assert_eq!(c.page(), 2);
        assert_eq!(client.calls().len(), 2);
    }

    #[test]
    fn error_persists_alongside_loading_until_resubmission_succeeds() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("octo", 1, Reply::RateLimited)
                .reply("octocat", 1, Reply::Page(vec![profile(1, "A")], 1)),
        );
        let mut c = controller(&client);
        submit(&mut c, "octo");
        assert!(c.has_error());

        let release = client.gate("octocat");
        c.set_input("octocat");
        assert!(c.submit());
        assert_eq!(messages(&c), vec![ERROR_MESSAGE, LOADING_MESSAGE]);

        release.send(()).unwrap();
        assert!(c.wait_idle(WAIT));
        assert!(!c.has_error());
        assert!(c.notifications().is_empty());
    }

    #[test]
    fn resubmission_resets_page_and_results() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("octo", 1, Reply::Page(vec![profile(1, "A")], 40))
                .reply("octo", 2, Reply::Page(vec![profile(2, "B")], 40))
                .reply("rust", 1, Reply::Page(vec![profile(9, "R")], 1)),
        );
        let mut c = controller(&client);
        submit(&mut c, "octo");
        c.on_sentinel_visible();
        assert!(c.wait_idle(WAIT));
        assert_eq!(c.page(), 2);

        submit(&mut c, "rust");

        assert_eq!(c.page(), 1);
        assert_eq!(logins(&c), vec!["R"]);
        assert_eq!(client.calls().last(), Some(&("rust".to_string(), 1, PAGE_SIZE)));
    }

    #[test]
    fn pagination_uses_submitted_query_not_typed_text() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("octo", 1, Reply::Page(vec![profile(1, "A")], 40))
                .reply("octo", 2, Reply::Page(vec![profile(2, "B")], 40)),
        );
        let mut c = controller(&client);
        submit(&mut c, "octo");

        c.set_input("half-typed");
        assert!(c.on_sentinel_visible());
        assert!(c.wait_idle(WAIT));

        assert_eq!(client.calls()[1].0, "octo");
        assert_eq!(logins(&c), vec!["A", "B"]);
    }

    #[test]
    fn exhausted_session_stops_paginating() {
        let client = Arc::new(ScriptedClient::default().reply(
            "octo",
            1,
            Reply::Page(vec![profile(1, "A"), profile(2, "B")], 2),
        ));
        let mut c = controller(&client);
        submit(&mut c, "octo");

        assert!(!c.on_sentinel_visible());
        assert_eq!(c.page(), 1);
        assert_eq!(client.calls().len(), 1);
    }

    #[test]
    fn stale_response_from_superseded_query_is_discarded() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("slow", 1, Reply::Page(vec![profile(1, "S")], 1))
                .reply("fast", 1, Reply::Page(vec![profile(2, "F")], 1)),
        );
        let release = client.gate("slow");
        let mut c = controller(&client);

        c.set_input("slow");
        assert!(c.submit());
        submit(&mut c, "fast");
        assert_eq!(logins(&c), vec!["F"]);

        release.send(()).unwrap();
        assert_eq!(wait_received(&mut c), 1);

        assert_eq!(logins(&c), vec!["F"]);
        assert_eq!(c.session().map(Session::query), Some("fast"));
        assert!(!c.is_loading());
    }

    #[test]
    fn response_after_shutdown_is_dropped() {
        let client = Arc::new(
            ScriptedClient::default().reply("octo", 1, Reply::Page(vec![profile(1, "A")], 1)),
        );
        let release = client.gate("octo");
        let mut c = controller(&client);
        c.set_input("octo");
        assert!(c.submit());

        c.shutdown();
        release.send(()).unwrap();
        thread::sleep(Duration::from_millis(100));

        assert_eq!(c.poll(), 0);
        assert!(c.profiles().is_empty());
        assert!(!c.is_loading());
    }

    #[test]
    fn viewport_drives_pagination_through_watcher() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("octo", 1, Reply::Page(vec![profile(1, "A"), profile(2, "B")], 40))
                .reply("octo", 2, Reply::Page(vec![profile(3, "C")], 40)),
        );
        let mut c = controller(&client);
        submit(&mut c, "octo");
        assert_eq!(c.watcher().target(), Some(1));

        assert!(!c.on_viewport(0..1));
        assert!(c.on_viewport(0..2));
        assert_eq!(c.watcher().target(), None);
        assert!(c.wait_idle(WAIT));

        assert_eq!(c.watcher().target(), Some(2));
        assert_eq!(logins(&c), vec!["A", "B", "C"]);
    }

    #[test]
    fn sentinel_is_torn_down_before_each_rewire() {
        let client = Arc::new(
            ScriptedClient::default()
                .reply("octo", 1, Reply::Page(vec![profile(1, "A")], 40))
                .reply("octo", 2, Reply::Page(vec![profile(2, "B")], 40)),
        );
        let mut c = controller(&client);
        submit(&mut c, "octo");
        c.on_sentinel_visible();
        assert!(c.wait_idle(WAIT));

        let watcher = c.watcher();
        // Every subscription but the live one has been torn down
        assert_eq!(watcher.teardown_count(), watcher.subscription_count() - 1);
        assert_eq!(watcher.target(), Some(1));
    }

    #[test]
    fn rows_flag_only_last_as_sentinel() {
        let client = Arc::new(ScriptedClient::default().reply(
            "octo",
            1,
            Reply::Page(vec![profile(1, "A"), profile(2, "B"), profile(3, "C")], 3),
        ));
        let mut c = controller(&client);
        submit(&mut c, "octo");

        let flags: Vec<(usize, bool)> = c.rows().map(|r| (r.index, r.is_sentinel)).collect();
        assert_eq!(flags, vec![(0, false), (1, false), (2, true)]);
    }
}
