//! List coordinator
//!
//! [`ListModel`] owns the list state: page, page size, facets, free text,
//! selected parent, refresh token and the last page received. Every change
//! that needs new data returns a [`FetchTicket`] carrying a sequence number
//! and a snapshot of the query. Only the completion of the most recently
//! issued ticket is applied; older completions are discarded.
//!
//! [`ListCoordinator`] runs a model on its own task, wiring it to a
//! [`ListSource`], a [`Debouncer`] for the free text and the refresh bus,
//! and publishes a [`ListSnapshot`] after every change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shared::{
    EntityKind, ListQuery, OrderDirection, Page, PageSize, Pagination, ParentRef, StockFilter,
};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::context::ConsoleContext;
use crate::debounce::Debouncer;
use crate::error::{ConsoleError, ConsoleResult};
use crate::events::{RefreshBus, RefreshRequested, RefreshSubscription, RefreshToken};
use crate::remote::ListSource;

const LOG_CONTEXT: &str = "list";

/// A fetch the caller must run and report back through [`ListModel::complete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: ListQuery,
}

/// What happened to a completed fetch
#[derive(Debug)]
pub enum Completion {
    /// The page replaced the visible one
    Applied,
    /// A newer request was issued meanwhile; the result was dropped
    Stale,
    /// The latest request failed; the previous page stays visible
    Failed(ConsoleError),
}

/// List state machine, free of I/O
#[derive(Debug, Clone)]
pub struct ListModel<T> {
    query: ListQuery,
    /// Trimmed text as typed, before debouncing
    raw_text: String,
    refresh: RefreshToken,
    page: Page<T>,
    loading: bool,
    issued: u64,
}

impl<T> ListModel<T> {
    pub fn new(query: ListQuery) -> Self {
        Self {
            raw_text: query.free_text.clone(),
            query,
            refresh: RefreshToken::default(),
            page: Page::default(),
            loading: false,
            issued: 0,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn page(&self) -> &Page<T> {
        &self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn refresh_token(&self) -> RefreshToken {
        self.refresh
    }

    /// Sequence number of the most recently issued fetch
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    pub fn total_pages(&self) -> u32 {
        self.page.total_pages(self.query.limit)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.query.page,
            self.query.limit.get(),
            self.page.count,
            self.loading,
        )
    }

    fn requery(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket {
            seq: self.issued,
            query: self.query.clone(),
        }
    }

    fn first_page(&mut self) -> FetchTicket {
        self.query.page = 0;
        self.requery()
    }

    /// Initial load
    pub fn start(&mut self) -> FetchTicket {
        self.requery()
    }

    /// Page change through the pagination control: refused while loading,
    /// clamped into the available pages
    pub fn go_to_page(&mut self, requested: i64) -> Option<FetchTicket> {
        let target = self
            .pagination()
            .controls()
            .request(requested, self.total_pages())?;
        self.set_page(target)
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let controls = self.pagination().controls();
        if !controls.can_go_next() {
            return None;
        }
        self.set_page(controls.next?)
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        let controls = self.pagination().controls();
        if !controls.can_go_previous() {
            return None;
        }
        self.set_page(controls.previous?)
    }

    fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        if page == self.query.page {
            return None;
        }
        self.query.page = page;
        Some(self.requery())
    }

    pub fn set_limit(&mut self, limit: PageSize) -> Option<FetchTicket> {
        if limit == self.query.limit {
            return None;
        }
        self.query.limit = limit;
        Some(self.first_page())
    }

    pub fn set_order(&mut self, order: OrderDirection) -> Option<FetchTicket> {
        if order == self.query.order {
            return None;
        }
        self.query.order = order;
        Some(self.first_page())
    }

    pub fn set_stock_filter(&mut self, filter: StockFilter) -> Option<FetchTicket> {
        if filter == self.query.stock_filter {
            return None;
        }
        self.query.stock_filter = filter;
        Some(self.first_page())
    }

    /// Record typed text. Returns the trimmed value to debounce when it
    /// differs from what was typed before.
    pub fn set_text(&mut self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed == self.raw_text {
            return None;
        }
        self.raw_text = trimmed.to_string();
        Some(self.raw_text.clone())
    }

    /// Apply a debounced value. Values overtaken by later typing or by a
    /// parent selection are ignored.
    pub fn apply_settled_text(&mut self, text: &str) -> Option<FetchTicket> {
        if text != self.raw_text || text == self.query.free_text {
            return None;
        }
        self.query.free_text = text.to_string();
        Some(self.first_page())
    }

    /// Whether typed text has not reached the query yet
    pub fn text_pending(&self) -> bool {
        self.raw_text != self.query.free_text
    }

    /// Scope the list to one parent. Resets the page and clears the text.
    pub fn select_parent(&mut self, parent: ParentRef) -> Option<FetchTicket> {
        self.raw_text.clear();
        let unchanged = self.query.parent.as_ref() == Some(&parent)
            && self.query.page == 0
            && self.query.free_text.is_empty();
        if unchanged {
            return None;
        }
        self.query.parent = Some(parent);
        self.query.free_text.clear();
        Some(self.first_page())
    }

    /// Back to the unscoped list at page 0
    pub fn clear_parent(&mut self) -> Option<FetchTicket> {
        self.query.parent.take()?;
        Some(self.first_page())
    }

    /// Always re-fetches with the current query
    pub fn refresh(&mut self) -> FetchTicket {
        self.refresh = self.refresh.flipped();
        self.requery()
    }

    pub fn complete(&mut self, seq: u64, result: ConsoleResult<Page<T>>) -> Completion {
        if seq != self.issued {
            return Completion::Stale;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.page = page;
                Completion::Applied
            }
            Err(err) => Completion::Failed(err),
        }
    }

    /// The latest fetch will never report back
    pub fn abandon(&mut self) {
        self.loading = false;
    }
}

impl<T: Clone> ListModel<T> {
    pub fn snapshot(&self, handled: u64) -> ListSnapshot<T> {
        ListSnapshot {
            query: self.query.clone(),
            raw_text: self.raw_text.clone(),
            page: self.page.clone(),
            loading: self.loading,
            refresh: self.refresh,
            handled,
            bus_seen: 0,
        }
    }
}

/// What the view renders
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub query: ListQuery,
    pub raw_text: String,
    pub page: Page<T>,
    pub loading: bool,
    pub refresh: RefreshToken,
    /// Commands handled by the coordinator task so far
    pub handled: u64,
    /// Sequence number of the last refresh bus request handled
    pub bus_seen: u64,
}

impl<T> ListSnapshot<T> {
    pub fn total_pages(&self) -> u32 {
        self.page.total_pages(self.query.limit)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.query.page,
            self.query.limit.get(),
            self.page.count,
            self.loading,
        )
    }

    /// No fetch in flight and no typed text waiting for the debounce window
    pub fn is_settled(&self) -> bool {
        !self.loading && self.raw_text == self.query.free_text
    }
}

/// Requests accepted by a running coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GoToPage(i64),
    NextPage,
    PreviousPage,
    SetLimit(PageSize),
    SetOrder(OrderDirection),
    SetStockFilter(StockFilter),
    SetText(String),
    SelectParent(ParentRef),
    ClearParent,
    Refresh,
}

/// Coordinator setup
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    pub kind: EntityKind,
    pub query: ListQuery,
    pub debounce: Duration,
    /// Re-fetch when the refresh bus carries this coordinator's kind
    pub follow_bus: bool,
}

impl CoordinatorOptions {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            query: ListQuery::default(),
            debounce: Duration::from_millis(500),
            follow_bus: true,
        }
    }

    pub fn with_query(mut self, query: ListQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

type FetchResult<T> = (u64, ConsoleResult<Page<T>>);

struct Worker<T> {
    kind: EntityKind,
    model: ListModel<T>,
    source: Arc<dyn ListSource<T>>,
    fetches: JoinSet<FetchResult<T>>,
    debouncer: Debouncer<String>,
    context: ConsoleContext,
    snapshots: watch::Sender<ListSnapshot<T>>,
    handled: u64,
    bus_seen: u64,
}

impl<T: Clone + Send + Sync + 'static> Worker<T> {
    fn dispatch(&mut self, ticket: Option<FetchTicket>) {
        let Some(ticket) = ticket else {
            return;
        };
        tracing::debug!(kind = %self.kind, seq = ticket.seq, page = ticket.query.page, "list fetch");
        let source = Arc::clone(&self.source);
        self.fetches.spawn(async move {
            let result = source.list_page(&ticket.query).await;
            (ticket.seq, result)
        });
    }

    fn publish(&self) {
        let mut snapshot = self.model.snapshot(self.handled);
        snapshot.bus_seen = self.bus_seen;
        self.snapshots.send_replace(snapshot);
    }

    fn handle(&mut self, command: Command) {
        let ticket = match command {
            Command::GoToPage(page) => self.model.go_to_page(page),
            Command::NextPage => self.model.next_page(),
            Command::PreviousPage => self.model.previous_page(),
            Command::SetLimit(limit) => self.model.set_limit(limit),
            Command::SetOrder(order) => self.model.set_order(order),
            Command::SetStockFilter(filter) => self.model.set_stock_filter(filter),
            Command::SetText(text) => {
                if let Some(text) = self.model.set_text(&text) {
                    self.debouncer.push(text);
                }
                None
            }
            Command::SelectParent(parent) => self.model.select_parent(parent),
            Command::ClearParent => self.model.clear_parent(),
            Command::Refresh => Some(self.model.refresh()),
        };
        self.handled += 1;
        self.dispatch(ticket);
        self.publish();
    }

    fn apply_text(&mut self, text: String) {
        let ticket = self.model.apply_settled_text(&text);
        self.dispatch(ticket);
        self.publish();
    }

    fn refresh(&mut self, bus_seen: u64) {
        self.bus_seen = bus_seen;
        let ticket = self.model.refresh();
        self.dispatch(Some(ticket));
        self.publish();
    }

    fn finish(&mut self, joined: Result<FetchResult<T>, JoinError>) {
        match joined {
            Ok((seq, result)) => {
                if let Completion::Failed(err) = self.model.complete(seq, result) {
                    self.context.logger.error(
                        LOG_CONTEXT,
                        format!("{} list request {} failed: {}", self.kind, seq, err),
                    );
                    self.context
                        .notifier
                        .error(&err.user_message(self.context.language));
                }
            }
            Err(err) => {
                self.context
                    .logger
                    .error(LOG_CONTEXT, format!("{} list task failed: {}", self.kind, err));
            }
        }
        if self.fetches.is_empty() {
            self.model.abandon();
        }
        self.publish();
    }
}

async fn next_refresh(subscription: &mut Option<RefreshSubscription>) -> Option<RefreshRequested> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

async fn run<T: Clone + Send + Sync + 'static>(
    mut worker: Worker<T>,
    first: FetchTicket,
    mut commands: mpsc::UnboundedReceiver<Command>,
    mut settled_text: mpsc::UnboundedReceiver<String>,
    mut refresh: Option<RefreshSubscription>,
) {
    worker.dispatch(Some(first));

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => worker.handle(command),
                None => break,
            },
            Some(text) = settled_text.recv() => worker.apply_text(text),
            event = next_refresh(&mut refresh) => match event {
                Some(_) => {
                    let seen = refresh.as_ref().map_or(0, RefreshSubscription::seen);
                    worker.refresh(seen);
                }
                None => refresh = None,
            },
            Some(joined) = worker.fetches.join_next() => worker.finish(joined),
        }
    }
}

/// Handle to a coordinator task. Dropping it stops the task, the pending
/// debounce and every fetch in flight.
#[derive(Debug)]
pub struct ListCoordinator<T> {
    kind: EntityKind,
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<ListSnapshot<T>>,
    sent: AtomicU64,
    bus: Option<RefreshBus>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> ListCoordinator<T> {
    /// Start the task and issue the initial fetch. Must be called inside a
    /// tokio runtime.
    pub fn spawn(
        source: Arc<dyn ListSource<T>>,
        options: CoordinatorOptions,
        context: ConsoleContext,
    ) -> Self {
        let mut model = ListModel::new(options.query);
        let first = model.start();
        let refresh = options
            .follow_bus
            .then(|| context.bus.subscribe(options.kind));
        let bus_seen = refresh.as_ref().map_or(0, RefreshSubscription::seen);
        let mut initial = model.snapshot(0);
        initial.bus_seen = bus_seen;
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (debouncer, settled_text) = Debouncer::channel(options.debounce);
        let bus = options.follow_bus.then(|| context.bus.clone());

        let worker = Worker {
            kind: options.kind,
            model,
            source,
            fetches: JoinSet::new(),
            debouncer,
            context,
            snapshots: snapshot_tx,
            handled: 0,
            bus_seen,
        };
        let task = tokio::spawn(run(worker, first, command_rx, settled_text, refresh));

        Self {
            kind: options.kind,
            commands: command_tx,
            snapshots: snapshot_rx,
            sent: AtomicU64::new(0),
            bus,
            task,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn send(&self, command: Command) {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if self.commands.send(command).is_err() {
            tracing::warn!(kind = %self.kind, "list coordinator is no longer running");
        }
    }

    pub fn go_to_page(&self, page: i64) {
        self.send(Command::GoToPage(page));
    }

    pub fn next_page(&self) {
        self.send(Command::NextPage);
    }

    pub fn previous_page(&self) {
        self.send(Command::PreviousPage);
    }

    pub fn set_limit(&self, limit: PageSize) {
        self.send(Command::SetLimit(limit));
    }

    pub fn set_order(&self, order: OrderDirection) {
        self.send(Command::SetOrder(order));
    }

    pub fn set_stock_filter(&self, filter: StockFilter) {
        self.send(Command::SetStockFilter(filter));
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.send(Command::SetText(text.into()));
    }

    pub fn select_parent(&self, parent: ParentRef) {
        self.send(Command::SelectParent(parent));
    }

    pub fn clear_parent(&self) {
        self.send(Command::ClearParent);
    }

    pub fn refresh(&self) {
        self.send(Command::Refresh);
    }

    /// Latest published state
    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<T>> {
        self.snapshots.clone()
    }

    /// Wait until every command sent so far and every refresh published on
    /// the bus for this kind is handled, the debounce window has passed and
    /// no fetch is in flight
    pub async fn settled(&self) -> ConsoleResult<ListSnapshot<T>> {
        let sent = self.sent.load(Ordering::SeqCst);
        let published = self.bus.as_ref().map_or(0, |bus| bus.published(self.kind));
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|s| s.handled >= sent && s.bus_seen >= published && s.is_settled())
            .await
            .map_err(|_| ConsoleError::Internal(format!("{} list coordinator stopped", self.kind)))?;
        Ok(snapshot.clone())
    }
}

impl<T> Drop for ListCoordinator<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
