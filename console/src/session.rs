//! Terminal lot browser
//!
//! Drives a batch list from standard input. Every plain line is a scanner
//! "Enter" on the parent's code; lines starting with `:` are commands.
//! A code shared by several parents, or `:search`, opens a pick list that
//! takes codes and row numbers until a row is picked or an empty line
//! closes it. The table is printed each time the list settles.

use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use shared::{capitalize, Entity, EntityId, OrderDirection, PageSize, StockFilter};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::context::ConsoleContext;
use crate::coordinator::{ListCoordinator, ListSnapshot};
use crate::picker::PickModal;
use crate::remote::{ExactLookup, Mutations};
use crate::scan::{placeholder, ScanField, ScanOutcome, ENTER_KEY_CODE};
use crate::table::{project, RowActions, TableRow, TableView};

pub const HELP: &str = "\
commands:
  <code>            scan a code (Enter)
  :next / :prev     change page
  :page N           jump to page N
  :limit 10|25|50   rows per page
  :order asc|desc   sort by entry date
  :stock in|empty   lots with stock or depleted lots
  :find TEXT        free-text filter
  :clear            drop the scanned parent
  :search           look a parent up and pick it from a list
  :delete ID        delete a lot (asks first)
  :refresh          reload
  :quit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command} needs {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

/// One line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Scan(String),
    Next,
    Previous,
    /// One-based page number as typed
    Page(u32),
    Limit(PageSize),
    Order(OrderDirection),
    Stock(StockFilter),
    Find(String),
    Clear,
    /// Open the search-and-pick list for the parent
    Search,
    Delete(EntityId),
    Refresh,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Ok(SessionCommand::Scan(line.to_string()));
        };
        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command, ""),
        };

        match name.to_lowercase().as_str() {
            "next" | "n" => Ok(SessionCommand::Next),
            "prev" | "p" => Ok(SessionCommand::Previous),
            "page" => argument
                .parse::<u32>()
                .ok()
                .filter(|page| *page > 0)
                .map(SessionCommand::Page)
                .ok_or(CommandError::BadArgument {
                    command: ":page",
                    expected: "a page number starting at 1",
                }),
            "limit" => argument
                .parse::<u32>()
                .ok()
                .and_then(|limit| PageSize::try_from(limit).ok())
                .map(SessionCommand::Limit)
                .ok_or(CommandError::BadArgument {
                    command: ":limit",
                    expected: "10, 25 or 50",
                }),
            "order" => match argument.to_lowercase().as_str() {
                "asc" => Ok(SessionCommand::Order(OrderDirection::Asc)),
                "desc" => Ok(SessionCommand::Order(OrderDirection::Desc)),
                _ => Err(CommandError::BadArgument {
                    command: ":order",
                    expected: "asc or desc",
                }),
            },
            "stock" => match argument.to_lowercase().as_str() {
                "in" | "instock" => Ok(SessionCommand::Stock(StockFilter::InStock)),
                "empty" => Ok(SessionCommand::Stock(StockFilter::Empty)),
                _ => Err(CommandError::BadArgument {
                    command: ":stock",
                    expected: "in or empty",
                }),
            },
            "find" => Ok(SessionCommand::Find(argument.to_string())),
            "clear" => Ok(SessionCommand::Clear),
            "search" | "s" => Ok(SessionCommand::Search),
            "delete" => argument
                .parse::<i64>()
                .map(|id| SessionCommand::Delete(EntityId(id)))
                .map_err(|_| CommandError::BadArgument {
                    command: ":delete",
                    expected: "a lot id",
                }),
            "refresh" | "r" => Ok(SessionCommand::Refresh),
            "help" | "h" | "?" => Ok(SessionCommand::Help),
            "quit" | "q" | "exit" => Ok(SessionCommand::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}

/// What a line typed while the pick list is open means
#[derive(Debug, Clone, PartialEq, Eq)]
enum PickLine {
    Close,
    /// One-based row number
    Pick(usize),
    Search(String),
}

impl PickLine {
    /// A number is a pick only when such a row is listed; otherwise it is
    /// a code, since barcodes are digits too
    fn parse(line: &str, rows: usize) -> Self {
        let line = line.trim();
        if line.is_empty() || line == ":close" {
            return PickLine::Close;
        }
        match line.parse::<usize>() {
            Ok(row) if (1..=rows).contains(&row) => PickLine::Pick(row),
            _ => PickLine::Search(line.to_string()),
        }
    }
}

/// Batch list of one kind, scoped by scanning or picking its parent
pub struct LotBrowser<P, B, M> {
    coordinator: ListCoordinator<B>,
    scan: ScanField<P>,
    picker: PickModal<P>,
    actions: RowActions<B, M>,
    context: ConsoleContext,
}

impl<P, B, M> LotBrowser<P, B, M>
where
    P: Entity + Clone + Send + 'static,
    B: TableRow + Clone + Send + Sync + 'static,
    M: Mutations<B>,
{
    pub fn new(
        coordinator: ListCoordinator<B>,
        lookup: Arc<dyn ExactLookup<P>>,
        mutations: Arc<M>,
        context: ConsoleContext,
    ) -> Self {
        Self {
            coordinator,
            scan: ScanField::new(Arc::clone(&lookup), context.clone()),
            picker: PickModal::new(lookup, context.clone()),
            actions: RowActions::new(mutations, context.clone()),
            context,
        }
    }

    pub fn coordinator(&self) -> &ListCoordinator<B> {
        &self.coordinator
    }

    pub fn picker(&self) -> &PickModal<P> {
        &self.picker
    }

    /// Read commands until `:quit` or end of input
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        self.render(out).await?;

        while let Some(line) = lines.next_line().await? {
            if self.actions.confirmation().is_visible() {
                if is_yes(&line) {
                    if let Some(Err(err)) = self.actions.accept().await {
                        writeln!(out, "{}", err.user_message(self.context.language))?;
                    }
                } else {
                    self.actions.decline();
                }
                self.render(out).await?;
                continue;
            }

            if self.picker.is_visible() {
                let answer = PickLine::parse(&line, self.picker.results().len());
                self.pick_line(answer, out).await?;
                continue;
            }

            let command = match line.parse::<SessionCommand>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(out, "{}", err)?;
                    continue;
                }
            };
            if !self.execute(command, out).await? {
                break;
            }
        }
        Ok(())
    }

    /// Apply one command. `false` ends the session.
    pub async fn execute<W: Write>(
        &mut self,
        command: SessionCommand,
        out: &mut W,
    ) -> std::io::Result<bool> {
        match command {
            SessionCommand::Scan(code) => {
                self.scan.set_value(code);
                match self.scan.on_key(ENTER_KEY_CODE).await {
                    Some(ScanOutcome::Selected(parent)) => {
                        self.coordinator.select_parent(parent.as_parent());
                    }
                    Some(ScanOutcome::Ambiguous(candidates)) => {
                        self.picker.open_with(candidates);
                        return self.write_candidates(out).map(|_| true);
                    }
                    Some(ScanOutcome::Failed(err)) => {
                        writeln!(out, "{}", err.user_message(self.context.language))?;
                    }
                    Some(ScanOutcome::NotFound)
                    | Some(ScanOutcome::Skipped)
                    | None => {}
                }
            }
            SessionCommand::Next => self.coordinator.next_page(),
            SessionCommand::Previous => self.coordinator.previous_page(),
            SessionCommand::Page(page) => self.coordinator.go_to_page(i64::from(page) - 1),
            SessionCommand::Limit(limit) => self.coordinator.set_limit(limit),
            SessionCommand::Order(order) => self.coordinator.set_order(order),
            SessionCommand::Stock(filter) => self.coordinator.set_stock_filter(filter),
            SessionCommand::Find(text) => self.coordinator.set_text(text),
            SessionCommand::Clear => self.coordinator.clear_parent(),
            SessionCommand::Search => {
                self.picker.open();
                self.write_candidates(out)?;
                return Ok(true);
            }
            SessionCommand::Delete(id) => {
                self.actions.request_delete_id(id);
                writeln!(out, "{} [y/N]", self.actions.confirmation().message())?;
                return Ok(true);
            }
            SessionCommand::Refresh => self.coordinator.refresh(),
            SessionCommand::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(true);
            }
            SessionCommand::Quit => return Ok(false),
        }
        self.render(out).await?;
        Ok(true)
    }

    async fn pick_line<W: Write>(&mut self, line: PickLine, out: &mut W) -> std::io::Result<()> {
        match line {
            PickLine::Close => {
                self.picker.close();
                self.render(out).await
            }
            PickLine::Pick(row) => {
                let coordinator = &self.coordinator;
                let picked = self
                    .picker
                    .pick(row - 1, |parent| coordinator.select_parent(parent.as_parent()));
                if picked {
                    self.render(out).await
                } else {
                    writeln!(out, "no row {}", row)?;
                    self.write_candidates(out)
                }
            }
            PickLine::Search(code) => {
                self.picker.set_query(code);
                self.picker.on_key(ENTER_KEY_CODE).await;
                self.write_candidates(out)
            }
        }
    }

    /// Print the pick list and how to answer it
    fn write_candidates<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for (index, candidate) in self.picker.results().iter().enumerate() {
            writeln!(out, "  {}. {}", index + 1, capitalize(&candidate.display_name()))?;
        }
        writeln!(out, "search: type a code, a row number to pick, or an empty line to close")
    }

    async fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let snapshot = match self.coordinator.settled().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                return writeln!(out, "{}", err.user_message(self.context.language));
            }
        };
        write_snapshot(out, &snapshot, &self.context)
    }
}

/// Print the scan placeholder, the table and the page footer
pub fn write_snapshot<T: TableRow, W: Write>(
    out: &mut W,
    snapshot: &ListSnapshot<T>,
    context: &ConsoleContext,
) -> std::io::Result<()> {
    writeln!(
        out,
        "[{}]",
        placeholder(snapshot.query.parent.as_ref(), context.language)
    )?;

    match project(&snapshot.page.rows, snapshot.loading, context) {
        TableView::Loading => writeln!(out, "...")?,
        TableView::Empty(message) => writeln!(out, "{}", message)?,
        TableView::Rows { columns, rows } => {
            let header: Vec<&str> = columns.iter().map(|c| c.label).collect();
            writeln!(out, "{}", header.join(" | "))?;
            for row in rows {
                writeln!(out, "{}", row.cells.join(" | "))?;
            }
        }
    }

    let pagination = snapshot.pagination();
    if pagination.total_pages > 0 {
        writeln!(
            out,
            "page {}/{} ({} rows)",
            pagination.page + 1,
            pagination.total_pages,
            snapshot.page.count
        )?;
    }
    Ok(())
}
