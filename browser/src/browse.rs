//! Line-oriented terminal browser for `browser browse`.
//!
//! Reads one command per line, drives a [`BrowseSession`] against a
//! [`DataSource`], and re-renders the page after every command.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use tracing::debug;

use crate::core::pagination::is_offered_page_size;
use crate::core::types::{Artwork, RecordId};
use crate::io::source::DataSource;
use crate::session::{BrowseSession, FetchOutcome, FetchTicket};

const HELP: &str = "\
commands:
  next | prev        move one page
  page N             go to page N
  rows N             change rows per page
  check ID...        set the checked rows on this page (others are unchecked)
  toggle ID          flip one row
  first N            check the first N rows on this page
  clear              uncheck every row on this page
  show               print the page again
  selected           list selected ids
  retry              fetch the current page again
  help | quit";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Page(u32),
    Rows(u32),
    Check(BTreeSet<RecordId>),
    Toggle(RecordId),
    First(i64),
    Clear,
    Show,
    Selected,
    Retry,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("next" | "n", []) => BrowseCommand::Next,
        ("prev" | "p", []) => BrowseCommand::Prev,
        ("page", [n]) => BrowseCommand::Page(parse_arg(n, "page")?),
        ("rows", [n]) => BrowseCommand::Rows(parse_arg(n, "rows")?),
        ("check", ids) => BrowseCommand::Check(
            ids.iter()
                .map(|id| parse_arg::<u64>(id, "id").map(RecordId))
                .collect::<Result<_>>()?,
        ),
        ("toggle" | "t", [id]) => BrowseCommand::Toggle(RecordId(parse_arg(id, "id")?)),
        ("first", [n]) => BrowseCommand::First(parse_arg(n, "count")?),
        ("clear", []) => BrowseCommand::Clear,
        ("show", []) => BrowseCommand::Show,
        ("selected", []) => BrowseCommand::Selected,
        ("retry", []) => BrowseCommand::Retry,
        ("help" | "?", []) => BrowseCommand::Help,
        ("quit" | "exit" | "q", []) => BrowseCommand::Quit,
        (other, _) => bail!("unrecognized command `{other}` (type `help`)"),
    };
    Ok(Some(command))
}

fn parse_arg<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse().map_err(|_| anyhow!("invalid {what}: `{raw}`"))
}

/// Interactive loop state: the session plus the source it loads from.
pub struct Browser<'a, S: DataSource> {
    session: BrowseSession,
    source: &'a S,
    rows_per_page_options: Vec<u32>,
}

impl<'a, S: DataSource> Browser<'a, S> {
    pub fn new(session: BrowseSession, source: &'a S, rows_per_page_options: Vec<u32>) -> Self {
        Self {
            session,
            source,
            rows_per_page_options,
        }
    }

    pub fn session(&self) -> &BrowseSession {
        &self.session
    }

    /// Load the session's current page, render it, then process commands
    /// until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        let ticket = self.session.refresh();
        self.load(ticket, out)?;
        render_page(&self.session, out)?;

        for line in input.lines() {
            let line = line.context("read command")?;
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            };
            if command == BrowseCommand::Quit {
                break;
            }
            self.execute(command, out)?;
        }
        Ok(())
    }

    /// Apply one command and print its result.
    pub fn execute<W: Write>(&mut self, command: BrowseCommand, out: &mut W) -> Result<()> {
        debug!(?command, "execute");
        match command {
            BrowseCommand::Next => {
                let ticket = self.session.next_page();
                self.load_and_render(ticket, out)?;
            }
            BrowseCommand::Prev => {
                let ticket = self.session.prev_page();
                self.load_and_render(ticket, out)?;
            }
            BrowseCommand::Page(page) => {
                let ticket = self.session.go_to_page(page);
                self.load_and_render(ticket, out)?;
            }
            BrowseCommand::Rows(rows) => {
                if !is_offered_page_size(rows, &self.rows_per_page_options) {
                    writeln!(
                        out,
                        "rows per page must be one of {:?}",
                        self.rows_per_page_options
                    )?;
                    return Ok(());
                }
                let ticket = self.session.set_rows_per_page(rows);
                self.load_and_render(ticket, out)?;
            }
            BrowseCommand::Check(ids) => {
                self.session.set_checked(&ids);
                render_page(&self.session, out)?;
            }
            BrowseCommand::Toggle(id) => {
                if self.session.toggle(id) {
                    render_page(&self.session, out)?;
                } else {
                    writeln!(out, "id {id} is not on this page")?;
                }
            }
            BrowseCommand::First(n) => {
                let max = self.session.rows().len();
                if max == 0 {
                    writeln!(out, "No rows available on this page.")?;
                    return Ok(());
                }
                self.session.select_input_mut().set(Some(n));
                self.session.apply_select_input();
                render_page(&self.session, out)?;
            }
            BrowseCommand::Clear => {
                self.session.clear_page();
                render_page(&self.session, out)?;
            }
            BrowseCommand::Show => render_page(&self.session, out)?,
            BrowseCommand::Selected => {
                let ids = self.session.selection().effective_selected_ids();
                let listed: Vec<String> = ids.iter().map(RecordId::to_string).collect();
                writeln!(out, "Selected: {} rows", ids.len())?;
                if !listed.is_empty() {
                    writeln!(out, "{}", listed.join(" "))?;
                }
            }
            BrowseCommand::Retry => {
                let ticket = self.session.refresh();
                self.load_and_render(ticket, out)?;
            }
            BrowseCommand::Help => writeln!(out, "{HELP}")?,
            BrowseCommand::Quit => {}
        }
        Ok(())
    }

    fn load_and_render<W: Write>(&mut self, ticket: FetchTicket, out: &mut W) -> Result<()> {
        self.load(ticket, out)?;
        render_page(&self.session, out)
    }

    fn load<W: Write>(&mut self, ticket: FetchTicket, out: &mut W) -> Result<FetchOutcome> {
        let result = self.source.fetch_page(&ticket.window);
        let outcome = self.session.complete_fetch(ticket, result);
        if let FetchOutcome::Failed(err) = &outcome {
            let hint = if err.is_retryable() {
                " (type `retry` to try again)"
            } else {
                ""
            };
            writeln!(out, "error: {}{hint}", err.user_message())?;
        }
        Ok(outcome)
    }
}

/// Print the selected count, one line per row, and the row range.
pub fn render_page<W: Write>(session: &BrowseSession, out: &mut W) -> Result<()> {
    let window = session.window();
    writeln!(
        out,
        "Selected: {} rows | page {} | {} per page",
        session.effective_selected_count(),
        window.page(),
        window.rows_per_page()
    )?;
    if session.rows().is_empty() {
        writeln!(out, "No artworks found.")?;
    }
    for row in session.rows() {
        let mark = if session.is_row_checked(row.id) {
            "[x]"
        } else {
            "[ ]"
        };
        writeln!(out, "{mark} {}", format_row(row))?;
    }
    writeln!(out, "{}", session.report_text())?;
    Ok(())
}

fn format_row(row: &Artwork) -> String {
    let text = |value: &Option<String>| -> String {
        value
            .as_deref()
            .map(|v| v.replace('\n', " "))
            .unwrap_or_else(|| "-".to_string())
    };
    let year = |value: Option<i64>| value.map_or_else(|| "-".to_string(), |y| y.to_string());
    format!(
        "{:>8}  {} | {} | {} | {}..{}",
        row.id,
        text(&row.title),
        text(&row.place_of_origin),
        text(&row.artist_display),
        year(row.date_start),
        year(row.date_end)
    )
}
