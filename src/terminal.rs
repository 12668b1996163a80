//! Line-oriented terminal front end
//!
//! Reads commands from stdin and redraws the results area whenever the
//! fetch status changes. Fetches run in the background, so filters can be
//! edited while a request is still in flight.

use crate::commands::{companies, filters, stocks};
use crate::error::{AppError, ErrorResponse, Result};
use crate::state::AppState;
use crate::view::detail::DetailView;
use crate::view::format::format_decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub const TITLE: &str = "S&P 500 Stock Screener";

const HELP: &str = "\
Commands:
  set <field> <value>        set a filter bound, e.g. set rsi14_from 30
  clear <field>              clear one filter bound
  reset                      clear all filters
  filters                    show filter fields
  refresh                    re-run the current query
  show [n]                   show the results table, optionally at page n
  page <n>                   go to page n
  page-size <25|50|100>      rows per page
  sort <column> [asc|desc]   sort by symbol, date, close, williams, ema, rsi14, rsi21
  unsort                     back to backend order
  open <id|SYMBOL|SYM@DATE>  show the detail view for a row
  close                      close the detail view
  export [path]              save all rows as CSV
  companies [text]           list S&P 500 companies
  symbol <SYMBOL>            fetch data for one symbol
  help                       this text
  quit                       exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    Set { field: String, value: String },
    Clear { field: String },
    Reset,
    Filters,
    Refresh,
    Show(Option<usize>),
    Page(usize),
    PageSize(usize),
    Sort { column: String, direction: Option<String> },
    Unsort,
    Open(String),
    Close,
    Export(Option<PathBuf>),
    Companies(Option<String>),
    Symbol(String),
    Help,
    Quit,
}

impl FromStr for InputCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| AppError::Validation("Empty command".to_string()))?
            .to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let arg = |i: usize, what: &str| -> Result<String> {
            args.get(i)
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::Validation(format!("{} requires {}", verb, what)))
        };
        let number = |i: usize, what: &str| -> Result<usize> {
            arg(i, what)?
                .parse()
                .map_err(|_| AppError::Validation(format!("{} must be a whole number", what)))
        };

        let command = match verb.as_str() {
            "set" => InputCommand::Set {
                field: arg(0, "a field name")?,
                value: args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default(),
            },
            "clear" => InputCommand::Clear {
                field: arg(0, "a field name")?,
            },
            "reset" => InputCommand::Reset,
            "filters" => InputCommand::Filters,
            "refresh" => InputCommand::Refresh,
            "show" | "table" => InputCommand::Show(match args.first() {
                Some(_) => Some(number(0, "page")?),
                None => None,
            }),
            "page" => InputCommand::Page(number(0, "page")?),
            "page-size" => InputCommand::PageSize(number(0, "page size")?),
            "sort" => InputCommand::Sort {
                column: arg(0, "a column")?,
                direction: args.get(1).map(|s| s.to_string()),
            },
            "unsort" => InputCommand::Unsort,
            "open" => InputCommand::Open(arg(0, "a row id or symbol")?),
            "close" => InputCommand::Close,
            "export" => InputCommand::Export(args.first().map(PathBuf::from)),
            "companies" => InputCommand::Companies(if args.is_empty() {
                None
            } else {
                Some(args.join(" "))
            }),
            "symbol" => InputCommand::Symbol(arg(0, "a symbol")?),
            "help" | "?" => InputCommand::Help,
            "quit" | "exit" | "q" => InputCommand::Quit,
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown command '{}', type help for a list",
                    other
                )))
            }
        };

        Ok(command)
    }
}

/// Run the interactive loop until stdin closes or the user quits
pub async fn run_terminal(state: Arc<AppState>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut changes = state.screener.subscribe();

    println!("{}", TITLE);
    println!("API: {}  (type help for commands)", state.config.api_base_url);

    // initial load with empty filters
    state.refresh();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                if !handle_line(&state, &line).await {
                    break;
                }
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", stocks::get_results(&state));
            }
        }
    }

    tracing::info!("Terminal session closed");
    Ok(())
}

/// Execute one input line. Returns false when the session should end.
pub async fn handle_line(state: &AppState, line: &str) -> bool {
    let command = match line.parse::<InputCommand>() {
        Ok(command) => command,
        Err(e) => {
            print_error(e);
            return true;
        }
    };

    if command == InputCommand::Quit {
        return false;
    }

    match execute(state, command).await {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => print_error(e),
    }
    true
}

/// Execute a command, returning text to show (if any)
pub async fn execute(state: &AppState, command: InputCommand) -> Result<Option<String>> {
    let output = match command {
        InputCommand::Set { field, value } => {
            filters::set_filter(state, &field, &value)?;
            None
        }
        InputCommand::Clear { field } => {
            filters::clear_filter(state, &field)?;
            None
        }
        InputCommand::Reset => {
            filters::reset_filters(state);
            None
        }
        InputCommand::Filters => Some(render_filters(state)),
        InputCommand::Refresh => {
            stocks::refresh_stock_data(state);
            None
        }
        InputCommand::Show(page) => {
            if let Some(page) = page {
                stocks::set_page(state, page);
            }
            Some(stocks::get_results(state))
        }
        InputCommand::Page(page) => {
            stocks::set_page(state, page);
            Some(stocks::get_results(state))
        }
        InputCommand::PageSize(size) => {
            stocks::set_page_size(state, size)?;
            Some(stocks::get_results(state))
        }
        InputCommand::Sort { column, direction } => {
            stocks::sort_by(state, &column, direction.as_deref())?;
            Some(stocks::get_results(state))
        }
        InputCommand::Unsort => {
            stocks::clear_sort(state);
            Some(stocks::get_results(state))
        }
        InputCommand::Open(target) => Some(stocks::open_detail(state, &target)?),
        InputCommand::Close => {
            stocks::close_detail(state);
            None
        }
        InputCommand::Export(path) => {
            let response = stocks::export_csv(state, path)?;
            Some(format!(
                "Exported {} rows to {}",
                response.rows_exported,
                response.path.display()
            ))
        }
        InputCommand::Companies(filter) => {
            let result = companies::get_sp500_companies(state, filter.as_deref()).await?;
            let mut out = format!("{} of {} companies", result.companies.len(), result.total);
            for company in &result.companies {
                out.push_str(&format!(
                    "\n  {:<6} {:<40} {}",
                    company.symbol,
                    company.name.as_deref().unwrap_or("-"),
                    company.sector.as_deref().unwrap_or("-")
                ));
            }
            Some(out)
        }
        InputCommand::Symbol(symbol) => {
            let result = companies::get_symbol_data(state, &symbol).await?;
            match result.row {
                Some(row) => Some(DetailView::new(row).render()),
                None => Some(serde_json::to_string_pretty(&result.payload)?),
            }
        }
        InputCommand::Help => Some(HELP.to_string()),
        InputCommand::Quit => None,
    };

    Ok(output)
}

fn render_filters(state: &AppState) -> String {
    filters::get_filters(state)
        .into_iter()
        .map(|f| {
            let value = match f.value {
                Some(_) => format_decimal(f.value),
                None => "-".to_string(),
            };
            format!(
                "  {:<18} {:<26} {:>10}   range {} to {}",
                f.field, f.label, value, f.advisory_min, f.advisory_max
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_error(err: AppError) {
    let response = ErrorResponse::from(err);
    tracing::debug!("Command failed: {}", response.code);
    println!("Error: {}", response.message);
}
