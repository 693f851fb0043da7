use super::report::{ReportSummary, build_report};
use crate::error::{Result, TrackerError};
use crate::models::date_range::DateRange;
use clap::ValueEnum;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::io;

/// What the dashboard shows, ready for a chart widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    /// Category names as quoted literals, comma separated: `'Food','Rent'`.
    pub chart_labels: String,
    /// Expense totals in the same order as `chart_labels`.
    pub chart_values: String,
    pub categories: Vec<ChartEntry>,
    /// Filter bounds echoed back as `yyyy-MM-dd`.
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartEntry {
    pub label: String,
    pub value: Decimal,
}

impl DashboardView {
    pub fn from_summary(summary: &ReportSummary, range: &DateRange) -> Self {
        let categories: Vec<ChartEntry> = summary
            .category_breakdown
            .iter()
            .map(|c| ChartEntry {
                label: c.category_name.clone(),
                value: c.total,
            })
            .collect();

        let chart_labels = categories
            .iter()
            .map(|c| format!("'{}'", c.label))
            .collect::<Vec<_>>()
            .join(",");
        let chart_values = categories
            .iter()
            .map(|c| c.value.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            total_income: summary.total_income,
            total_expense: summary.total_expense,
            balance: summary.balance,
            chart_labels,
            chart_values,
            categories,
            from_date: range.from_param(),
            to_date: range.to_param(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DashboardFormat {
    /// Plain text summary.
    Text,
    /// Chart data as JSON.
    Json,
    /// Interactive terminal bar chart.
    Chart,
}

pub fn run_dashboard(
    conn: &Connection,
    range: &DateRange,
    format: DashboardFormat,
) -> Result<()> {
    let summary = build_report(conn, range)?;
    let view = DashboardView::from_summary(&summary, range);

    match format {
        DashboardFormat::Text => println!("{}", render_text(&view)),
        DashboardFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        DashboardFormat::Chart => render_chart(&view)?,
    }
    Ok(())
}

pub fn render_text(view: &DashboardView) -> String {
    let mut lines = vec![
        format!("Period:        {}", period_label(view)),
        format!("Total income:  {:>12}", view.total_income),
        format!("Total expense: {:>12}", view.total_expense),
        format!("Balance:       {:>12}", view.balance),
        String::new(),
    ];
    if view.categories.is_empty() {
        lines.push("No expenses in this range".to_string());
    } else {
        lines.push("Expenses by category:".to_string());
        for entry in &view.categories {
            lines.push(format!("  {:15} {:>12}", entry.label, entry.value));
        }
    }
    lines.join("\n")
}

fn period_label(view: &DashboardView) -> String {
    match (&view.from_date, &view.to_date) {
        (None, None) => "all time".to_string(),
        (Some(from), None) => format!("from {}", from),
        (None, Some(to)) => format!("until {}", to),
        (Some(from), Some(to)) => format!("{} .. {}", from, to),
    }
}

fn render_chart(view: &DashboardView) -> Result<()> {
    enable_raw_mode().map_err(|e| terminal_error("Failed to enable raw mode", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| terminal_error("Failed to enter alternate screen", e))?;

    let result: Result<()> = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| terminal_error("Failed to initialize terminal", e))?;

        loop {
            terminal
                .draw(|frame| {
                    let layout = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(5), Constraint::Min(6)])
                        .split(frame.area());

                    render_totals(frame, layout[0], view);
                    render_category_bars(frame, layout[1], view);
                })
                .map_err(|e| terminal_error("Failed to draw terminal UI", e))?;

            if event::poll(std::time::Duration::from_millis(250))
                .map_err(|e| terminal_error("Failed to poll input", e))?
            {
                match event::read().map_err(|e| terminal_error("Failed to read input", e))? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        _ => {}
                    },
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| terminal_error("Failed to disable raw mode", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| terminal_error("Failed to leave alternate screen", e))?;

    result
}

fn render_totals(frame: &mut ratatui::Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .title(format!("Dashboard: {}  (press q to exit)", period_label(view)))
        .borders(Borders::ALL);

    let balance_color = if view.balance < Decimal::ZERO {
        Color::Red
    } else {
        Color::Green
    };
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled("Income   ", bold),
            Span::styled(
                format!("{:>12}", view.total_income),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("Expense  ", bold),
            Span::styled(
                format!("{:>12}", view.total_expense),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::from(vec![
            Span::styled("Balance  ", bold),
            Span::styled(
                format!("{:>12}", view.balance),
                Style::default().fg(balance_color),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_category_bars(frame: &mut ratatui::Frame, area: Rect, view: &DashboardView) {
    let block = Block::default()
        .title("Expenses by category")
        .borders(Borders::ALL);

    if view.categories.is_empty() {
        let empty = Paragraph::new("No expenses in this range")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let palette = [
        Color::Cyan,
        Color::Magenta,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Red,
    ];
    let bars: Vec<Bar> = view
        .categories
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            Bar::default()
                .value(bar_height(entry.value))
                .text_value(entry.value.to_string())
                .label(Line::from(entry.label.clone()))
                .style(Style::default().fg(palette[idx % palette.len()]))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2) as usize;
    let bar_width = (inner_width / view.categories.len().max(1))
        .saturating_sub(1)
        .clamp(3, 16) as u16;

    let chart = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

/// Bars are drawn from whole units; fractional cents only matter in the label.
fn bar_height(value: Decimal) -> u64 {
    value.round().to_u64().unwrap_or(0)
}

fn terminal_error(context: &str, err: io::Error) -> TrackerError {
    TrackerError::Terminal(format!("{}: {}", context, err))
}
