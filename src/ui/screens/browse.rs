use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use tokio::task::JoinHandle;
use unicode_width::UnicodeWidthStr;

use crate::app::state::{Action, AppState, LoadState, ViewMode};
use crate::booking::confirm_booking;
use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::offers::Offer;
use crate::ui::{layout::centered_rect, styles, TerminalGuard};

const LOAD_FAILED_MESSAGE: &str = "Failed to load skips.";
const CARD_WIDTH: u16 = 36;
const CARD_HEIGHT: u16 = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FilterField {
    OnRoad,
    HeavyWaste,
    Forbidden,
    MaxPrice,
    MinSize,
    MaxSize,
    HirePeriod,
    Postcode,
}

impl FilterField {
    const ALL: [FilterField; 8] = [
        FilterField::OnRoad,
        FilterField::HeavyWaste,
        FilterField::Forbidden,
        FilterField::MaxPrice,
        FilterField::MinSize,
        FilterField::MaxSize,
        FilterField::HirePeriod,
        FilterField::Postcode,
    ];

    fn label(self) -> &'static str {
        match self {
            FilterField::OnRoad => "On-road allowed",
            FilterField::HeavyWaste => "Heavy waste allowed",
            FilterField::Forbidden => "Forbidden only",
            FilterField::MaxPrice => "Max price (£)",
            FilterField::MinSize => "Min size (yd³)",
            FilterField::MaxSize => "Max size (yd³)",
            FilterField::HirePeriod => "Hire period (days)",
            FilterField::Postcode => "Postcode",
        }
    }

    fn is_toggle(self) -> bool {
        matches!(
            self,
            FilterField::OnRoad | FilterField::HeavyWaste | FilterField::Forbidden
        )
    }

    fn value_text(self, criteria: &FilterCriteria) -> String {
        fn bound(value: Option<u32>) -> String {
            value.map_or_else(|| "Any".to_string(), |v| v.to_string())
        }
        fn flag(active: bool) -> String {
            if active { "Yes" } else { "Any" }.to_string()
        }

        match self {
            FilterField::OnRoad => flag(criteria.on_road_only),
            FilterField::HeavyWaste => flag(criteria.heavy_waste_only),
            FilterField::Forbidden => flag(criteria.forbidden_only),
            FilterField::MaxPrice => bound(criteria.max_price),
            FilterField::MinSize => bound(criteria.min_size),
            FilterField::MaxSize => bound(criteria.max_size),
            FilterField::HirePeriod => bound(criteria.hire_period),
            FilterField::Postcode => {
                if criteria.postcode_fragment.is_empty() {
                    "Any".to_string()
                } else {
                    criteria.postcode_fragment.clone()
                }
            }
        }
    }

    fn toggle_action(self, criteria: &FilterCriteria) -> Option<Action> {
        match self {
            FilterField::OnRoad => Some(Action::SetOnRoadOnly(!criteria.on_road_only)),
            FilterField::HeavyWaste => Some(Action::SetHeavyWasteOnly(!criteria.heavy_waste_only)),
            FilterField::Forbidden => Some(Action::SetForbiddenOnly(!criteria.forbidden_only)),
            _ => None,
        }
    }

    /// Seed for the edit buffer when the user starts editing this field.
    fn edit_seed(self, criteria: &FilterCriteria) -> String {
        match self {
            FilterField::MaxPrice => seed_bound(criteria.max_price),
            FilterField::MinSize => seed_bound(criteria.min_size),
            FilterField::MaxSize => seed_bound(criteria.max_size),
            FilterField::HirePeriod => seed_bound(criteria.hire_period),
            FilterField::Postcode => criteria.postcode_fragment.clone(),
            _ => String::new(),
        }
    }

    /// Commit an edit buffer. Empty or unparsable numeric input clears the
    /// bound back to "Any" instead of erroring.
    fn commit_action(self, buffer: &str) -> Option<Action> {
        let parsed = buffer.trim().parse::<u32>().ok();
        match self {
            FilterField::MaxPrice => Some(Action::SetMaxPrice(parsed)),
            FilterField::MinSize => Some(Action::SetMinSize(parsed)),
            FilterField::MaxSize => Some(Action::SetMaxSize(parsed)),
            FilterField::HirePeriod => Some(Action::SetHirePeriod(parsed)),
            FilterField::Postcode => Some(Action::SetPostcodeFragment(buffer.trim().to_string())),
            _ => None,
        }
    }

    fn accepts_char(self, ch: char) -> bool {
        if self == FilterField::Postcode {
            ch.is_ascii_alphanumeric() || ch == ' '
        } else {
            ch.is_ascii_digit()
        }
    }
}

fn seed_bound(value: Option<u32>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

enum Overlay {
    None,
    Filters {
        cursor: usize,
        editing: Option<String>,
    },
    Confirm(String),
}

fn summarize_criteria(criteria: &FilterCriteria) -> String {
    if criteria.is_default() {
        return "Filters: none — press f to filter".to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    if criteria.on_road_only {
        parts.push("on-road".to_string());
    }
    if criteria.heavy_waste_only {
        parts.push("heavy waste".to_string());
    }
    if criteria.forbidden_only {
        parts.push("forbidden".to_string());
    }
    if let Some(price) = criteria.max_price {
        parts.push(format!("≤ £{price}"));
    }
    match (criteria.min_size, criteria.max_size) {
        (Some(min), Some(max)) => parts.push(format!("{min}–{max} yd³")),
        (Some(min), None) => parts.push(format!("≥ {min} yd³")),
        (None, Some(max)) => parts.push(format!("≤ {max} yd³")),
        (None, None) => {}
    }
    if let Some(days) = criteria.hire_period {
        parts.push(format!("{days} day hire"));
    }
    if !criteria.postcode_fragment.is_empty() {
        parts.push(format!("postcode '{}'", criteria.postcode_fragment));
    }

    format!("Filters: {}", parts.join(" • "))
}

/// The single page of the application. Starts on the loading indicator, then
/// shows either the failure line or the filterable offer list with the
/// selection bar, matching the page flow of the source site.
pub async fn run_browse_screen(
    mut state: AppState,
    load_task: JoinHandle<Result<Vec<Offer>>>,
) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    let mut load_task = Some(load_task);
    let mut fetched_at: Option<DateTime<Local>> = None;

    let mut cursor: usize = 0;
    let mut offset: usize = 0;
    let mut overlay = Overlay::None;

    loop {
        // Resolve the one-shot fetch once it lands. Quitting earlier drops the
        // handle instead, so a late result never touches the state.
        if load_task.as_ref().is_some_and(|task| task.is_finished()) {
            let task = load_task.take().expect("task presence checked above");
            let action = match task.await {
                Ok(Ok(offers)) => {
                    fetched_at = Some(Local::now());
                    Action::LoadSucceeded(offers)
                }
                Ok(Err(err)) => {
                    log::warn!("offer fetch failed: {}", err);
                    Action::LoadFailed(LOAD_FAILED_MESSAGE.to_string())
                }
                Err(err) => {
                    log::warn!("offer fetch task aborted: {}", err);
                    Action::LoadFailed(LOAD_FAILED_MESSAGE.to_string())
                }
            };
            state = state.apply(action);
        }

        // Derived view, recomputed every frame rather than cached.
        let visible: Vec<Offer> = state
            .visible_offers()
            .into_iter()
            .cloned()
            .collect();
        let total = visible.len();
        if cursor >= total {
            cursor = total.saturating_sub(1);
        }

        let mut capacity: usize = 1;
        let mut columns: usize = 1;

        guard.terminal_mut().draw(|f| {
            let size = f.size();
            let selected_offer = state.selected_offer();
            let footer_height = if selected_offer.is_some() { 2 } else { 1 };

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(2),
                    Constraint::Min(3),
                    Constraint::Length(footer_height),
                ])
                .split(size);

            draw_header(f, chunks[0], &state, total);

            match &state.load {
                LoadState::Loading => {
                    draw_status_line(f, chunks[1], "Loading skips...", styles::status());
                }
                LoadState::Failed(message) => {
                    draw_status_line(f, chunks[1], message, styles::failure());
                }
                LoadState::Loaded if visible.is_empty() => {
                    draw_status_line(
                        f,
                        chunks[1],
                        "No skips match your filters.",
                        styles::hint(),
                    );
                }
                LoadState::Loaded => match state.view {
                    ViewMode::Table => draw_table(
                        f,
                        chunks[1],
                        &visible,
                        cursor,
                        &mut offset,
                        &mut capacity,
                        state.selected,
                    ),
                    ViewMode::Cards => draw_cards(
                        f,
                        chunks[1],
                        &visible,
                        cursor,
                        &mut offset,
                        &mut capacity,
                        &mut columns,
                        state.selected,
                    ),
                },
            }

            draw_footer(f, chunks[2], selected_offer, fetched_at, &state.load);

            match &overlay {
                Overlay::Filters { cursor, editing } => {
                    draw_filters_panel(f, size, &state.criteria, *cursor, editing.as_deref());
                }
                Overlay::Confirm(line) => draw_confirm_modal(f, size, line),
                Overlay::None => {}
            }
        })?;

        if !event::poll(Duration::from_millis(150))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            break;
        }

        let mut close_overlay = false;
        match &mut overlay {
            Overlay::Confirm(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                    close_overlay = true;
                }
            }
            Overlay::Filters {
                cursor: field_cursor,
                editing,
            } => {
                let field = FilterField::ALL[*field_cursor];
                match editing {
                    Some(buffer) => match key.code {
                        KeyCode::Enter => {
                            if let Some(action) = field.commit_action(buffer) {
                                state = state.apply(action);
                            }
                            *editing = None;
                        }
                        KeyCode::Esc => *editing = None,
                        KeyCode::Backspace => {
                            buffer.pop();
                        }
                        KeyCode::Char(ch) if field.accepts_char(ch) => buffer.push(ch),
                        _ => {}
                    },
                    None => match key.code {
                        KeyCode::Down | KeyCode::Char('j') => {
                            *field_cursor = (*field_cursor + 1) % FilterField::ALL.len();
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            *field_cursor = field_cursor
                                .checked_sub(1)
                                .unwrap_or(FilterField::ALL.len() - 1);
                        }
                        KeyCode::Char(' ') | KeyCode::Enter if field.is_toggle() => {
                            if let Some(action) = field.toggle_action(&state.criteria) {
                                state = state.apply(action);
                            }
                        }
                        KeyCode::Enter => {
                            *editing = Some(field.edit_seed(&state.criteria));
                        }
                        KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => {
                            close_overlay = true;
                        }
                        _ => {}
                    },
                }
            }
            Overlay::None => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => break,
                KeyCode::Char('f') => {
                    overlay = Overlay::Filters {
                        cursor: 0,
                        editing: None,
                    };
                }
                KeyCode::Char('v') => {
                    state = state.apply(Action::ToggleView);
                    offset = 0;
                }
                KeyCode::Enter => {
                    if let Some(offer) = visible.get(cursor) {
                        state = state.apply(Action::Select(offer.id));
                    }
                }
                KeyCode::Char('c') => {
                    if let Some(offer) = state.selected_offer() {
                        overlay = Overlay::Confirm(confirm_booking(offer));
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let step = if state.view == ViewMode::Cards {
                        columns
                    } else {
                        1
                    };
                    if total > 0 && cursor + step < total {
                        cursor += step;
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    let step = if state.view == ViewMode::Cards {
                        columns
                    } else {
                        1
                    };
                    cursor = cursor.saturating_sub(step);
                }
                KeyCode::Right | KeyCode::Char('l') if state.view == ViewMode::Cards => {
                    if total > 0 && cursor + 1 < total {
                        cursor += 1;
                    }
                }
                KeyCode::Left | KeyCode::Char('h') if state.view == ViewMode::Cards => {
                    cursor = cursor.saturating_sub(1);
                }
                KeyCode::PageDown => {
                    if total > 0 {
                        let step = capacity * columns.max(1);
                        cursor = (cursor + step).min(total - 1);
                    }
                }
                KeyCode::PageUp => {
                    cursor = cursor.saturating_sub(capacity * columns.max(1));
                }
                KeyCode::Home => cursor = 0,
                KeyCode::End => cursor = total.saturating_sub(1),
                _ => {}
            },
        }
        if close_overlay {
            overlay = Overlay::None;
        }
    }

    // Discard an in-flight fetch on teardown.
    if let Some(task) = load_task.take() {
        task.abort();
    }
    guard.restore()?;
    Ok(())
}

fn draw_header(f: &mut Frame, area: Rect, state: &AppState, shown: usize) {
    let view_label = match state.view {
        ViewMode::Cards => "cards",
        ViewMode::Table => "table",
    };
    let title = match state.load {
        LoadState::Loaded => format!(
            "Book Your Skip in Lowestoft — {} of {} shown ({} view)",
            shown,
            state.offers.len(),
            view_label
        ),
        _ => "Book Your Skip in Lowestoft".to_string(),
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    f.render_widget(Paragraph::new(title).style(styles::header()), rows[0]);
    f.render_widget(
        Paragraph::new(summarize_criteria(&state.criteria)).style(styles::hint()),
        rows[1],
    );
}

fn draw_status_line(f: &mut Frame, area: Rect, message: &str, style: Style) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Length(1),
            Constraint::Percentage(50),
        ])
        .split(inner);
    f.render_widget(
        Paragraph::new(message)
            .style(style)
            .alignment(Alignment::Center),
        rows[1],
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_table(
    f: &mut Frame,
    area: Rect,
    visible: &[Offer],
    cursor: usize,
    offset: &mut usize,
    capacity: &mut usize,
    selected: Option<u32>,
) {
    let total = visible.len();
    *capacity = (area.height.saturating_sub(3) as usize).max(1);

    let max_offset = total.saturating_sub(*capacity);
    if cursor >= *offset + *capacity {
        *offset = cursor + 1 - *capacity;
    }
    if cursor < *offset {
        *offset = cursor;
    }
    if *offset > max_offset {
        *offset = max_offset;
    }

    let visible_end = (*offset + *capacity).min(total);
    let rows = visible[*offset..visible_end]
        .iter()
        .enumerate()
        .map(|(i, offer)| {
            let marker = if selected == Some(offer.id) { "●" } else { " " };
            let cells = vec![
                Cell::from(marker.to_string()).style(styles::selected_marker()),
                Cell::from(offer.label()),
                Cell::from(format!("{} days", offer.hire_period_days)),
                Cell::from(format!("£{:.0}", offer.price_before_vat)),
                Cell::from(format!("{:.0}%", offer.vat)),
                Cell::from(format!("£{:.2}", offer.price_incl_vat())),
                Cell::from(yes_no(offer.allowed_on_road)),
                Cell::from(yes_no(offer.allows_heavy_waste)),
                Cell::from(offer.postcode.clone().unwrap_or_default()),
            ];
            let mut row = Row::new(cells)
                .style(Style::default().fg(styles::size_accent(offer.size_class())));
            if *offset + i == cursor {
                row = row.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            row
        })
        .collect::<Vec<_>>();

    let header = Row::new(
        [
            "",
            "Skip",
            "Hire",
            "Price + VAT",
            "VAT",
            "Gross",
            "On road",
            "Heavy waste",
            "Postcode",
        ]
        .iter()
        .map(|label| Cell::from(*label).style(styles::header())),
    );

    let postcode_width = visible
        .iter()
        .filter_map(|offer| offer.postcode.as_deref())
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0)
        .max("Postcode".len()) as u16;

    let widths = vec![
        Constraint::Length(2),
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(postcode_width + 2),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Skips ({} shown)", total)),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}

#[allow(clippy::too_many_arguments)]
fn draw_cards(
    f: &mut Frame,
    area: Rect,
    visible: &[Offer],
    cursor: usize,
    offset: &mut usize,
    capacity: &mut usize,
    columns: &mut usize,
    selected: Option<u32>,
) {
    *columns = ((area.width / CARD_WIDTH) as usize).max(1);
    *capacity = ((area.height / CARD_HEIGHT) as usize).max(1);

    let total_rows = visible.len().div_ceil(*columns);
    let cursor_row = cursor / *columns;
    if cursor_row >= *offset + *capacity {
        *offset = cursor_row + 1 - *capacity;
    }
    if cursor_row < *offset {
        *offset = cursor_row;
    }
    let max_offset = total_rows.saturating_sub(*capacity);
    if *offset > max_offset {
        *offset = max_offset;
    }

    for visible_row in 0..*capacity {
        let row_index = *offset + visible_row;
        if row_index >= total_rows {
            break;
        }
        for col in 0..*columns {
            let index = row_index * *columns + col;
            let Some(offer) = visible.get(index) else {
                break;
            };
            let card_area = Rect {
                x: area.x + (col as u16) * CARD_WIDTH,
                y: area.y + (visible_row as u16) * CARD_HEIGHT,
                width: CARD_WIDTH.min(area.width.saturating_sub((col as u16) * CARD_WIDTH)),
                height: CARD_HEIGHT.min(area.height.saturating_sub((visible_row as u16) * CARD_HEIGHT)),
            };
            if card_area.width < 8 || card_area.height < 3 {
                continue;
            }
            draw_card(f, card_area, offer, index == cursor, selected == Some(offer.id));
        }
    }
}

fn draw_card(f: &mut Frame, area: Rect, offer: &Offer, under_cursor: bool, is_selected: bool) {
    let accent = styles::size_accent(offer.size_class());
    let border_style = if under_cursor {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(accent)
    };
    let title = if is_selected {
        format!("{} ✔ Selected", offer.label())
    } else {
        offer.label()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(title, Style::default().fg(accent)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("£{:.0}", offer.price_before_vat),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" + VAT  (£{:.2} gross)", offer.price_incl_vat()),
                styles::hint(),
            ),
        ]),
        Line::from(format!("{} day hire", offer.hire_period_days)),
        Line::from(flag_text("On-road", offer.allowed_on_road)),
        Line::from(flag_text("Heavy waste", offer.allows_heavy_waste)),
    ];
    if offer.forbidden {
        lines.push(Line::from(Span::styled("Not available", styles::failure())));
    } else if let Some(postcode) = &offer.postcode {
        lines.push(Line::from(Span::styled(
            format!("Postcode {}", postcode),
            styles::hint(),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn flag_text(label: &str, allowed: bool) -> Span<'static> {
    let (text, color) = if allowed {
        (format!("{} allowed", label), Color::Green)
    } else {
        (format!("{} not allowed", label), Color::Red)
    };
    Span::styled(text, Style::default().fg(color))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn draw_footer(
    f: &mut Frame,
    area: Rect,
    selected: Option<&Offer>,
    fetched_at: Option<DateTime<Local>>,
    load: &LoadState,
) {
    let rows = if selected.is_some() {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1)])
            .split(area)
    };

    if let Some(offer) = selected {
        let bar = format!(
            "Selected: {} • £{:.0} + VAT (£{:.2} gross) • {} day hire — c to continue",
            offer.label(),
            offer.price_before_vat,
            offer.price_incl_vat(),
            offer.hire_period_days
        );
        f.render_widget(
            Paragraph::new(bar).style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
            rows[0],
        );
    }

    let stamp = match (load, fetched_at) {
        (LoadState::Loaded, Some(at)) => format!(" • fetched {}", at.format("%H:%M:%S")),
        _ => String::new(),
    };
    let hints = format!(
        "↑/↓ move • Enter select • f filters • v view • c continue • q quit{}",
        stamp
    );
    f.render_widget(
        Paragraph::new(hints).style(styles::hint()),
        rows[rows.len() - 1],
    );
}

fn draw_filters_panel(
    f: &mut Frame,
    size: Rect,
    criteria: &FilterCriteria,
    cursor: usize,
    editing: Option<&str>,
) {
    let area = centered_rect(50, 60, size);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Filters — Space toggles • Enter edit • Esc back");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let items: Vec<ListItem> = FilterField::ALL
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let value = if idx == cursor {
                match editing {
                    Some(buffer) => format!("{}▏", buffer),
                    None => field.value_text(criteria),
                }
            } else {
                field.value_text(criteria)
            };
            let active = value != "Any";
            let text = format!("{:<20} {}", field.label(), value);
            let mut style = if active {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if idx == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(text).style(style)
        })
        .collect();

    f.render_widget(List::new(items), inner);
}

fn draw_confirm_modal(f: &mut Frame, size: Rect, line: &str) {
    let area = centered_rect(60, 25, size);
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Booking confirmation");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(format!("{}\n\nPress Enter to close.", line))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
