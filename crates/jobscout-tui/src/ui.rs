// UI rendering logic
use jobscout_api::Job;
use jobscout_core::{DetailScreen, LoadState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::{App, InputMode, Tab, View};

const STAR: &str = "★";
const EMPTY_STAR: &str = "☆";

pub fn render(frame: &mut Frame, app: &App) {
    let show_search = app.tab == Tab::Jobs && app.view == View::List;

    let constraints = if show_search {
        vec![
            Constraint::Length(3), // Tabs
            Constraint::Length(3), // Search input
            Constraint::Length(1), // Filters
            Constraint::Min(5),    // Content
            Constraint::Length(1), // Status bar
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    let (content_area, status_area) = if show_search {
        render_search_input(frame, app, chunks[1]);
        render_filters(frame, app, chunks[2]);
        (chunks[3], chunks[4])
    } else {
        (chunks[1], chunks[2])
    };

    match (app.view, app.detail.as_ref()) {
        (View::Detail, Some(detail)) => render_detail(frame, app, detail, content_area),
        _ => match app.tab {
            Tab::Jobs => render_job_list(
                frame,
                app,
                &app.jobs.jobs,
                app.jobs.selected,
                "No results",
                content_area,
            ),
            Tab::Favorites => render_job_list(
                frame,
                app,
                &app.saved.jobs,
                app.saved.selected,
                "You have no saved jobs",
                content_area,
            ),
        },
    }

    render_status_bar(frame, app, status_area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec![
        Line::from(" Jobs "),
        Line::from(format!(" Favorites ({}) ", app.favorites.len())),
    ];
    let selected = match app.tab {
        Tab::Jobs => 0,
        Tab::Favorites => 1,
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    " JobScout ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.input_mode == InputMode::Searching;
    let border_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = if app.jobs.search_input.is_empty() && !searching {
        Span::styled(
            "Search by title or company (press /)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(app.jobs.search_input.as_str())
    };

    let input = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Search "),
    );
    frame.render_widget(input, area);

    if searching {
        let x = area.x + 1 + app.jobs.search_input.chars().count() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let category = app.jobs.category.as_deref().unwrap_or("All categories");
    let job_type = app.jobs.job_type.map(|t| t.label()).unwrap_or("All types");

    let mut spans = vec![
        Span::styled(" Category: ", Style::default().fg(Color::DarkGray)),
        Span::styled(category, Style::default().fg(Color::Cyan)),
        Span::styled("  Type: ", Style::default().fg(Color::DarkGray)),
        Span::styled(job_type, Style::default().fg(Color::Cyan)),
    ];
    if app.jobs.refreshing {
        spans.push(Span::styled("  refreshing…", Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_job_list(
    frame: &mut Frame,
    app: &App,
    state: &LoadState<Vec<Job>>,
    selected: usize,
    empty_text: &str,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL);

    let jobs = match state {
        LoadState::Loading => {
            render_message(frame, "Loading jobs…", Color::Gray, None, block, area);
            return;
        }
        LoadState::Failed(message) => {
            render_message(
                frame,
                message,
                Color::LightRed,
                Some("Press r to retry"),
                block,
                area,
            );
            return;
        }
        LoadState::Loaded(jobs) if jobs.is_empty() => {
            render_message(frame, empty_text, Color::DarkGray, None, block, area);
            return;
        }
        LoadState::Loaded(jobs) => jobs,
    };

    let items: Vec<ListItem> = jobs
        .iter()
        .map(|job| {
            let (star, star_style) = if app.is_favorite(job.id) {
                (STAR, Style::default().fg(Color::Yellow))
            } else {
                (EMPTY_STAR, Style::default().fg(Color::DarkGray))
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", star), star_style),
                    Span::styled(
                        job.title.as_str(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", job.company_name),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    format!("  {} · {}", job.candidate_required_location, job.display_date()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block.title(format!(" {} jobs ", jobs.len())))
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 40)))
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_message(
    frame: &mut Frame,
    message: &str,
    color: Color,
    hint: Option<&str>,
    block: Block,
    area: Rect,
) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(color))),
    ];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::Blue))));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_detail(frame: &mut Frame, app: &App, detail: &DetailScreen, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Job detail ");

    let job = match &detail.job {
        LoadState::Loading => {
            render_message(frame, "Loading job…", Color::Gray, None, block, area);
            return;
        }
        LoadState::Failed(message) => {
            render_message(
                frame,
                message,
                Color::LightRed,
                Some("Press r to retry, Esc to go back"),
                block,
                area,
            );
            return;
        }
        LoadState::Loaded(job) => job,
    };

    let label = Style::default().fg(Color::DarkGray);
    let favorite = if app.is_favorite(job.id) {
        Span::styled(format!("{} Saved", STAR), Style::default().fg(Color::Yellow))
    } else {
        Span::styled(format!("{} Not saved", EMPTY_STAR), label)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            job.title.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            job.company_name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(favorite),
        Line::from(""),
        field_line("Location", &job.candidate_required_location, label),
        field_line("Type", job.job_type.label(), label),
        field_line("Published", &job.display_date(), label),
    ];

    if let Some(category) = job.category.as_deref() {
        lines.push(field_line("Category", category, label));
    }
    if let Some(salary) = job.salary_text() {
        lines.push(field_line("Salary", salary, label));
    }
    if !job.tags.is_empty() {
        lines.push(field_line("Tags", &job.tags.join(", "), label));
    }
    lines.push(field_line("URL", &job.url, label));
    lines.push(Line::from(""));

    let description = html2md::parse_html(&job.description);
    lines.extend(description.lines().map(|l| Line::from(l.to_string())));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn field_line(name: &str, value: &str, label: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", name), label),
        Span::raw(value.to_string()),
    ])
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match (app.input_mode, app.view, app.tab) {
        (InputMode::Searching, _, _) => "Enter search · Esc cancel",
        (_, View::Detail, _) => "Esc back · f favorite · o open in browser · j/k scroll · q quit",
        (_, View::List, Tab::Jobs) => {
            "/ search · c category · t type · x clear · f favorite · Enter details · r refresh · Tab favorites · q quit"
        }
        (_, View::List, Tab::Favorites) => {
            "f remove · Enter details · r refresh · Tab jobs · q quit"
        }
    };

    let line = match &app.status_message {
        Some(message) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
    };

    frame.render_widget(Paragraph::new(line), area);
}
