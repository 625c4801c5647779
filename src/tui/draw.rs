use crate::tui::app::{App, MENU, Mode, Query};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::Color::White;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table};

pub fn draw_app(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length((MENU.len() + 3) as u16),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    frame.render_widget(build_header(app), chunks[0]);
    frame.render_widget(build_menu(app), chunks[2]);
    frame.render_widget(build_output(app), chunks[3]);
    frame.render_widget(build_prompt(app), chunks[4]);
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn build_header(app: &'_ App) -> Block<'_> {
    let settings = app.settings();
    Block::new()
        .title(Line::from(vec![
            Span::raw(" Linkgraph ").style(bold().fg(Color::Cyan)),
            Span::raw(app.name()).style(bold()),
            Span::raw(" nodes: ").style(dim()),
            Span::raw(app.topology().node_count().to_string()).style(bold()),
            Span::raw(" links: ").style(dim()),
            Span::raw(app.topology().link_count().to_string()).style(bold()),
            Span::raw(" flow: ").style(dim()),
            Span::raw(format!("{:?}", settings.flow_mode)),
            Span::raw(" strategy: ").style(dim()),
            Span::raw(format!("{:?} ", settings.strategy)),
            Span::raw(if settings.strict { "strict " } else { "" }).style(dim()),
        ]))
        .title_alignment(Alignment::Center)
}

fn build_menu(app: &'_ App) -> Table<'_> {
    let active = match app.mode {
        Mode::Prompt(Query::LatencyPath) => Some('1'),
        Mode::Prompt(Query::MaxBandwidth) => Some('3'),
        Mode::Menu => None,
    };

    Table::new(
        MENU.iter().map(|&(key, label)| {
            let style = if Some(key) == active {
                bold().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!(" {key}")).style(bold()),
                Cell::from(label),
            ])
            .style(style)
        }),
        [Constraint::Length(4), Constraint::Min(20)],
    )
    .header(
        Row::new([Cell::from("Key"), Cell::from("Option")])
            .style(Style::default().bg(Color::DarkGray).fg(White)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![Span::from(" Menu ").style(bold())]))
            .padding(Padding::horizontal(1)),
    )
}

fn build_output(app: &'_ App) -> Paragraph<'_> {
    let lines: Vec<Line> = app
        .output()
        .iter()
        .map(|line| {
            if line.starts_with("Error") {
                Line::styled(line.as_str(), Style::default().fg(Color::Red))
            } else {
                Line::raw(line.as_str())
            }
        })
        .collect();

    Paragraph::new(lines).scroll((app.scroll, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![
                Span::from(" Output ").style(bold()),
                Span::from("(up/down to scroll) ").style(dim()),
            ]))
            .padding(Padding::horizontal(1)),
    )
}

fn build_prompt(app: &'_ App) -> Paragraph<'_> {
    let (title, text) = match app.mode {
        Mode::Prompt(_) => (
            " Enter two vertices, separated by a space ",
            Line::from(vec![
                Span::raw(app.input.as_str()),
                Span::raw("_").style(Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ]),
        ),
        Mode::Menu => (
            " Keys ",
            Line::styled("1-6 select, q or Esc quits", dim()),
        ),
    };

    Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![Span::from(title).style(bold())]))
            .padding(Padding::horizontal(1)),
    )
}
