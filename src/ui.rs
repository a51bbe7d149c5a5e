//! Terminal status page.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a three-row split: the article list, a small box
//!   describing what the panel shows, and a one-line status / input bar.
//! * The list is the flattened article list, so a list index is also a
//!   rotation index.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, Mode};
use crate::render::DisplayStatus;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [list_area, panel_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(5),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_article_list(app, frame, list_area);
    draw_panel_box(app, frame, panel_area);
    match app.mode {
        Mode::Browse => draw_status_bar(app, frame, status_area),
        Mode::Compose => draw_input_bar(app, frame, status_area),
    }
}

/// Render the scrollable article list.
fn draw_article_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .feeds
        .feeds()
        .iter()
        .flat_map(|feed| {
            feed.entries.iter().map(move |article| {
                let date_str = article
                    .published
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "no date".into());

                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<18}", date_str),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(" "),
                    Span::styled(article.title.clone(), Style::default().fg(Color::White)),
                    Span::raw("  "),
                    Span::styled(
                        format!("[{}]", feed.title),
                        Style::default().fg(Color::Cyan),
                    ),
                ]))
            })
        })
        .collect();

    let list = List::new(list_items)
        .block(Block::default().title(" Articles ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render what the panel is doing and what it last showed.
fn draw_panel_box(app: &App, frame: &mut Frame, area: Rect) {
    let (status_label, status_color) = match app.coordinator().status() {
        DisplayStatus::Idle => ("idle", Color::Green),
        DisplayStatus::Busy => ("busy", Color::Red),
    };
    let rotation = if app.rotation_enabled() {
        format!("on (next #{})", app.rotation_cursor() + 1)
    } else {
        "paused".to_string()
    };

    let showing = match app.coordinator().currently_displayed() {
        Some(shown) => Line::from(vec![
            Span::raw(" showing: "),
            Span::styled(
                format!("[{}] ", shown.job.kind()),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(shown.job.headline().to_string()),
            Span::styled(
                format!("  ({})", shown.rendered_at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::from(" showing: nothing yet"),
    };

    let text = vec![
        Line::from(vec![
            Span::raw(" display: "),
            Span::styled(status_label, Style::default().fg(status_color)),
            Span::raw("   rotation: "),
            Span::styled(rotation, Style::default().fg(Color::Yellow)),
            Span::raw(format!("   renders: {}", app.coordinator().renders())),
        ]),
        showing,
        selected_link(app),
    ];

    let panel = Paragraph::new(text).block(Block::default().title(" Panel ").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

/// Link of the highlighted article, if the feed gave one.
fn selected_link(app: &App) -> Line<'static> {
    let link = app
        .list_state
        .selected()
        .and_then(|i| app.feeds.article(i))
        .and_then(|article| article.link.clone());
    match link {
        Some(url) => Line::from(vec![
            Span::raw(" link: "),
            Span::styled(url, Style::default().fg(Color::Blue)),
        ]),
        None => Line::from(" link: -"),
    }
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} articles", app.feeds.total_entries()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  ↑/↓: scroll  enter: show  n: next  p: pause  i: quote"),
    ]));
    frame.render_widget(status, area);
}

/// Render the quote entry line.
fn draw_input_bar(app: &App, frame: &mut Frame, area: Rect) {
    let input = Paragraph::new(Line::from(vec![
        Span::styled(" quote> ", Style::default().fg(Color::Cyan)),
        Span::raw(&app.input),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        Span::styled("  enter: render  esc: cancel", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(input, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{sample_feeds, test_app};
    use crate::poll::PollMsg;
    use crate::source::{Article, Feed, FeedSet};
    use ratatui::backend::TestBackend;
    use std::sync::Arc;
    use ratatui::Terminal;

    fn screen_text(app: &mut App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();

        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    #[test]
    fn draw_does_not_panic_with_no_articles() {
        let (mut app, _rx) = test_app();
        let text = screen_text(&mut app);
        assert!(text.contains("nothing yet"));
        assert!(text.contains("idle"));
    }

    #[test]
    fn draw_lists_articles_and_count() {
        let (mut app, _rx) = test_app();
        app.handle_msg(PollMsg::Feeds(sample_feeds()));
        app.select_first();

        let text = screen_text(&mut app);
        assert!(text.contains("Mid"));
        assert!(text.contains("[Tech]"));
        assert!(text.contains("3 articles"), "status bar should show article count");
    }

    #[test]
    fn draw_shows_the_selected_articles_link() {
        let (mut app, _rx) = test_app();
        let mut article = Article::new("Linked", "body");
        article.link = Some("https://example.com/story".into());
        app.handle_msg(PollMsg::Feeds(Arc::new(FeedSet::new(vec![Feed::new(
            "News",
            vec![article],
        )]))));

        assert!(screen_text(&mut app).contains("link: -"));
        app.select_first();
        assert!(screen_text(&mut app).contains("link: https://example.com/story"));
    }

    #[test]
    fn draw_counts_renders() {
        let (mut app, _rx) = test_app();
        assert!(screen_text(&mut app).contains("renders: 0"));
        app.coordinator()
            .submit(crate::render::RenderJob::Quote { text: "HI".into() })
            .unwrap();
        assert!(screen_text(&mut app).contains("renders: 1"));
    }

    #[test]
    fn draw_shows_paused_rotation() {
        let (mut app, _rx) = test_app();
        app.toggle_rotation();
        assert!(screen_text(&mut app).contains("paused"));
    }

    #[test]
    fn compose_mode_shows_the_input() {
        let (mut app, _rx) = test_app();
        app.start_compose();
        app.push_char('h');
        app.push_char('i');

        let text = screen_text(&mut app);
        assert!(text.contains("quote> hi_"));
    }
}
