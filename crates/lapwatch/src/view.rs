//! Drawing the stopwatch: main display, control bar, lap list.

use crate::keys::key_hint;
use lapwatch_core::{Clock, Controls, Sampler, TimerStore};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

/// Render the whole stopwatch into `area`.
pub fn render<C: Clock, S: Sampler>(store: &TimerStore<C, S>, frame: &mut Frame, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" lapwatch ");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [display_area, controls_area, _, laps_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    render_display(store, frame, display_area);
    render_controls(&store.controls(), frame, controls_area);
    render_laps(store, frame, laps_area);
}

fn render_display<C: Clock, S: Sampler>(store: &TimerStore<C, S>, frame: &mut Frame, area: Rect) {
    let style = if store.is_running() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let paragraph =
        Paragraph::new(Span::styled(store.main_display(), style)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_controls(controls: &Controls, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let mut spans = Vec::new();
    for control in controls.iter() {
        if !spans.is_empty() {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(format!("[{}]", key_hint(control)), key_style));
        spans.push(Span::raw(format!(" {}", control.label())));
    }
    spans.push(Span::raw("   "));
    spans.push(Span::styled("[q]", key_style));
    spans.push(Span::raw(" Quit"));

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_laps<C: Clock, S: Sampler>(store: &TimerStore<C, S>, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Laps ({}) ", store.lap_count()));

    let laps = store.lap_view();
    if laps.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No laps yet",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = laps
        .into_iter()
        .map(|lap| ListItem::new(Line::from(lap.text).alignment(Alignment::Center)))
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}
