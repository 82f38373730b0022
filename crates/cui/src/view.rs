use crate::app::{App, VIRTUAL_H, VIRTUAL_W};
use cardtable_core::{rank_label, Card, HitTarget, Suit, Table};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Style, Stylize};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Rectangle};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(12),
            Constraint::Length(1),
            Constraint::Length(8),
        ])
        .split(frame.area());

    app.surface_area = root[0];
    draw_surface(frame, root[0], app);
    draw_status(frame, root[1], app);
    draw_events(frame, root[2], app);

    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_surface(frame: &mut Frame, area: Rect, app: &App) {
    let table = &app.table;
    let canvas = Canvas::default()
        .x_bounds([0.0, f64::from(VIRTUAL_W)])
        .y_bounds([0.0, f64::from(VIRTUAL_H)])
        .paint(|ctx| paint_table(ctx, table));
    frame.render_widget(canvas, area);
}

fn paint_table(ctx: &mut Context, table: &Table) {
    for target in table.z_order() {
        match *target {
            HitTarget::Box => paint_box(ctx, table),
            HitTarget::Group(id) => {
                if let Some(group) = table.group(id) {
                    let color = if group.tint {
                        Color::Yellow
                    } else {
                        Color::Rgb(255, 140, 0)
                    };
                    ctx.draw(&Circle {
                        x: f64::from(group.anchor_x),
                        y: flip_y(group.anchor_y),
                        radius: f64::from(table.config.handle_radius),
                        color,
                    });
                }
            }
            HitTarget::Card(id) => {
                if let Some(card) = table.card(id) {
                    paint_card(ctx, table, card);
                }
            }
        }
    }
    for particle in table.particles() {
        let tint = match particle.variant {
            0 => Color::Yellow,
            1 => Color::LightYellow,
            _ => Color::White,
        };
        ctx.print(
            f64::from(particle.x),
            flip_y(particle.y),
            Line::styled("✦", Style::default().fg(tint)),
        );
    }
    if table.marker().is_some() {
        ctx.print(
            f64::from(VIRTUAL_W / 2.0 - 60.0),
            flip_y(VIRTUAL_H / 2.0),
            Line::styled("⚠ unavailable", Style::default().fg(Color::Red).bold()),
        );
    }
}

fn paint_box(ctx: &mut Context, table: &Table) {
    let deck_box = table.deck_box();
    let config = &table.config;
    ctx.draw(&Rectangle {
        x: f64::from(deck_box.x - config.box_w / 2.0),
        y: flip_y(deck_box.y + config.box_h / 2.0),
        width: f64::from(config.box_w),
        height: f64::from(config.box_h),
        color: Color::Blue,
    });
    ctx.print(
        f64::from(deck_box.x - 8.0),
        flip_y(deck_box.y),
        Line::styled("BOX", Style::default().fg(Color::LightBlue).bold()),
    );
}

fn paint_card(ctx: &mut Context, table: &Table, card: &Card) {
    let config = &table.config;
    let width = (config.card_w * card.flip_scale()).max(2.0);
    let y = card.visual_y();
    let color = if card.face_up {
        Color::White
    } else {
        Color::LightBlue
    };
    ctx.draw(&Rectangle {
        x: f64::from(card.x - width / 2.0),
        y: flip_y(y + config.card_h / 2.0),
        width: f64::from(width),
        height: f64::from(config.card_h),
        color,
    });
    // The label vanishes while the flip squeezes through its midpoint.
    if card.flip_scale() > 0.4 {
        ctx.print(f64::from(card.x - 6.0), flip_y(y), face_label(card));
    }
}

fn face_label(card: &Card) -> Line<'static> {
    if !card.face_up {
        return Line::styled("▒▒", Style::default().fg(Color::Blue));
    }
    match (card.identity.suit(), card.identity.rank()) {
        (Some(suit), Some(rank)) => {
            let glyph = match suit {
                Suit::Spade => "♠",
                Suit::Diamond => "♦",
                Suit::Club => "♣",
                Suit::Heart => "♥",
            };
            let color = match suit {
                Suit::Heart | Suit::Diamond => Color::Red,
                Suit::Spade | Suit::Club => Color::Gray,
            };
            Line::styled(format!("{glyph}{}", rank_label(rank)), Style::default().fg(color))
        }
        _ => {
            if card.identity.is_joker() {
                Line::styled("JOKER", Style::default().fg(Color::Magenta).bold())
            } else {
                Line::styled("??", Style::default().fg(Color::DarkGray))
            }
        }
    }
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let inventory = app.table.inventory();
    let focus = app.table.focus();
    let focus_label = if focus.current_card().is_some() {
        "card"
    } else if focus.current_group().is_some() {
        "spread"
    } else if focus.box_focused() {
        "box"
    } else {
        "-"
    };
    let line = format!(
        " live {:>2}  unused {:>2}  focus {:<6}  {}",
        inventory.in_use_count(),
        inventory.unused_count(),
        focus_label,
        app.status_line,
    );
    frame.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::Gray).bg(Color::Black)),
        area,
    );
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .event_log
        .iter()
        .rev()
        .take(visible.max(1))
        .map(|line| ListItem::new(line.clone()))
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Events"));
    frame.render_widget(list, area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 56, 18);
    let text = vec![
        Line::from("mouse   left click box: spawn   left click card: flip"),
        Line::from("        middle click: delete    right click box: spread"),
        Line::from("        group handle: flip-all / delete / stack toggle"),
        Line::from("t spawn   g reset box   r / ctrl+d delete all"),
        Line::from("f flip focused   d delete focused   ctrl+f flip all"),
        Line::from("s random   w standard   ctrl+w standard (reclaim)"),
        Line::from("e eight kings   u si stebbins   m/n/b mirror spreads"),
        Line::from("z/x/c/v one suit   h red   l black"),
        Line::from("a,2-9,0,j,q,k rank row   o jokers"),
        Line::from("esc quit   ? toggle this help"),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::ALL).title("Keys")),
        area,
    );
}

fn centered_rect(base: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(base.width);
    let height = height.min(base.height);
    Rect::new(
        base.x + (base.width - width) / 2,
        base.y + (base.height - height) / 2,
        width,
        height,
    )
}

fn flip_y(y: f32) -> f64 {
    f64::from(VIRTUAL_H - y)
}
