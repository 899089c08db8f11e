//! Stateless drawing of a [`TaskView`] into a ratatui frame.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect as CellRect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use till_engine::{
    ButtonStyle, ButtonView, ReceiptView, TaskView, TextFieldView, TokenView, ZoneView,
};
use till_types::SizeClass;

use crate::scene::SceneMap;
use crate::theme::{Glyphs, Palette, UiOptions, glyphs, palette, styles};

struct Painter<'a> {
    map: SceneMap,
    palette: Palette,
    glyphs: Glyphs,
    view: &'a TaskView,
}

/// Draw the whole scene, scaled to the frame.
pub fn draw(frame: &mut Frame, view: &TaskView, options: UiOptions) {
    let area = frame.area();
    let painter = Painter {
        map: SceneMap::new(view.scene, area),
        palette: palette(options),
        glyphs: glyphs(options),
        view,
    };

    frame.render_widget(
        Block::default().style(Style::default().bg(painter.palette.bg_dark)),
        area,
    );

    for zone in &view.zones {
        painter.zone(frame, zone);
    }
    if let Some(receipt) = &view.receipt {
        painter.receipt(frame, receipt);
    }
    for token in &view.tokens {
        painter.token(frame, token);
    }
    for button in &view.buttons {
        painter.button(frame, button);
    }
    if let Some(field) = &view.text_field {
        painter.text_field(frame, field);
    }
    painter.status(frame, area);
    painter.banner(frame, area);
}

impl Painter<'_> {
    fn block(&self) -> Block<'static> {
        let border_type = if self.glyphs.rounded_borders {
            BorderType::Rounded
        } else {
            BorderType::Plain
        };
        Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
    }

    fn zone(&self, frame: &mut Frame, zone: &ZoneView) {
        let Some(cells) = self.map.to_cells(zone.rect) else {
            return;
        };
        let block = self
            .block()
            .border_style(styles::zone_border(&self.palette))
            .title(Span::styled(
                format!(" {} ", zone.label),
                styles::zone_title(&self.palette),
            ))
            .style(Style::default().bg(self.palette.bg_panel));
        frame.render_widget(block, cells);
    }

    fn receipt(&self, frame: &mut Frame, receipt: &ReceiptView) {
        let Some(cells) = self.map.to_cells(receipt.rect) else {
            return;
        };
        let inner_width = usize::from(cells.width.saturating_sub(2));
        let mut lines: Vec<Line> = receipt
            .lines
            .iter()
            .map(|(name, price)| {
                let price = price.to_string();
                let label = format!("{} {name}", self.glyphs.bullet);
                let pad = inner_width.saturating_sub(label.chars().count() + price.len());
                Line::from(format!("{label}{}{price}", " ".repeat(pad.max(1))))
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("TOTAL: {}", receipt.total),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        frame.render_widget(Clear, cells);
        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(self.palette.text_primary).bg(self.palette.bg_panel))
                .block(
                    self.block()
                        .border_style(Style::default().fg(self.palette.bg_border))
                        .title(" Receipt "),
                ),
            cells,
        );
    }

    fn token(&self, frame: &mut Frame, token: &TokenView) {
        let Some(cells) = self.map.to_cells(token.rect) else {
            return;
        };
        let fill = match token.denomination.size_class() {
            SizeClass::Bill => self.palette.bill,
            SizeClass::Coin => self.palette.coin,
        };
        let mut style = Style::default().fg(self.palette.ink).bg(fill);
        if token.dragging {
            style = style.add_modifier(Modifier::BOLD);
        }
        let label = if token.highlighted {
            style = styles::highlighted(&self.palette);
            format!("{}{}", self.glyphs.highlight, token.label)
        } else {
            token.label.clone()
        };

        frame.render_widget(Clear, cells);
        let mut lines = vec![Line::from(""); usize::from(cells.height.saturating_sub(1) / 2)];
        lines.push(Line::from(label));
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(style),
            cells,
        );
    }

    fn button(&self, frame: &mut Frame, button: &ButtonView) {
        let Some(cells) = self.map.to_cells(button.rect) else {
            return;
        };
        let color = match button.style {
            ButtonStyle::Neutral => self.palette.accent,
            ButtonStyle::Confirm => self.palette.success,
            ButtonStyle::Decline => self.palette.peach,
            ButtonStyle::Danger => self.palette.error,
        };
        let (style, label) = if button.highlighted {
            (
                styles::highlighted(&self.palette),
                format!("{} {} {}", self.glyphs.highlight, button.label, self.glyphs.highlight),
            )
        } else {
            (
                Style::default().fg(color).add_modifier(Modifier::BOLD),
                button.label.to_string(),
            )
        };

        frame.render_widget(Clear, cells);
        let paragraph = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(style);
        if cells.height >= 3 {
            frame.render_widget(
                paragraph.block(self.block().border_style(Style::default().fg(color))),
                cells,
            );
        } else {
            frame.render_widget(paragraph, cells);
        }
    }

    fn text_field(&self, frame: &mut Frame, field: &TextFieldView) {
        let Some(cells) = self.map.to_cells(field.rect) else {
            return;
        };
        let text = Line::from(vec![
            Span::raw("$"),
            Span::raw(field.text.clone()),
            Span::styled(
                self.glyphs.cursor,
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ),
        ]);
        frame.render_widget(Clear, cells);
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(self.palette.text_primary).bg(self.palette.bg_highlight));
        if cells.height >= 3 {
            frame.render_widget(
                paragraph.block(
                    self.block()
                        .border_style(Style::default().fg(self.palette.accent))
                        .title(" Change "),
                ),
                cells,
            );
        } else {
            frame.render_widget(paragraph, cells);
        }
    }

    fn status(&self, frame: &mut Frame, area: CellRect) {
        if area.height == 0 {
            return;
        }
        let tag = if self.view.finished {
            " Task complete ".to_string()
        } else {
            format!(" {} ", self.view.title)
        };
        let tag_width = (tag.chars().count() as u16).min(area.width);
        let tag_style = if self.view.finished {
            styles::muted(&self.palette)
        } else {
            styles::zone_title(&self.palette)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(tag, tag_style)).alignment(Alignment::Right),
            CellRect::new(area.x + area.width - tag_width, area.y, tag_width, 1),
        );

        if self.view.status.is_empty() {
            return;
        }
        let height = (self.view.status.len() as u16).min(area.height);
        let lines: Vec<Line> = self
            .view
            .status
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), styles::status(&self.palette))))
            .collect();
        let width = area.width.saturating_sub(tag_width);
        frame.render_widget(
            Paragraph::new(lines),
            CellRect::new(area.x, area.y, width, height),
        );
    }

    fn banner(&self, frame: &mut Frame, area: CellRect) {
        let Some(message) = &self.view.message else {
            return;
        };
        if area.height == 0 {
            return;
        }
        let rect = CellRect::new(area.x, area.y + area.height - 1, area.width, 1);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(message.as_str())
                .alignment(Alignment::Center)
                .style(styles::banner(&self.palette))
                .wrap(Wrap { trim: true }),
            rect,
        );
    }
}
