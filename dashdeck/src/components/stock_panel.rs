use dashdeck_core::ChangeDirection;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use super::status::{error_line, loading_line};
use super::{Component, TextInput, TextInputProps};
use crate::action::Action;
use crate::dispatch::EventKind;
use crate::state::{Load, StockState};
use crate::theme;

pub const VOLUME_NOTE: &str = "* Volume unit: K (1000 shares)";
pub const FAILURE_HINT: &str = "無法取得資料 (CORS 限制或代號錯誤)，請稍後再試。";

pub struct StockPanelProps<'a> {
    pub stock: &'a StockState,
    pub spinner: &'static str,
}

/// Stock code form plus the month's daily rows. Rises are red and falls
/// green, as quoted on the exchange.
#[derive(Default)]
pub struct StockPanel {
    code: TextInput,
}

impl StockPanel {
    fn code_props<'a>(stock: &'a StockState) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: &stock.code,
            placeholder: "Stock Code (e.g. 2330)",
            label: "Stock Code",
            is_focused: true,
            masked: false,
            on_change: Action::StockCodeChange,
            on_submit: |_| Action::StockFetch,
        }
    }
}

impl Component<Action> for StockPanel {
    type Props<'a> = StockPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        self.code
            .handle_event(event, Self::code_props(props.stock))
            .into_iter()
            .collect::<Vec<_>>()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = theme::current();
        let stock = props.stock;
        let [input_area, result_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

        self.code.render(frame, input_area, Self::code_props(stock));

        let history = match &stock.history {
            Load::Ready(history) => history,
            Load::Loading => {
                let text = format!("Fetching {} data...", stock.code.trim());
                frame.render_widget(
                    Paragraph::new(loading_line(props.spinner, &text)).block(Block::bordered()),
                    result_area,
                );
                return;
            }
            Load::Failed(message) => {
                let lines = vec![
                    error_line(message),
                    Line::from(Span::styled(FAILURE_HINT, theme.muted_style())),
                ];
                frame.render_widget(Paragraph::new(lines).block(Block::bordered()), result_area);
                return;
            }
            Load::Idle => {
                frame.render_widget(Block::bordered(), result_area);
                return;
            }
        };

        let [table_area, note_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(result_area);

        let header = Row::new(["Date", "Volume", "Open", "High", "Low", "Close", "Change"])
            .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));
        let rows = history.rows.iter().map(|row| {
            let change_color = match row.direction() {
                ChangeDirection::Up => theme.up,
                ChangeDirection::Down => theme.down,
                ChangeDirection::Flat => theme.text,
            };
            let volume = row
                .volume_thousands()
                .map_or_else(|| row.volume.clone(), |k| format!("{k}k"));
            Row::new([
                Cell::from(row.date.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(volume),
                Cell::from(row.open.clone()),
                Cell::from(row.high.clone()).style(Style::default().fg(theme.up)),
                Cell::from(row.low.clone()).style(Style::default().fg(theme.down)),
                Cell::from(row.close.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(row.change.clone())
                    .style(Style::default().fg(change_color).add_modifier(Modifier::BOLD)),
            ])
        });

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(false))
            .title(Span::styled(format!(" {} ", history.title), theme.title_style()));
        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .column_spacing(1)
        .block(block);
        frame.render_widget(table, table_area);
        frame.render_widget(
            Paragraph::new(Span::styled(VOLUME_NOTE, theme.muted_style())),
            note_area,
        );
    }
}
