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
use crate::state::{Load, WeatherState};
use crate::theme;

pub const FETCHING: &str = "Fetching weather data from CWA...";
pub const NO_DATA_TITLE: &str = "Weather status";

pub struct WeatherPanelProps<'a> {
    pub weather: &'a WeatherState,
    pub spinner: &'static str,
}

/// City form plus one row per 12-hour forecast window.
#[derive(Default)]
pub struct WeatherPanel {
    city: TextInput,
}

impl WeatherPanel {
    fn city_props<'a>(weather: &'a WeatherState) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: &weather.city,
            placeholder: "Enter City Name (e.g. 臺北市)",
            label: "City",
            is_focused: true,
            masked: false,
            on_change: Action::WeatherCityChange,
            on_submit: |_| Action::WeatherFetch,
        }
    }

    pub fn title(weather: &WeatherState) -> String {
        match weather.forecast.ready() {
            Some(forecast) => format!("{} 36-Hour Forecast", forecast.city),
            None => NO_DATA_TITLE.to_string(),
        }
    }
}

impl Component<Action> for WeatherPanel {
    type Props<'a> = WeatherPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        self.city
            .handle_event(event, Self::city_props(props.weather))
            .into_iter()
            .collect::<Vec<_>>()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = theme::current();
        let weather = props.weather;
        let [input_area, result_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

        self.city.render(frame, input_area, Self::city_props(weather));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(false))
            .title(Span::styled(format!(" {} ", Self::title(weather)), theme.title_style()));

        let forecast = match &weather.forecast {
            Load::Ready(forecast) => forecast,
            Load::Loading => {
                frame.render_widget(
                    Paragraph::new(loading_line(props.spinner, FETCHING)).block(block),
                    result_area,
                );
                return;
            }
            Load::Failed(message) => {
                frame.render_widget(Paragraph::new(error_line(message)).block(block), result_area);
                return;
            }
            Load::Idle => {
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled("Press Enter to search.", theme.muted_style())))
                        .block(block),
                    result_area,
                );
                return;
            }
        };

        let header = Row::new(["Date", "Time", "Weather", "Comfort", "Temperature", "Rain"])
            .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));
        let rows = forecast.periods.iter().map(|period| {
            Row::new([
                Cell::from(period.date_label()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(period.time_range()),
                Cell::from(period.condition.clone()),
                Cell::from(period.comfort.clone()).style(theme.muted_style()),
                Cell::from(format!("{}° - {}°C", period.min_temp, period.max_temp))
                    .style(Style::default().fg(theme.up)),
                Cell::from(format!("PoP: {}%", period.rain_chance)).style(Style::default().fg(theme.link)),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(13),
                Constraint::Min(12),
                Constraint::Min(10),
                Constraint::Length(12),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .column_spacing(2)
        .block(block);
        frame.render_widget(table, result_area);
    }
}
