//! Top-level layout: tab bar, active panel, help bar

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
};

use crate::action::Action;
use crate::components::{
    CatPanel, CatPanelProps, ChatPanel, ChatPanelProps, Component, HelpBar, HelpBarProps,
    PlacesPanel, PlacesPanelProps, StockPanel, StockPanelProps, TabBar, TabBarProps, WeatherPanel,
    WeatherPanelProps,
};
use crate::dispatch::{EventKind, EventOutcome};
use crate::state::{AppState, Panel, PanelId};

const COMMON_HINTS: [(&str, &str); 2] = [("F1-F5", "panels"), ("Esc", "quit")];

fn panel_hints(id: PanelId) -> &'static [(&'static str, &'static str)] {
    match id {
        PanelId::Chat => &[
            ("Tab", "field"),
            ("Enter", "send"),
            ("Alt+1/2", "suggest"),
            ("Ctrl+R", "remember key"),
            ("PgUp/PgDn", "scroll"),
        ],
        PanelId::Places => &[
            ("Tab", "field"),
            ("Enter", "search"),
            ("Ctrl+R", "remember key"),
            ("PgUp/PgDn", "scroll"),
        ],
        PanelId::Weather => &[("Enter", "fetch forecast")],
        PanelId::Stock => &[("Enter", "fetch history")],
        PanelId::Cats => &[("n", "next cat")],
    }
}

/// Owns one component per panel so local view state (cursors, scroll)
/// persists across frames. Panel state itself lives in [`AppState`].
#[derive(Default)]
pub struct DashboardUi {
    tabs: TabBar,
    help: HelpBar,
    chat: ChatPanel,
    places: PlacesPanel,
    weather: WeatherPanel,
    stock: StockPanel,
    cats: CatPanel,
}

impl DashboardUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let [tabs_area, panel_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        let spinner = state.spinner();
        let loading = state.panel.is_loading();
        self.tabs.render(
            frame,
            tabs_area,
            TabBarProps {
                active: state.active(),
                spinner: loading.then_some(spinner),
            },
        );

        let body = panel_area.inner(Margin::new(1, 0));
        match &state.panel {
            Panel::Chat(chat) => self.chat.render(frame, body, ChatPanelProps { chat, spinner }),
            Panel::Places(places) => {
                self.places.render(frame, body, PlacesPanelProps { places, spinner })
            }
            Panel::Weather(weather) => {
                self.weather.render(frame, body, WeatherPanelProps { weather, spinner })
            }
            Panel::Stock(stock) => self.stock.render(frame, body, StockPanelProps { stock, spinner }),
            Panel::Cats(cats) => self.cats.render(frame, body, CatPanelProps { cats, spinner }),
        }

        let hints: Vec<(&str, &str)> = panel_hints(state.active())
            .iter()
            .chain(COMMON_HINTS.iter())
            .copied()
            .collect();
        self.help.render(frame, help_area, HelpBarProps { hints: &hints });
    }

    pub fn map_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        let key = match event {
            EventKind::Resize(_, _) => return EventOutcome::ignored().with_render(),
            EventKind::Key(key) => key,
            _ => return EventOutcome::ignored(),
        };

        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return EventOutcome::action(Action::Quit);
        }

        let spinner = state.spinner();
        let tab_actions: Vec<Action> = self
            .tabs
            .handle_event(
                event,
                TabBarProps {
                    active: state.active(),
                    spinner: None,
                },
            )
            .into_iter()
            .collect();
        if !tab_actions.is_empty() {
            return EventOutcome::from_actions(tab_actions);
        }

        let actions: Vec<Action> = match &state.panel {
            Panel::Chat(chat) => self
                .chat
                .handle_event(event, ChatPanelProps { chat, spinner })
                .into_iter()
                .collect(),
            Panel::Places(places) => self
                .places
                .handle_event(event, PlacesPanelProps { places, spinner })
                .into_iter()
                .collect(),
            Panel::Weather(weather) => self
                .weather
                .handle_event(event, WeatherPanelProps { weather, spinner })
                .into_iter()
                .collect(),
            Panel::Stock(stock) => self
                .stock
                .handle_event(event, StockPanelProps { stock, spinner })
                .into_iter()
                .collect(),
            Panel::Cats(cats) => self
                .cats
                .handle_event(event, CatPanelProps { cats, spinner })
                .into_iter()
                .collect(),
        };
        // Key events can move a cursor or scroll offset without any action
        EventOutcome::from_actions(actions).with_render()
    }
}
