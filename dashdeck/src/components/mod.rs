//! Dashboard UI components
//!
//! Every component implements [`Component`] and emits actions through the
//! callbacks or fixed actions carried in its props. Panels own their child
//! inputs so cursor and scroll positions survive between frames.
//!
//! - [`TextInput`], [`KeyField`]: editable fields
//! - [`TabBar`], [`HelpBar`]: chrome around the active panel
//! - one panel per [`PanelId`](crate::state::PanelId)

mod cat_panel;
mod chat_panel;
mod help_bar;
mod key_field;
mod places_panel;
pub mod status;
mod stock_panel;
mod tab_bar;
mod text_input;
mod weather_panel;

use ratatui::{Frame, layout::Rect};

use crate::dispatch::EventKind;

/// Renders from borrowed props and turns input into actions.
///
/// State changes only through the actions a component returns. Cursor and
/// scroll positions are view state and live on `self`.
pub trait Component<A> {
    type Props<'a>;

    /// Display-only components keep the default and ignore input.
    #[allow(unused_variables)]
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>);
}

pub use cat_panel::{CatPanel, CatPanelProps};
pub use chat_panel::{ChatPanel, ChatPanelProps};
pub use help_bar::{HelpBar, HelpBarProps};
pub use key_field::{KeyField, KeyFieldProps};
pub use places_panel::{PlacesPanel, PlacesPanelProps};
pub use stock_panel::{StockPanel, StockPanelProps};
pub use tab_bar::{TabBar, TabBarProps};
pub use text_input::{TextInput, TextInputProps};
pub use weather_panel::{WeatherPanel, WeatherPanelProps};
