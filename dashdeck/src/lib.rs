//! dashdeck: a terminal dashboard of API-backed panels
//!
//! One panel is mounted at a time: Gemini chat, Gemini places search, CWA
//! weather, TWSE stock history, and a random cat. Every panel follows the
//! same loop:
//!
//! 1. Event -> [`ui::DashboardUi::map_event`] -> [`action::Action`]s
//! 2. [`reducer::reducer`] updates [`state::AppState`] and returns
//!    [`effect::Effect`]s
//! 3. [`handler::EffectHandler`] runs effects as per-panel requests whose results
//!    come back as `*Did*` actions
//! 4. Results from a superseded request or an unmounted panel are dropped

pub mod action;
pub mod components;
pub mod config;
pub mod dispatch;
pub mod effect;
pub mod handler;
pub mod markdown;
pub mod reducer;
pub mod state;
pub mod theme;
pub mod ui;

pub use action::Action;
pub use effect::Effect;
pub use state::AppState;
