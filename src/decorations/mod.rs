//! The decorations toarupanel provides.
//!
//! Each decoration is a [`Decoration`](crate::controller::Decoration)
//! driven by its own preference key.

mod activities;
mod buttons;
pub mod theme;

#[doc(inline)]
pub use activities::ActivitiesButton;
#[doc(inline)]
pub use buttons::{perform_action, ButtonGroup, WindowButtons};
#[doc(inline)]
pub use theme::{available_themes, ThemeHandle, ThemeSlot};
