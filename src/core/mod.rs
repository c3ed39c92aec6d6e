//! This module contains the core types used within toarupanel.
//! It contains the types that the decorations use to reason about
//! preferences, layouts, windows and their own subscriptions.

/// Window button layouts and their parsing.
pub mod layout;
/// Subscription bookkeeping.
pub mod subscription;
/// Basic types used throughout toarupanel.
pub mod types;
/// Predicates over windows.
pub mod window;

pub use layout::{ButtonDescriptor, ButtonLayout, LayoutParser, SettingsLayoutParser};
pub use subscription::{Subscription, SubscriptionSet};
pub use window::{MaximizeMatch, MaximizePolicy, StandardPolicy, WindowPolicy};
