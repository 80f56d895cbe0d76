//! Services the storefront controllers talk to.
//!
//! # Services
//!
//! - `notifications` - Toast notifications and confirmation prompts
//! - `slider` - Slider image CRUD behind the [`slider::SliderService`] trait

pub mod notifications;
pub mod slider;

pub use notifications::{
    ConfirmPrompt, Confirmer, Notification, NotificationCenter, Notifier, PresetAnswer, Severity,
};
pub use slider::{Latency, SimulatedSliderService, SliderError, SliderService};
