//! Client side of the support chat widget: the dialog tree, the widget session
//! that walks it and the HTTP transport for leaf submissions.

pub mod dialog;
pub mod error;
pub mod transport;
pub mod widget;

pub use dialog::{ActionItem, ActionTarget, ActionVariant, ChatAction, DialogNode};
pub use error::{ChatError, SupportClientError};
pub use transport::{HttpSupportTransport, SupportTransport};
pub use widget::{ActionView, ChatWidget};

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod transport_tests;

#[cfg(test)]
#[path = "tests/widget_tests.rs"]
mod widget_tests;
