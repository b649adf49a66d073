//! Inbound event routing.
//!
//! Converts nothing itself: the transport adapter hands over
//! [`InboundEvent`]s and receives [`OutboundMessage`]s through [`Outbound`].

mod classifier;
mod event;
mod pipeline;

#[cfg(test)]
pub mod testing;

pub use classifier::contains_arabic_letter;
pub use event::{InboundEvent, MediaRef, MessageContent, Outbound, OutboundMessage, Presence};
pub use pipeline::Router;

#[cfg(test)]
pub use pipeline::Disposition;
