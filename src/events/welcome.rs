//! First-contact welcome.
//!
//! The first direct message from an identity gets a greeting followed by the
//! help menu. The message itself is then processed normally.

use tracing::{debug, info, warn};

use crate::bot::AppState;
use crate::commands::{CommandContext, CommandRegistry};
use crate::router::{InboundEvent, OutboundMessage};

/// Command run after the greeting.
const MENU_COMMAND: &str = "help";

/// Greet `event`'s originator if this is the first time we hear from them.
///
/// Returns `true` if a greeting was sent.
pub async fn greet_first_contact(
    state: &AppState,
    registry: &CommandRegistry,
    event: &InboundEvent,
) -> bool {
    let originator = event.originator();

    // Marked seen before sending so a failed send is not retried forever.
    if !state.db.users.insert(originator).await {
        return false;
    }

    info!("First contact from {} ({})", event.sender_name, originator);

    let greeting = state
        .text("welcome.greeting")
        .replace("{name}", &event.sender_name)
        .replace("{bot}", &state.config.bot_name);

    if let Err(e) = state
        .outbound
        .send(&event.conversation, OutboundMessage::Text(greeting), None)
        .await
    {
        warn!("Failed to greet {}: {}", originator, e);
    }

    let Some(menu) = registry.resolve(MENU_COMMAND) else {
        debug!("No {} command registered, skipping menu", MENU_COMMAND);
        return true;
    };

    let prefix = state
        .config
        .prefixes
        .first()
        .map(String::as_str)
        .unwrap_or("/");

    let ctx = CommandContext {
        state,
        registry,
        event,
        prefix,
        command: MENU_COMMAND.to_string(),
        args: Vec::new(),
    };

    if let Err(e) = menu.execute(&ctx).await {
        warn!("Failed to send menu to {}: {:#}", originator, e);
    }

    true
}
