//! Ambient supplication replies.
//!
//! Messages containing Arabic text occasionally get a short supplication or
//! reminder in return, independent of whether they are commands.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::bot::AppState;
use crate::i18n::get_list;
use crate::router::{InboundEvent, OutboundMessage, contains_arabic_letter};

/// i18n list the replies are drawn from.
pub const SUPPLICATIONS: &str = "ambient.supplications";

/// A random supplication in `lang`, if any are defined.
pub fn random_supplication(lang: &str) -> Option<String> {
    get_list(lang, SUPPLICATIONS)
        .choose(&mut rand::thread_rng())
        .cloned()
}

/// Roll a 1-in-`chance` die. A chance of 0 never hits.
fn roll(chance: u32) -> bool {
    chance > 0 && rand::thread_rng().gen_range(0..chance) == 0
}

/// Maybe reply to `text` with a supplication. Returns `Ok(true)` if one was sent.
pub async fn maybe_reply(state: &AppState, event: &InboundEvent, text: &str) -> anyhow::Result<bool> {
    let config = &state.config;
    if !config.ambient_reply || !contains_arabic_letter(text) || !roll(config.ambient_chance) {
        return Ok(false);
    }

    let Some(reply) = random_supplication(&config.lang) else {
        return Ok(false);
    };

    debug!("Ambient reply in {}", event.conversation);
    state
        .outbound
        .send(
            &event.conversation,
            OutboundMessage::Text(reply),
            event.message_id.as_deref(),
        )
        .await?;
    Ok(true)
}
