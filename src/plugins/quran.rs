//! Quran commands: surah, ayah, tafsir, audio and page.

use async_trait::async_trait;
use tracing::debug;

use crate::commands::{CommandContext, CommandHandler};
use crate::router::OutboundMessage;
use crate::services::QuranError;
use crate::services::quran::{Ayah, parse_reference};
use crate::utils::{MESSAGE_LIMIT, chunk_text};

/// Full surah text, split across messages when long.
pub struct SurahCommand;

#[async_trait]
impl CommandHandler for SurahCommand {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let Some(number) = ctx.args.first().and_then(|a| a.parse::<u32>().ok()) else {
            return ctx.reply_text(ctx.usage("quran.surah_usage")).await;
        };

        let surah = match ctx.state.quran.surah(number).await {
            Ok(surah) => surah,
            Err(e) => return reply_error(ctx, e).await,
        };

        let mut text = ctx
            .text("quran.surah_header")
            .replace("{number}", &surah.number.to_string())
            .replace("{name}", &surah.name)
            .replace("{english}", &surah.english_name)
            .replace("{count}", &surah.number_of_ayahs.to_string());
        text.push_str("\n\n");
        for ayah in &surah.ayahs {
            text.push_str(&format!("{} ﴿{}﴾\n", ayah.text, ayah.number_in_surah));
        }

        for chunk in chunk_text(&text, MESSAGE_LIMIT) {
            ctx.reply_text(chunk).await?;
        }
        Ok(())
    }
}

/// Text of one ayah.
pub struct AyahCommand;

#[async_trait]
impl CommandHandler for AyahCommand {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let Some((surah, ayah)) = parse_reference(&ctx.args) else {
            return ctx.reply_text(ctx.usage("quran.ayah_usage")).await;
        };

        match ctx.state.quran.ayah(surah, ayah).await {
            Ok(found) => ctx.reply_text(render_ayah(ctx, "quran.ayah", &found)).await,
            Err(e) => reply_error(ctx, e).await,
        }
    }
}

/// Tafsir of one ayah.
pub struct TafsirCommand;

#[async_trait]
impl CommandHandler for TafsirCommand {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let Some((surah, ayah)) = parse_reference(&ctx.args) else {
            return ctx.reply_text(ctx.usage("quran.ayah_usage")).await;
        };

        match ctx.state.quran.tafsir(surah, ayah).await {
            Ok(found) => ctx.reply_text(render_ayah(ctx, "quran.tafsir", &found)).await,
            Err(e) => reply_error(ctx, e).await,
        }
    }
}

/// Recitation of one ayah.
pub struct AudioCommand;

#[async_trait]
impl CommandHandler for AudioCommand {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let Some((surah, ayah)) = parse_reference(&ctx.args) else {
            return ctx.reply_text(ctx.usage("quran.ayah_usage")).await;
        };

        match ctx.state.quran.audio_url(surah, ayah).await {
            Ok(url) => ctx.reply(OutboundMessage::Audio { url }).await,
            Err(e) => reply_error(ctx, e).await,
        }
    }
}

/// Image of one mushaf page.
pub struct PageCommand;

#[async_trait]
impl CommandHandler for PageCommand {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        let Some(page) = ctx.args.first().and_then(|a| a.parse::<u32>().ok()) else {
            return ctx.reply_text(ctx.usage("quran.page_usage")).await;
        };

        match ctx.state.quran.page_image_url(page) {
            Ok(url) => {
                let caption = ctx.text("quran.page_caption").replace("{page}", &page.to_string());
                ctx.reply(OutboundMessage::Image {
                    url,
                    caption: Some(caption),
                })
                .await
            }
            Err(e) => reply_error(ctx, e).await,
        }
    }
}

fn render_ayah(ctx: &CommandContext<'_>, key: &str, ayah: &Ayah) -> String {
    ctx.text(key)
        .replace("{text}", &ayah.text)
        .replace("{surah}", &ayah.surah.name)
        .replace("{english}", &ayah.surah.english_name)
        .replace("{reference}", &format!("{}:{}", ayah.surah.number, ayah.number_in_surah))
}

/// User-facing errors get a localized reply; transport failures propagate.
async fn reply_error(ctx: &CommandContext<'_>, err: QuranError) -> anyhow::Result<()> {
    let key = match &err {
        QuranError::InvalidSurah(_) => "quran.invalid_surah",
        QuranError::InvalidPage(_) => "quran.invalid_page",
        QuranError::Upstream { .. } | QuranError::MissingAudio(_) => "quran.not_found",
        QuranError::Http(_) | QuranError::Payload(_) => return Err(err.into()),
    };

    debug!("Quran lookup refused: {}", err);
    ctx.reply_text(ctx.text(key)).await
}
