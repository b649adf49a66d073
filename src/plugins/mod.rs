//! Command handlers.
//!
//! Add a new command by:
//! 1. Creating a new file in this directory with a unit struct implementing
//!    [`CommandHandler`](crate::commands::CommandHandler)
//! 2. Adding `mod your_plugin;` below
//! 3. Registering it in `register_all()`

mod dua;
mod echo;
mod help;
mod info;
mod owner;
mod ping;
mod quiz;
mod quran;
mod sticker;
mod time;

use crate::commands::{Category, CommandDescriptor, CommandRegistry};

/// Register every built-in command.
pub fn register_all(registry: &mut CommandRegistry) {
    // General
    registry.register(
        CommandDescriptor::new("help", Category::General, "commands.help", help::Help)
            .aliases(&["menu", "start", "مساعدة"]),
    );
    registry.register(CommandDescriptor::new("info", Category::General, "commands.info", info::Info));
    registry.register(CommandDescriptor::new("time", Category::General, "commands.time", time::Time));
    registry.register(CommandDescriptor::new("ping", Category::General, "commands.ping", ping::Ping));
    registry.register(CommandDescriptor::new("echo", Category::General, "commands.echo", echo::Echo));

    // Quran
    registry.register(
        CommandDescriptor::new("surah", Category::Quran, "commands.surah", quran::SurahCommand)
            .aliases(&["سورة"]),
    );
    registry.register(
        CommandDescriptor::new("ayah", Category::Quran, "commands.ayah", quran::AyahCommand)
            .aliases(&["آية", "اية"]),
    );
    registry.register(
        CommandDescriptor::new("tafsir", Category::Quran, "commands.tafsir", quran::TafsirCommand)
            .aliases(&["تفسير"]),
    );
    registry.register(
        CommandDescriptor::new("audio", Category::Quran, "commands.audio", quran::AudioCommand)
            .aliases(&["تلاوة"]),
    );
    registry.register(
        CommandDescriptor::new("page", Category::Quran, "commands.page", quran::PageCommand)
            .aliases(&["صفحة"]),
    );
    registry.register(
        CommandDescriptor::new("dua", Category::Quran, "commands.dua", dua::Dua).aliases(&["دعاء"]),
    );

    // Quiz
    registry.register(
        CommandDescriptor::new("quiz", Category::Quiz, "commands.quiz", quiz::Quiz)
            .aliases(&["مسابقة"]),
    );

    // Media
    registry.register(CommandDescriptor::new(
        "sticker",
        Category::Media,
        "commands.sticker",
        sticker::Sticker,
    ));

    // Owner
    registry.register(
        CommandDescriptor::new("broadcast", Category::Owner, "commands.broadcast", owner::Broadcast)
            .owner_only(),
    );
    registry.register(
        CommandDescriptor::new("chatstats", Category::Owner, "commands.chatstats", owner::ChatStats)
            .owner_only(),
    );
}
