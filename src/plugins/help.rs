//! Help / menu command.
//!
//! Lists every registered command grouped by category. Owner commands are
//! only listed for owners.

use async_trait::async_trait;

use crate::commands::{Category, CommandContext, CommandHandler};

pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        ctx.reply_text(render_menu(ctx)).await
    }
}

fn render_menu(ctx: &CommandContext<'_>) -> String {
    let is_owner = ctx.state.permissions.is_bot_owner(ctx.originator());
    let mut out = ctx.text("menu.title").replace("{bot}", &ctx.state.config.bot_name);

    for (category, commands) in ctx.registry.by_category() {
        if category == Category::Owner && !is_owner {
            continue;
        }

        out.push_str("\n\n");
        out.push_str(&ctx.text(category.key()));

        for command in commands {
            out.push_str(&format!("\n• {}{}", ctx.prefix, command.name));
            if !command.aliases.is_empty() {
                out.push_str(&format!(" ({})", command.aliases.join(", ")));
            }
            out.push_str(&format!(" - {}", ctx.text(command.description)));
        }
    }

    out.push_str("\n\n");
    out.push_str(&ctx.usage("menu.footer"));
    out
}
