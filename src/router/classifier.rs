//! Message classification helpers.

/// A parsed command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// The prefix that matched.
    pub prefix: &'a str,
    /// Lowercased command token.
    pub name: String,
    pub args: Vec<String>,
}

/// Parse `text` as a command.
///
/// Prefixes are tried in order and the first match wins. The first
/// whitespace-separated token after the prefix is the command name
/// (lowercased); the rest are arguments.
///
/// A `@username` suffix on the token is removed when it names `bot_username`
/// (ignoring ASCII case). A suffix naming any other account means the command
/// is addressed elsewhere and `None` is returned. Without a known username
/// every suffix is rejected.
pub fn parse_command<'a>(
    text: &str,
    prefixes: &'a [String],
    bot_username: Option<&str>,
) -> Option<ParsedCommand<'a>> {
    let (prefix, rest) = prefixes
        .iter()
        .filter(|p| !p.is_empty())
        .find_map(|p| text.strip_prefix(p.as_str()).map(|rest| (p.as_str(), rest)))?;

    let mut tokens = rest.split_whitespace();
    let first = tokens.next()?;
    let name = match first.split_once('@') {
        Some((name, addressee)) => {
            if !bot_username.is_some_and(|me| me.eq_ignore_ascii_case(addressee)) {
                return None;
            }
            name
        }
        None => first,
    }
    .to_lowercase();

    if name.is_empty() {
        return None;
    }

    Some(ParsedCommand {
        prefix,
        name,
        args: tokens.map(str::to_string).collect(),
    })
}

/// Whether `text` contains an Arabic letter (hamza through yeh).
pub fn contains_arabic_letter(text: &str) -> bool {
    text.chars().any(|c| ('\u{0621}'..='\u{064A}').contains(&c))
}
