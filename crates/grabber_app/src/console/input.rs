/// Nickname used for lines typed without a `<nick>` prefix.
pub(crate) const LOCAL_NICK: &str = "you";

/// One line typed into the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConsoleInput {
    Join(String),
    Say { sender: String, text: String },
    Act { sender: String, text: String },
    Quit,
}

/// `/join #chan`, `/me text`, `/quit`, `<nick> text`, or a plain message.
/// Blank lines yield nothing.
pub(crate) fn parse_line(line: &str) -> Option<ConsoleInput> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    if let Some(channel) = line.strip_prefix("/join ") {
        let channel = channel.trim();
        return (!channel.is_empty()).then(|| ConsoleInput::Join(channel.to_string()));
    }
    if let Some(text) = line.strip_prefix("/me ") {
        return Some(ConsoleInput::Act {
            sender: LOCAL_NICK.to_string(),
            text: text.to_string(),
        });
    }
    if line.trim() == "/quit" {
        return Some(ConsoleInput::Quit);
    }

    if let Some((nick, text)) = line
        .strip_prefix('<')
        .and_then(|rest| rest.split_once("> "))
        .filter(|(nick, _)| !nick.is_empty() && !nick.contains(' '))
    {
        return Some(ConsoleInput::Say {
            sender: nick.to_string(),
            text: text.to_string(),
        });
    }

    Some(ConsoleInput::Say {
        sender: LOCAL_NICK.to_string(),
        text: line.to_string(),
    })
}
