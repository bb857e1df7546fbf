use crate::config::Config;
use crate::error::DeliveryFailure;
use crate::event::PushEvent;
use crate::log::Logger;
use crate::telegram::{self, SentMessage, Transport};

// Telegram rejects anything longer, counted in UTF-16 code units.
const MAX_MESSAGE_LEN: usize = 4096;
const ELLIPSIS: &str = "…";

pub fn render_message(event: &PushEvent) -> String {
    let render = |message: &str| {
        format!(
            "\nℹ️ New commit pushed to the repository:\n🔄 Branch: {}\n🆕 Commit: {}\n📝 Message: {}\n",
            event.branch,
            event.short_sha(),
            message
        )
    };

    let text = render(&event.message);

    if utf16_len(&text) <= MAX_MESSAGE_LEN {
        return text;
    }

    // Shorten only the commit message, so the branch and commit lines always make it.
    let budget = MAX_MESSAGE_LEN.saturating_sub(utf16_len(&render(ELLIPSIS)));
    let text = render(&format!("{}{}", take_utf16(&event.message, budget), ELLIPSIS));

    if utf16_len(&text) <= MAX_MESSAGE_LEN {
        return text;
    }

    // Even an empty message doesn't fit, so the branch is huge: cut the whole text.
    let budget = MAX_MESSAGE_LEN - utf16_len(ELLIPSIS);
    format!("{}{}", take_utf16(&text, budget), ELLIPSIS)
}

/// The longest prefix of `text` that fits in `budget` UTF-16 code units.
fn take_utf16(text: &str, budget: usize) -> &str {
    let mut used = 0;

    for (i, c) in text.char_indices() {
        used += c.len_utf16();
        if used > budget {
            return &text[..i];
        }
    }

    text
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Sends one notification for the push. Logs exactly one line about the outcome and never retries.
pub fn notify(
    config: &Config,
    transport: &dyn Transport,
    log: &dyn Logger,
    event: &PushEvent,
) -> Result<SentMessage, DeliveryFailure> {
    let text = render_message(event);

    match telegram::send_message(transport, config, &text) {
        Ok(sent) => {
            log.info("Message sent successfully.");
            Ok(sent)
        }
        Err(e) => {
            log.error(&format!("Error sending message: {}", e));
            Err(e)
        }
    }
}
