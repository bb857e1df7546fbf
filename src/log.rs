use crate::config::Config;
use regex::Regex;
use std::panic::PanicHookInfo;

const REDACTED: &str = "<redacted>";

pub trait Logger {
    fn start(&self);
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
    fn panic(&self, info: &PanicHookInfo<'_>);
}

/// Writes to the CI job output. Info goes to stdout, everything else to stderr.
#[derive(Clone)]
pub struct ConsoleLogger {
    redactor: Redactor,
}

impl Logger for ConsoleLogger {
    fn start(&self) {
        self.info(&format!(
            "{} v{} starting",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ));
    }

    fn info(&self, message: &str) {
        println!("[INFO] {}", self.redactor.redact(message));
    }

    fn warning(&self, message: &str) {
        eprintln!("[WARN] {}", self.redactor.redact(message));
    }

    fn error(&self, message: &str) {
        eprintln!("[ERROR] {}", self.redactor.redact(message));
    }

    fn panic(&self, info: &PanicHookInfo<'_>) {
        self.error(&format!("Panicked: {}", info));
    }
}

pub fn get_logger(config: &Config) -> ConsoleLogger {
    ConsoleLogger {
        redactor: Redactor::new(&[config.bot_token.expose()]),
    }
}

/// Strips secrets out of a log line: the configured values themselves, plus anything
/// shaped like a bot token inside an API URL path.
#[derive(Clone)]
pub struct Redactor {
    secrets: Vec<String>,
    bot_path: Regex,
}

impl Redactor {
    pub fn new(secrets: &[&str]) -> Self {
        let mut secrets: Vec<String> = secrets
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();

        // Longest first, so a secret containing another is replaced whole.
        secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));

        Self {
            secrets,
            bot_path: Regex::new(r"/bot\d+:[A-Za-z0-9_-]+").expect("bot path pattern is valid"),
        }
    }

    pub fn redact(&self, line: &str) -> String {
        let mut line = line.to_string();

        for secret in &self.secrets {
            line = line.replace(secret.as_str(), REDACTED);
        }

        self.bot_path
            .replace_all(&line, format!("/bot{}", REDACTED).as_str())
            .into_owned()
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Level {
        Info,
        Warning,
        Error,
    }

    /// Keeps every line in memory, already redacted the way the console logger would.
    pub struct MemoryLogger {
        redactor: Redactor,
        pub lines: RefCell<Vec<(Level, String)>>,
    }

    impl MemoryLogger {
        pub fn new(config: &Config) -> Self {
            Self {
                redactor: get_logger(config).redactor,
                lines: RefCell::new(Vec::new()),
            }
        }

        pub fn lines_at(&self, level: Level) -> Vec<String> {
            self.lines
                .borrow()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect()
        }

        fn push(&self, level: Level, message: &str) {
            self.lines
                .borrow_mut()
                .push((level, self.redactor.redact(message)));
        }
    }

    impl Logger for MemoryLogger {
        fn start(&self) {}

        fn info(&self, message: &str) {
            self.push(Level::Info, message);
        }

        fn warning(&self, message: &str) {
            self.push(Level::Warning, message);
        }

        fn error(&self, message: &str) {
            self.push(Level::Error, message);
        }

        fn panic(&self, info: &PanicHookInfo<'_>) {
            self.push(Level::Error, &info.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_configured_secrets() {
        let redactor = Redactor::new(&["123456:secret-token"]);

        assert_eq!(
            redactor.redact("token 123456:secret-token rejected"),
            "token <redacted> rejected"
        );
    }

    #[test]
    fn test_redacts_bot_url_segment() {
        let redactor = Redactor::new(&[]);

        assert_eq!(
            redactor.redact("POST https://api.telegram.org/bot999:other-Token_1/sendMessage failed"),
            "POST https://api.telegram.org/bot<redacted>/sendMessage failed"
        );
    }

    #[test]
    fn test_leaves_ordinary_paths_alone() {
        let redactor = Redactor::new(&["123456:secret-token"]);

        assert_eq!(
            redactor.redact("reading event payload /home/runner/bots/event.json"),
            "reading event payload /home/runner/bots/event.json"
        );
        assert_eq!(
            redactor.redact("GET /bot/status"),
            "GET /bot/status"
        );
    }

    #[test]
    fn test_leaves_ordinary_lines_alone() {
        let redactor = Redactor::new(&["123456:secret-token", ""]);

        assert_eq!(
            redactor.redact("Message sent successfully."),
            "Message sent successfully."
        );
    }

    #[test]
    fn test_short_channel_id_does_not_mangle_numbers() {
        let config = crate::config::config_from(|key| match key {
            "TELEGRAM_BOT_TOKEN" => Some("123456:secret-token".to_string()),
            "TELEGRAM_CHANNEL_ID" => Some("1".to_string()),
            _ => None,
        })
        .unwrap();
        let log = testing::MemoryLogger::new(&config);

        log.info("message id 17 in chat 100");

        assert_eq!(
            log.lines_at(testing::Level::Info),
            vec!["message id 17 in chat 100"]
        );
    }
}
