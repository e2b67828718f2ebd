use crossterm::tty::IsTty;

/// Environment variable holding the tracing filter directive
pub const LOG_ENV: &str = "INTEK_SH_LOG";

/// Settings fixed for the lifetime of one shell run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub primary_prompt: String,
    pub continuation_prompt: String,
    /// Read through the line editor and show prompts; otherwise read stdin as plain lines
    /// and print no prompt at all, so piped transcripts hold only command output
    pub interactive: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            primary_prompt: "intek-sh$ ".to_string(),
            continuation_prompt: "> ".to_string(),
            interactive: false,
        }
    }
}

impl ShellConfig {
    /// Default prompts, interactive when stdin is a terminal
    pub fn detect() -> Self {
        Self {
            interactive: std::io::stdin().is_tty(),
            ..Self::default()
        }
    }
}
