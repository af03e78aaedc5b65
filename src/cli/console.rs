use colored::*;
use std::io::{self, Write};

/// Console handles all terminal I/O with colored formatting
pub struct Console {
    user_color: Color,
    agent_color: Color,
}

impl Console {
    /// Create a new Console with default colors
    pub fn new() -> Self {
        Self {
            user_color: Color::Cyan,
            agent_color: Color::Green,
        }
    }

    /// Create a new Console with custom colors
    pub fn with_colors(user_color: Color, agent_color: Color) -> Self {
        Self {
            user_color,
            agent_color,
        }
    }

    /// Print the agent's reply with colored formatting
    pub fn print_agent(&self, message: &str) {
        println!(
            "{} {}",
            "Agent:".color(self.agent_color).bold(),
            message.color(self.agent_color)
        );
    }

    /// Print a system message (status, info)
    pub fn print_system(&self, message: &str) {
        println!("{} {}", "System:".yellow().bold(), message);
    }

    /// Print an error message
    pub fn print_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    /// Read a line of input from the user
    pub fn read_input(&self) -> io::Result<String> {
        print!("{} ", ">".color(self.user_color).bold());
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    /// Prompt for a secret value (e.g. the API key)
    pub fn read_secret(&self, prompt: &str) -> io::Result<String> {
        print!("{} ", format!("{}:", prompt).yellow().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }

    /// Print a welcome banner
    pub fn print_banner(&self) {
        println!("{}", "=".repeat(60).bright_blue());
        println!("{}", "  Tax Provider - product tax rate lookup".bright_blue().bold());
        println!("{}", "=".repeat(60).bright_blue());
        println!();
        println!("Upload a tax-rate text file, then ask about a product.");
        println!("Commands:");
        println!("  /upload <path>     upload the knowledge-source file");
        println!("  /download [path]   save the conversation (default conversation.txt)");
        println!("  exit | quit        end the session");
        println!();
    }

    /// Print a separator line
    pub fn print_separator(&self) {
        println!("{}", "-".repeat(60).bright_black());
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
