use crate::core::interpreter::RenderSink;
use colored::*;
use std::io::{self, Write};

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_prompt(text: &str) {
    print!("{}", text.yellow().bold());
    let _ = io::stdout().flush();
}

pub fn print_reply(text: &str) {
    println!("{}{}", "Agentic AI: ".bright_magenta().bold(), text);
}

/// Writes streamed fragments to stdout as they arrive
pub struct ConsoleSink {
    stdout: io::Stdout,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for ConsoleSink {
    fn begin(&mut self) {
        let _ = write!(self.stdout, "{}", "Agentic AI: ".bright_magenta().bold());
        let _ = self.stdout.flush();
    }

    fn fragment(&mut self, text: &str) {
        let _ = write!(self.stdout, "{}", text);
        let _ = self.stdout.flush();
    }

    fn end(&mut self) {
        let _ = writeln!(self.stdout);
    }
}
