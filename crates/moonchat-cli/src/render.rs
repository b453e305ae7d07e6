use std::io::{self, Write};

use colored::Colorize;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

pub struct Renderer {
    skin: MadSkin,
    raw: bool,
}

impl Renderer {
    pub fn new(raw: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.headers[0].set_fg(Color::Cyan);
        skin.code_block.set_fg(Color::Yellow);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin, raw }
    }

    /// Print a streamed fragment as it arrives.
    pub fn delta(&self, text: &str) {
        print!("{text}");
        let _ = io::stdout().flush();
    }

    /// Close the streamed line and re-render the finished answer as
    /// terminal markdown, unless raw output was asked for.
    pub fn finish_turn(&self, content: &str) {
        println!();
        if !self.raw && !content.is_empty() {
            println!();
            self.skin.print_text(content);
        }
    }

    pub fn turn_failed(&self, text: &str) {
        println!("{}", text.red());
    }
}
