//! Line-driven interactive converter.
//!
//! Each input line is one user action on the form. The form is redrawn after
//! every action, so edits clearing a previous result show up immediately.

use super::{convert, ui};
use crate::core::CurrencyCode;
use crate::core::amount::Key;
use crate::core::config::AppConfig;
use crate::core::converter::Converter;
use anyhow::{Context, Result, anyhow, bail};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  amount <text>   type <text> into the amount field
  paste <text>    paste <text> into the amount field
  back            delete the last character of the amount
  clear           empty the amount field
  from <CODE>     select the source currency
  to <CODE>       select the target currency
  convert         convert the amount
  show            redraw the form
  help            show this help
  quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Type(String),
    Paste(String),
    Back,
    Clear,
    From(CurrencyCode),
    To(CurrencyCode),
    Convert,
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<SessionCommand> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "amount" | "type" => SessionCommand::Type(rest.to_string()),
        "paste" => SessionCommand::Paste(rest.to_string()),
        "back" | "backspace" => SessionCommand::Back,
        "clear" => SessionCommand::Clear,
        "from" => SessionCommand::From(parse_code(rest)?),
        "to" => SessionCommand::To(parse_code(rest)?),
        "convert" | "c" => SessionCommand::Convert,
        "show" | "" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => bail!("Unknown command: {other} (try 'help')"),
    };
    Ok(command)
}

fn parse_code(text: &str) -> Result<CurrencyCode> {
    if text.is_empty() {
        return Err(anyhow!("Missing currency code"));
    }
    text.parse()
}

/// Applies one command. Returns `false` when the session should end.
pub async fn apply(converter: &mut Converter, command: SessionCommand) -> bool {
    match command {
        SessionCommand::Type(text) => {
            converter.type_amount(&text);
        }
        SessionCommand::Paste(text) => {
            converter.paste_amount(&text);
        }
        SessionCommand::Back => {
            converter.press(Key::Backspace);
        }
        SessionCommand::Clear => {
            converter.clear_amount();
        }
        SessionCommand::From(code) => {
            converter.set_from(code);
        }
        SessionCommand::To(code) => {
            converter.set_to(code);
        }
        SessionCommand::Convert => {
            if converter.can_convert() {
                convert::submit(converter).await;
            } else {
                ui::alert("Convert is disabled until a valid amount is entered.");
            }
        }
        SessionCommand::Show => {}
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => return false,
    }
    true
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let mut converter = convert::new_converter(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", ui::style_text("Currency Converter", ui::StyleType::Title));
    println!("{}", ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle));
    println!("{}", ui::render_snapshot(&converter.snapshot()));

    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                continue;
            }
        };
        if !apply(&mut converter, command).await {
            break;
        }
        println!("{}", ui::render_snapshot(&converter.snapshot()));
    }
    Ok(())
}
