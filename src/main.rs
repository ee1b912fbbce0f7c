use std::io::{self, Write};

use anyhow::Result;
use crossterm::{cursor, execute, terminal};
use nimbus_core::Config;
use nimbus_shell::{Command, Reply, Shell};
use tokio::io::{AsyncBufReadExt, BufReader};

fn redraw(shell: &Shell) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    writeln!(stdout, "{}", shell.render())?;
    prompt()
}

fn prompt() -> Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    nimbus_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    tracing::info!("Config directory: {}", config.config_dir.display());

    let (mut shell, mut messages) = Shell::from_config(&config)?;
    shell.restore();
    redraw(&shell)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = match Command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => {
                        prompt()?;
                        continue;
                    }
                    Err(e) => {
                        println!("{}", e);
                        prompt()?;
                        continue;
                    }
                };
                match shell.handle_command(command) {
                    Reply::Render => redraw(&shell)?,
                    Reply::Text(text) => {
                        println!("{}", text);
                        prompt()?;
                    }
                    Reply::Quit => break,
                }
            }
            Some(message) = messages.recv() => {
                if shell.handle_message(message) {
                    redraw(&shell)?;
                }
            }
        }
    }

    tracing::info!("Nimbus exiting");
    Ok(())
}
