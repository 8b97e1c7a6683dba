//! Interactive prompt for looking up magnet links by row number.

use std::io::Write;

use colored::Colorize;
use tokio::sync::mpsc;
use undertow_core::CanonicalResult;

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Exit,
    /// Zero-based row
    Show(usize),
    OutOfRange,
    NotANumber,
}

fn interpret(input: &str, rows: usize) -> Choice {
    let input = input.trim();
    if input == "0" || input.eq_ignore_ascii_case("exit") {
        return Choice::Exit;
    }

    match input.parse::<usize>() {
        Ok(number) if (1..=rows).contains(&number) => Choice::Show(number - 1),
        Ok(_) => Choice::OutOfRange,
        Err(_) if input.parse::<i64>().is_ok() => Choice::OutOfRange,
        Err(_) => Choice::NotANumber,
    }
}

/// Lines from stdin, read on a detached thread so Ctrl-C never waits on a
/// blocked read. The channel closes at EOF.
fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Prompts until `0`, `exit`, Ctrl-C or end of input.
pub(crate) async fn browse(results: &[CanonicalResult]) -> anyhow::Result<()> {
    let mut lines = stdin_lines();

    loop {
        print!(
            "{}",
            "\nEnter torrent number to get magnet link (0 to exit): ".blue()
        );
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };
        let Some(line) = line else { break };

        match interpret(&line, results.len()) {
            Choice::Exit => break,
            Choice::Show(index) => {
                match results.get(index).and_then(|r| r.raw.magnet.as_deref()) {
                    Some(magnet) if !magnet.is_empty() => {
                        println!("{}", "\nMagnet Link:".yellow().bold());
                        println!("{magnet}");
                    }
                    _ => println!("{}", "Magnet link not found for this torrent.".red()),
                }
            }
            Choice::OutOfRange => println!("{}", "Invalid number! Please try again.".red()),
            Choice::NotANumber => println!("{}", "Please enter a valid number!".red()),
        }
    }

    Ok(())
}
