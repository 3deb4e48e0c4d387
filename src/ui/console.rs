use std::future::Future;
use std::io::{self, BufRead, Write};
use std::thread;
use tokio::sync::mpsc;

/// Receives the formatted lines the monitor produces.
pub trait OutputSink {
    fn emit(&mut self, line: &str);
}

/// Next line of user input. `Ok(None)` means the input is closed.
pub trait CommandSource {
    fn next_line(&mut self, prompt: &str) -> impl Future<Output = io::Result<Option<String>>>;
}

pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Reads commands from stdin, printing the prompt first.
///
/// Lines are read on a plain thread and handed over a channel, so a pending
/// read never holds up runtime shutdown.
pub struct StdinCommands {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl StdinCommands {
    pub fn new() -> Self {
        let (line_tx, line_rx) = mpsc::channel(16);

        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        Self::from_receiver(line_rx)
    }

    fn from_receiver(lines: mpsc::Receiver<io::Result<String>>) -> Self {
        Self { lines }
    }
}

impl Default for StdinCommands {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSource for StdinCommands {
    async fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;
        self.lines.recv().await.transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_lines_until_the_reader_stops() {
        let (line_tx, line_rx) = mpsc::channel(4);
        let mut commands = StdinCommands::from_receiver(line_rx);

        line_tx.send(Ok("eth".to_string())).await.unwrap();
        line_tx
            .send(Err(io::Error::new(io::ErrorKind::InvalidData, "not utf-8")))
            .await
            .unwrap();
        drop(line_tx);

        assert_eq!(commands.next_line("> ").await.unwrap(), Some("eth".to_string()));
        assert!(commands.next_line("> ").await.is_err());
        assert_eq!(commands.next_line("> ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn dropping_commands_releases_the_reader() {
        let (line_tx, line_rx) = mpsc::channel::<io::Result<String>>(1);
        drop(StdinCommands::from_receiver(line_rx));
        assert!(line_tx.is_closed());
    }
}
