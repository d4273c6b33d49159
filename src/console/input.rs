use std::{
    io::{self, BufRead},
    thread,
};

use tokio::sync::mpsc;

const LINE_BUFFER: usize = 16;

pub type LineReceiver = mpsc::Receiver<io::Result<String>>;

/// Forwards lines from `reader` on a detached OS thread. A read that is still
/// blocked when the console stops does not keep the process alive.
///
/// The channel closes at end of input, after the first read error, or once
/// the receiver is dropped and the next line arrives.
pub fn spawn_line_reader<R>(reader: R) -> io::Result<LineReceiver>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;

    #[tokio::test]
    async fn forwards_lines_then_closes_at_eof() {
        let mut lines = spawn_line_reader(Cursor::new("/mode text\nVanakkam\n")).unwrap();
        assert_eq!(lines.recv().await.unwrap().unwrap(), "/mode text");
        assert_eq!(lines.recv().await.unwrap().unwrap(), "Vanakkam");
        assert!(lines.recv().await.is_none());
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("tty gone"))
        }
    }

    #[tokio::test]
    async fn read_error_is_forwarded_once() {
        let mut lines = spawn_line_reader(io::BufReader::new(Broken)).unwrap();
        assert!(lines.recv().await.unwrap().is_err());
        assert!(lines.recv().await.is_none());
    }
}
