use crate::log_debug;
use crossbeam_channel::Sender;
use std::io::{ErrorKind, Read};
use std::thread;

const INPUT_READ_BYTES: usize = 1024;

/// Drain raw input and forward each read as one chunk. End of stream or a
/// read error closes the channel.
pub fn spawn_input_thread<R>(mut reader: R, tx: Sender<Vec<u8>>) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; INPUT_READ_BYTES];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    log_debug(&format!("stdin read error: {err}"));
                    break;
                }
            };
            if tx.send(buf[..n].to_vec()).is_err() {
                return;
            }
        }
        log_debug("input stream closed");
    })
}
