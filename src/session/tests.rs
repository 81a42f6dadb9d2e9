use super::*;
use crate::history::HistoryCache;
use crate::menu::{MenuRegistry, MenuRouter};
use crossbeam_channel::{bounded, unbounded, Sender};
use std::io;

fn interpreter() -> InputInterpreter {
    InputInterpreter::new(
        MenuRouter::new(MenuRegistry::bluetoothctl().expect("registry")),
        HistoryCache::new(16).expect("history"),
    )
}

fn input(chunks: &[&[u8]]) -> Receiver<Vec<u8>> {
    let (tx, rx) = unbounded();
    for chunk in chunks {
        tx.send(chunk.to_vec()).expect("queue chunk");
    }
    rx
}

fn pending_exit() -> (Sender<Result<()>>, ExitSignal) {
    bounded(1)
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn routes_lines_across_submenus_until_quit() {
    let mut interp = interpreter();
    let rx = input(&[b"scan on\r", b"uuids\r", b"set-name on\r", b"power off\r", b"quit\r"]);
    let (_exit_tx, exit_rx) = pending_exit();
    let mut display = Vec::new();
    let mut sink = Vec::new();
    let end = run_session(&mut interp, &rx, &exit_rx, &mut display, &mut sink).expect("session");
    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(
        String::from_utf8(sink).expect("utf8"),
        "scan on\nmenu scan\nuuids\nback\nmenu advertise\nset-name on\nback\npower off\n"
    );
    assert!(String::from_utf8_lossy(&display).contains("power off\r\n"));
}

#[test]
fn closed_input_ends_session() {
    let mut interp = interpreter();
    let rx = input(&[b"devices\r"]);
    let (_exit_tx, exit_rx) = pending_exit();
    let mut sink = Vec::new();
    let end = run_session(&mut interp, &rx, &exit_rx, &mut Vec::new(), &mut sink)
        .expect("session");
    assert_eq!(end, SessionEnd::InputClosed);
    assert_eq!(sink, b"devices\n");
}

#[test]
fn ctrl_d_ends_session() {
    let mut interp = interpreter();
    let (tx, rx) = unbounded();
    tx.send(b"ab\x04".to_vec()).expect("queue chunk");
    let (_exit_tx, exit_rx) = pending_exit();
    let end = run_session(&mut interp, &rx, &exit_rx, &mut Vec::new(), &mut Vec::new())
        .expect("session");
    assert_eq!(end, SessionEnd::EndOfInput);
}

#[test]
fn help_prints_reference_to_display() {
    let mut interp = interpreter();
    let rx = input(&[b"help\r"]);
    let (_exit_tx, exit_rx) = pending_exit();
    let mut display = Vec::new();
    let mut sink = Vec::new();
    run_session(&mut interp, &rx, &exit_rx, &mut display, &mut sink).expect("session");
    let shown = String::from_utf8_lossy(&display);
    assert!(shown.contains("common:"));
    assert!(shown.contains("list-attributes"));
    assert_eq!(sink, b"\n");
}

#[test]
fn unknown_escape_aborts_with_error() {
    let mut interp = interpreter();
    let rx = input(&[b"\x1b[Z"]);
    let (_exit_tx, exit_rx) = pending_exit();
    let err = run_session(&mut interp, &rx, &exit_rx, &mut Vec::new(), &mut Vec::new())
        .unwrap_err();
    assert!(format!("{err:#}").contains("unrecognized escape sequence"));
}

#[test]
fn sink_failure_surfaces_as_error() {
    let mut interp = interpreter();
    let rx = input(&[b"devices\r"]);
    let (_exit_tx, exit_rx) = pending_exit();
    let err = run_session(&mut interp, &rx, &exit_rx, &mut Vec::new(), &mut BrokenPipe)
        .unwrap_err();
    assert!(err.to_string().contains("write to controller failed"));
}

#[test]
fn controller_exit_ends_session() {
    let mut interp = interpreter();
    let (_input_tx, rx) = unbounded::<Vec<u8>>();
    let (exit_tx, exit_rx) = pending_exit();
    exit_tx.send(Ok(())).expect("signal exit");
    let end = run_session(&mut interp, &rx, &exit_rx, &mut Vec::new(), &mut Vec::new())
        .expect("session");
    assert_eq!(end, SessionEnd::ControllerExited);
    assert!(finish(Vec::new(), &exit_rx, end).is_ok());
}

#[test]
fn controller_failure_is_propagated() {
    let mut interp = interpreter();
    let (_input_tx, rx) = unbounded::<Vec<u8>>();
    let (exit_tx, exit_rx) = pending_exit();
    exit_tx
        .send(Err(anyhow!("bluetoothctl exited with exit status: 1")))
        .expect("signal exit");
    let err = run_session(&mut interp, &rx, &exit_rx, &mut Vec::new(), &mut Vec::new())
        .unwrap_err();
    assert!(err.to_string().contains("exit status: 1"));
}

#[test]
fn finish_waits_for_completion_signal() {
    let (exit_tx, exit_rx) = pending_exit();
    exit_tx
        .send(Err(anyhow!("controller failed")))
        .expect("signal exit");
    let err = finish(Vec::new(), &exit_rx, SessionEnd::Quit).unwrap_err();
    assert_eq!(err.to_string(), "controller failed");

    let (exit_tx, exit_rx) = pending_exit();
    drop(exit_tx);
    assert!(finish(Vec::new(), &exit_rx, SessionEnd::Quit).is_err());
}

#[test]
fn input_thread_forwards_chunks_then_closes() {
    let (tx, rx) = bounded(INPUT_CHANNEL_CAPACITY);
    let handle = spawn_input_thread(io::Cursor::new(b"scan on\r".to_vec()), tx);
    let mut received = Vec::new();
    for chunk in rx.iter() {
        received.extend(chunk);
    }
    handle.join().expect("input thread");
    assert_eq!(received, b"scan on\r");
}

#[cfg(unix)]
#[test]
fn controller_reports_exit_status() {
    let args = vec!["-c".to_string(), "exit 3".to_string()];
    let controller = ControllerProcess::spawn("sh", &args).expect("spawn sh");
    assert!(controller.pid() > 0);
    let (stdin, exit_rx) = controller.into_parts();
    let err = finish(stdin, &exit_rx, SessionEnd::Quit).unwrap_err();
    assert!(err.to_string().contains("sh exited with"));
}

#[cfg(unix)]
#[test]
fn controller_exits_cleanly_when_input_closes() {
    let args = vec!["-c".to_string(), "cat > /dev/null".to_string()];
    let controller = ControllerProcess::spawn("sh", &args).expect("spawn sh");
    let (mut stdin, exit_rx) = controller.into_parts();
    stdin.write_all(b"devices\n").expect("write to controller");
    assert!(finish(stdin, &exit_rx, SessionEnd::Quit).is_ok());
}

#[test]
fn spawn_failure_names_the_command() {
    let err = ControllerProcess::spawn("btshell-definitely-missing-binary", &[])
        .err()
        .expect("spawn should fail");
    assert!(err
        .to_string()
        .contains("failed to spawn btshell-definitely-missing-binary"));
}
