//! Unix domain socket feed of controller lifecycle and state lines.
//!
//! One command per line:
//!
//! ```text
//! CONNECT <index> <button_count> <axis_count> <id...>
//! STATE <index> <b0,b1,...|-> <a0,a1,...|->
//! DISCONNECT <index>
//! PROFILE <index> <profileName>
//! STYLE <index> <userProfileName...>
//! MASK on|off
//! DEBUG on|off
//! ```

use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::Path;
use std::sync::mpsc::Sender;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::gamepad::ButtonReading;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedCommand {
    Connect { index: u32, buttons: usize, axes: usize, id: String },
    State { index: u32, buttons: Vec<ButtonReading>, axes: Vec<f32> },
    Disconnect { index: u32 },
    Profile { index: u32, name: String },
    Style { index: u32, name: String },
    Mask(bool),
    Debug(bool),
}

/// Listen for commands on a Unix domain socket. Blocks forever.
pub fn listen<T: From<FeedCommand>>(path: &Path, tx: Sender<T>) -> Result<()> {
    // Remove stale socket
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }

    let listener = UnixListener::bind(path)?;
    info!("Feed listening at {}", path.display());

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let reader = BufReader::new(stream);
                for line in reader.lines() {
                    match line {
                        Ok(line) => match parse_command(&line) {
                            Some(cmd) => {
                                if tx.send(cmd.into()).is_err() {
                                    return Err(Error::Io(std::io::Error::new(
                                        std::io::ErrorKind::BrokenPipe,
                                        "feed channel closed",
                                    )));
                                }
                            }
                            None if line.trim().is_empty() => {}
                            None => warn!("Ignoring malformed feed line: {line:?}"),
                        },
                        Err(e) => {
                            warn!("Feed read error: {e}");
                            break;
                        }
                    }
                }
                debug!("Feed client disconnected");
            }
            Err(e) => warn!("Feed accept error: {e}"),
        }
    }

    Ok(())
}

pub fn parse_command(line: &str) -> Option<FeedCommand> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match verb {
        "CONNECT" => {
            let mut parts = rest.splitn(4, ' ');
            let index = parts.next()?.parse().ok()?;
            let buttons = parts.next()?.parse().ok()?;
            let axes = parts.next()?.parse().ok()?;
            let id = parts.next().unwrap_or("").trim().to_string();
            Some(FeedCommand::Connect { index, buttons, axes, id })
        }
        "STATE" => {
            let mut parts = rest.split_whitespace();
            let index = parts.next()?.parse().ok()?;
            let buttons = parse_list(parts.next()?)?.into_iter().map(ButtonReading::new).collect();
            let axes = parse_list(parts.next()?)?;
            if parts.next().is_some() {
                return None;
            }
            Some(FeedCommand::State { index, buttons, axes })
        }
        "DISCONNECT" => Some(FeedCommand::Disconnect { index: rest.parse().ok()? }),
        "PROFILE" | "STYLE" => {
            let (index, name) = rest.split_once(' ')?;
            let index = index.parse().ok()?;
            let name = name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(if verb == "PROFILE" {
                FeedCommand::Profile { index, name }
            } else {
                FeedCommand::Style { index, name }
            })
        }
        "MASK" => parse_switch(rest).map(FeedCommand::Mask),
        "DEBUG" => parse_switch(rest).map(FeedCommand::Debug),
        _ => None,
    }
}

/// Comma-separated floats; `-` is the empty list.
fn parse_list(field: &str) -> Option<Vec<f32>> {
    if field == "-" {
        return Some(Vec::new());
    }
    field.split(',').map(|v| v.parse::<f32>().ok().filter(|f| f.is_finite())).collect()
}

fn parse_switch(s: &str) -> Option<bool> {
    match s {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_connect_keeps_id_spaces() {
        let cmd = parse_command("CONNECT 0 17 4 Microsoft Controller (STANDARD GAMEPAD Vendor: 045e Product: 02ea)");
        assert_eq!(
            cmd,
            Some(FeedCommand::Connect {
                index: 0,
                buttons: 17,
                axes: 4,
                id: "Microsoft Controller (STANDARD GAMEPAD Vendor: 045e Product: 02ea)".into(),
            })
        );
        assert!(matches!(parse_command("CONNECT 2 0 0"), Some(FeedCommand::Connect { index: 2, ref id, .. }) if id.is_empty()));
    }

    #[test]
    fn parse_state() {
        match parse_command("STATE 1 0,1,0.5 -0.25,1") {
            Some(FeedCommand::State { index, buttons, axes }) => {
                assert_eq!(index, 1);
                assert_eq!(buttons.len(), 3);
                assert!(!buttons[0].pressed);
                assert!(buttons[1].pressed && buttons[1].touched);
                assert_eq!(buttons[2].value, 0.5);
                assert_eq!(axes, vec![-0.25, 1.0]);
            }
            other => panic!("expected State, got {other:?}"),
        }
        assert!(matches!(parse_command("STATE 4 - -"), Some(FeedCommand::State { ref buttons, ref axes, .. }) if buttons.is_empty() && axes.is_empty()));
    }

    #[test]
    fn parse_switches_and_overrides() {
        assert_eq!(parse_command("MASK on"), Some(FeedCommand::Mask(true)));
        assert_eq!(parse_command("DEBUG off"), Some(FeedCommand::Debug(false)));
        assert_eq!(parse_command("DISCONNECT 3"), Some(FeedCommand::Disconnect { index: 3 }));
        assert_eq!(
            parse_command("PROFILE 0 XBoxOne360ControllerFirefox"),
            Some(FeedCommand::Profile { index: 0, name: "XBoxOne360ControllerFirefox".into() })
        );
        assert_eq!(
            parse_command("STYLE 0 Default (Dark)"),
            Some(FeedCommand::Style { index: 0, name: "Default (Dark)".into() })
        );
    }

    #[test]
    fn parse_malformed_returns_none() {
        assert!(parse_command("GARBAGE").is_none());
        assert!(parse_command("").is_none());
        assert!(parse_command("MASK maybe").is_none());
        assert!(parse_command("STATE 0 1,x 0").is_none());
        assert!(parse_command("STATE 0 1 0 extra").is_none());
        assert!(parse_command("STATE 0 NaN -").is_none());
        assert!(parse_command("CONNECT zero 17 4 pad").is_none());
        assert!(parse_command("STYLE 0").is_none());
    }

    #[test]
    fn listen_forwards_commands() {
        use std::io::Write;
        use std::os::unix::net::UnixStream;
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.sock");
        let (tx, rx) = std::sync::mpsc::channel::<FeedCommand>();
        let listen_path = path.clone();
        std::thread::spawn(move || listen(&listen_path, tx));

        let mut stream = None;
        for _ in 0..100 {
            if let Ok(s) = UnixStream::connect(&path) {
                stream = Some(s);
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        let mut stream = stream.expect("feed socket never came up");
        stream.write_all(b"MASK on\nnonsense\nDISCONNECT 7\n").unwrap();

        let timeout = Duration::from_secs(5);
        assert_eq!(rx.recv_timeout(timeout).unwrap(), FeedCommand::Mask(true));
        assert_eq!(rx.recv_timeout(timeout).unwrap(), FeedCommand::Disconnect { index: 7 });
    }
}
