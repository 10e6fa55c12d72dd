// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

mod common;

use std::io;

use pretty_assertions::assert_eq;
use rcon_core::{ProtocolError, ProtocolType, Session};
use rcon_executor::{ExecutorError, Invocation};
use tempfile::TempDir;
use test_case::test_case;

use common::{Fakes, FakeLog, events, execute, journal, logged, write_config};

fn invocation(session: Session, command: &str) -> Invocation {
    Invocation {
        flags: session,
        command: Some(command.to_string()),
        env: None,
        config: None,
    }
}

fn session(protocol: &str, log: &str) -> Session {
    Session {
        address: "127.0.0.1:16260".to_string(),
        password: "secret".to_string(),
        protocol: ProtocolType::from(protocol),
        log: log.to_string(),
    }
}

#[test]
fn test_reply_is_trimmed_printed_and_logged() {
    let journal = journal();
    let mut fakes = Fakes::new(&journal);
    fakes.rcon = fakes.rcon.reply(Ok("  OK\n".to_string()));
    let mut executor = fakes.executor("");

    executor
        .run(invocation(session("rcon", "rcon.log"), "status"))
        .unwrap();

    assert_eq!(String::from_utf8(executor.into_output()).unwrap(), "OK\n");
    assert_eq!(
        events(&journal),
        vec![
            execute("rcon", "127.0.0.1:16260", "secret", "status"),
            logged("rcon.log", "127.0.0.1:16260", "status", "OK"),
        ]
    );
}

#[test]
fn test_empty_reply_prints_nothing() {
    let journal = journal();
    let mut fakes = Fakes::new(&journal);
    fakes.rcon = fakes.rcon.reply(Ok("\n".to_string()));
    let mut executor = fakes.executor("");

    executor
        .run(invocation(session("", "rcon.log"), "save"))
        .unwrap();

    assert!(executor.into_output().is_empty());
    assert_eq!(
        events(&journal),
        vec![
            execute("rcon", "127.0.0.1:16260", "secret", "save"),
            logged("rcon.log", "127.0.0.1:16260", "save", ""),
        ]
    );
}

#[test]
fn test_no_log_path_skips_logging() {
    let journal = journal();
    let mut executor = Fakes::new(&journal).executor("");

    executor.run(invocation(session("", ""), "players")).unwrap();

    assert_eq!(
        events(&journal),
        vec![execute("rcon", "127.0.0.1:16260", "secret", "players")]
    );
}

#[test_case("", "rcon" ; "unspecified goes to rcon")]
#[test_case("rcon", "rcon" ; "rcon")]
#[test_case("web", "web" ; "web")]
#[test_case("telnet", "telnet" ; "telnet")]
#[test_case("gopher", "rcon" ; "unknown falls back to rcon")]
fn test_protocol_routing(protocol: &str, client: &'static str) {
    let journal = journal();
    let mut executor = Fakes::new(&journal).executor("");

    executor
        .run(invocation(session(protocol, ""), "version"))
        .unwrap();

    assert_eq!(
        events(&journal),
        vec![execute(client, "127.0.0.1:16260", "secret", "version")]
    );
    assert_eq!(
        String::from_utf8(executor.into_output()).unwrap(),
        "version done\n"
    );
}

#[test]
fn test_address_and_password_required() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "rcon.yaml",
        "default:\n  password: \"from-config\"\n",
    );

    let journal = journal();
    let mut executor = Fakes::new(&journal).executor("");
    let err = executor
        .run(Invocation {
            config: Some(config.clone()),
            ..invocation(Session::default(), "status")
        })
        .unwrap_err();
    assert!(matches!(err, ExecutorError::EmptyAddress));
    assert_eq!(
        err.to_string(),
        "address is not set: to set address add -a host:port"
    );

    let flags = Session {
        address: "127.0.0.1:16260".to_string(),
        ..Session::default()
    };
    let err = executor
        .run(Invocation {
            config: Some(config),
            env: Some("other".to_string()),
            ..invocation(flags, "status")
        })
        .unwrap_err();
    assert!(matches!(err, ExecutorError::EmptyPassword));

    assert!(events(&journal).is_empty());
}

#[test]
fn test_session_resolved_from_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "rcon.yaml",
        "default:\n  address: \"127.0.0.1:1\"\n  password: \"a\"\nweb:\n  address: \"127.0.0.1:28016\"\n  password: \"b\"\n  type: \"web\"\n",
    );

    let journal = journal();
    let mut executor = Fakes::new(&journal).executor("");
    executor
        .run(Invocation {
            flags: Session::default(),
            command: Some("status".to_string()),
            env: Some("web".to_string()),
            config: Some(config),
        })
        .unwrap();

    assert_eq!(
        events(&journal),
        vec![execute("web", "127.0.0.1:28016", "b", "status")]
    );
}

#[test]
fn test_config_error_aborts() {
    let journal = journal();
    let mut executor = Fakes::new(&journal).executor("");
    let err = executor
        .run(Invocation {
            config: Some("/nonexistent/rcon.yaml".into()),
            ..invocation(Session::default(), "status")
        })
        .unwrap_err();

    assert!(matches!(err, ExecutorError::Config(_)));
    assert!(events(&journal).is_empty());
}

#[test]
fn test_partial_output_is_printed_and_logged_before_failing() {
    let journal = journal();
    let mut fakes = Fakes::new(&journal);
    fakes.rcon = fakes.rcon.reply(Err(ProtocolError::Io(io::Error::from(
        io::ErrorKind::ConnectionReset,
    ))
    .with_partial_output("first half\n".to_string())));
    let mut executor = fakes.executor("");

    let err = executor
        .run(invocation(session("", "rcon.log"), "listplayers"))
        .unwrap_err();

    assert!(matches!(
        err,
        ExecutorError::Protocol(ProtocolError::Partial { .. })
    ));
    assert_eq!(
        String::from_utf8(executor.into_output()).unwrap(),
        "first half\n"
    );
    assert_eq!(
        events(&journal)[1],
        logged("rcon.log", "127.0.0.1:16260", "listplayers", "first half")
    );
}

#[test]
fn test_failure_without_output_is_still_logged() {
    let journal = journal();
    let mut fakes = Fakes::new(&journal);
    fakes.rcon = fakes.rcon.reply(Err(ProtocolError::AuthenticationFailed));
    let mut executor = fakes.executor("");

    let err = executor
        .run(invocation(session("", "rcon.log"), "status"))
        .unwrap_err();

    assert!(matches!(
        err,
        ExecutorError::Protocol(ProtocolError::AuthenticationFailed)
    ));
    assert!(executor.into_output().is_empty());
    assert_eq!(
        events(&journal)[1],
        logged("rcon.log", "127.0.0.1:16260", "status", "")
    );
}

#[test]
fn test_log_failure_is_reported_after_printing() {
    let journal = journal();
    let mut fakes = Fakes::new(&journal);
    fakes.log = FakeLog::broken(&journal);
    let mut executor = fakes.executor("");

    let err = executor
        .run(invocation(session("", "rcon.log"), "status"))
        .unwrap_err();

    assert!(matches!(err, ExecutorError::Log(_)));
    assert!(err.to_string().starts_with("write log error: "));
    assert_eq!(
        String::from_utf8(executor.into_output()).unwrap(),
        "status done\n"
    );
}

#[test]
fn test_protocol_failure_wins_over_log_failure() {
    let journal = journal();
    let mut fakes = Fakes::new(&journal);
    fakes.rcon = fakes.rcon.reply(Err(ProtocolError::AuthenticationFailed));
    fakes.log = FakeLog::broken(&journal);
    let mut executor = fakes.executor("");

    let err = executor
        .run(invocation(session("", "rcon.log"), "status"))
        .unwrap_err();

    assert!(matches!(err, ExecutorError::Protocol(_)));
}

#[test]
fn test_command_written_to_real_log_file() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("logs").join("rcon.log");

    let journal = journal();
    let fakes = Fakes::new(&journal);
    let dispatcher = rcon_executor::Dispatcher::new(
        Box::new(fakes.rcon),
        Box::new(fakes.telnet),
        Box::new(fakes.web),
        Box::new(rcon_core::FileLog),
    );
    let mut executor = rcon_executor::Executor::new(dispatcher, io::empty(), Vec::new());

    executor
        .run(invocation(session("", log.to_str().unwrap()), "status"))
        .unwrap();
    executor
        .run(invocation(session("", log.to_str().unwrap()), "players"))
        .unwrap();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("] 127.0.0.1:16260: status\nstatus done\n\n"));
    assert!(contents.ends_with("] 127.0.0.1:16260: players\nplayers done\n\n"));
}
