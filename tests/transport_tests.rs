use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use door_panels::errors::DoorPanelError;
use door_panels::models::{Direction, DoorSlot, GripParameters, RobotChannel};
use door_panels::services::{CommandDispatcher, TcpTransport, Transport};

/// Accepts one connection and returns everything written before the peer closed
async fn receive_one(listener: TcpListener) -> String {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut received = String::new();
    socket.read_to_string(&mut received).await.unwrap();
    received
}

async fn listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

fn transport(control_port: u16, motion_port: u16) -> TcpTransport {
    TcpTransport::new("127.0.0.1", control_port, motion_port, Duration::from_secs(2), Duration::from_secs(2))
}

#[tokio::test]
async fn control_command_gets_exactly_one_newline() {
    let (control, control_port) = listener().await;
    let (_motion, motion_port) = listener().await;
    let dispatcher = CommandDispatcher::new(Arc::new(transport(control_port, motion_port)));

    let server = tokio::spawn(receive_one(control));
    dispatcher.send_control_command("stop").await.unwrap();
    assert_eq!(server.await.unwrap(), "stop\n");
}

#[tokio::test]
async fn terminated_command_is_not_double_terminated() {
    let (control, control_port) = listener().await;
    let (_motion, motion_port) = listener().await;
    let dispatcher = CommandDispatcher::new(Arc::new(transport(control_port, motion_port)));

    let server = tokio::spawn(receive_one(control));
    dispatcher.send_control_command("brake release\n").await.unwrap();
    assert_eq!(server.await.unwrap(), "brake release\n");
}

#[tokio::test]
async fn motion_programs_go_to_the_motion_port() {
    let (_control, control_port) = listener().await;
    let (motion, motion_port) = listener().await;
    let dispatcher = CommandDispatcher::new(Arc::new(transport(control_port, motion_port)));

    let server = tokio::spawn(receive_one(motion));
    dispatcher
        .send_motion_program(DoorSlot::LAST, Direction::ToWorkTable, Some(GripParameters::new(47, 10)))
        .await
        .unwrap();
    let program = server.await.unwrap();
    assert!(program.contains("move_door3_to_work_table()"));
    assert!(program.contains("rg_grip(47, 10)"));
    assert!(program.ends_with('\n') && !program.ends_with("\n\n"));
}

#[tokio::test]
async fn refused_connection_is_a_dispatch_failure() {
    let (closed, port) = listener().await;
    drop(closed);
    let transport = transport(port, port.wrapping_add(1));

    let err = transport.transmit(RobotChannel::Control, b"stop\n").await.unwrap_err();
    assert!(matches!(err, DoorPanelError::DispatchFailed { channel: RobotChannel::Control, .. }));
}

#[tokio::test]
async fn pick_program_without_grip_is_never_sent() {
    let (_control, control_port) = listener().await;
    let (motion, motion_port) = listener().await;
    let dispatcher = CommandDispatcher::new(Arc::new(transport(control_port, motion_port)));

    let err = dispatcher
        .send_motion_program(DoorSlot::FIRST, Direction::ToWorkTable, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DoorPanelError::TemplateError(_)));
    let accepted = tokio::time::timeout(Duration::from_millis(200), motion.accept()).await;
    assert!(accepted.is_err(), "no connection should have been opened");
}

fn assert_timed_out(err: DoorPanelError, expected: RobotChannel) {
    match err {
        DoorPanelError::DispatchFailed { channel, source } => {
            assert_eq!(channel, expected);
            assert_eq!(source.kind(), io::ErrorKind::TimedOut, "unexpected cause: {}", source);
        }
        other => panic!("expected a dispatch failure, got {:?}", other),
    }
}

#[tokio::test]
async fn connect_timeout_is_a_timed_out_dispatch_failure() {
    let socket = TcpSocket::new_v4().unwrap();
    socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
    let port = socket.local_addr().unwrap().port();
    let _listener = socket.listen(1).unwrap();

    // Nothing accepts, so once the backlog is full further handshakes stall
    let mut backlog = Vec::new();
    for _ in 0..16 {
        match tokio::time::timeout(Duration::from_millis(200), TcpStream::connect(("127.0.0.1", port))).await {
            Ok(Ok(stream)) => backlog.push(stream),
            _ => break,
        }
    }

    let transport = TcpTransport::new("127.0.0.1", port, port.wrapping_add(1), Duration::from_millis(200), Duration::from_secs(2));
    let err = transport.transmit(RobotChannel::Control, b"stop\n").await.unwrap_err();
    assert_timed_out(err, RobotChannel::Control);
}

#[tokio::test]
async fn write_timeout_is_a_timed_out_dispatch_failure() {
    let (_control, control_port) = listener().await;
    // Accepted by the kernel but never read, so the send buffers eventually fill
    let (_motion, motion_port) = listener().await;
    let transport = TcpTransport::new("127.0.0.1", control_port, motion_port, Duration::from_secs(2), Duration::from_millis(200));

    let payload = vec![b'x'; 64 * 1024 * 1024];
    let err = transport.transmit(RobotChannel::Motion, &payload).await.unwrap_err();
    assert_timed_out(err, RobotChannel::Motion);
}
