//! Update channel: batch validation happens before any I/O, and well-formed
//! sends reach the wire as single datagrams.

use std::net::UdpSocket;
use std::time::Duration;

use serde_json::Value;
use surface_client::update::UpdateChannel;
use surface_core::ControlError;

fn fake_host() -> (UdpSocket, String) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(1)))
        .unwrap();
    let addr = socket.local_addr().unwrap().to_string();
    (socket, addr)
}

fn recv_json(socket: &UdpSocket) -> Value {
    let mut buf = [0u8; 8192];
    let (n, _) = socket.recv_from(&mut buf).unwrap();
    serde_json::from_slice(&buf[..n]).unwrap()
}

#[test]
fn batch_length_mismatch_is_rejected_before_io() {
    let (_host, addr) = fake_host();
    let mut channel = UpdateChannel::bind(addr, 0, 0).unwrap();

    let result = channel.send_batch(&[0, 1, 2], &[0.5, 0.5]);
    assert!(matches!(result, Err(ControlError::Validation(_))));
    assert_eq!(channel.datagrams_sent(), 0);
}

#[test]
fn out_of_range_single_value_is_rejected_before_io() {
    let (_host, addr) = fake_host();
    let mut channel = UpdateChannel::bind(addr, 0, 0).unwrap();

    assert!(matches!(
        channel.send(0, 1.5),
        Err(ControlError::Validation(_))
    ));
    assert!(matches!(
        channel.send(0, -0.1),
        Err(ControlError::Validation(_))
    ));
    assert_eq!(channel.datagrams_sent(), 0);
}

#[test]
fn single_send_reaches_the_wire() {
    let (host, addr) = fake_host();
    let mut channel = UpdateChannel::bind(addr, 2, 1).unwrap();

    channel.send(7, 0.25).unwrap();
    assert_eq!(channel.datagrams_sent(), 1);

    let datagram = recv_json(&host);
    assert_eq!(datagram["type"], "set_device_parameter");
    assert_eq!(datagram["params"]["track_index"], 2);
    assert_eq!(datagram["params"]["device_index"], 1);
    assert_eq!(datagram["params"]["parameter_index"], 7);
    assert_eq!(datagram["params"]["value"], 0.25);
}

#[test]
fn batch_send_carries_parallel_sequences() {
    let (host, addr) = fake_host();
    let mut channel = UpdateChannel::bind(addr, 0, 0).unwrap();

    channel.send_batch(&[0, 1], &[0.1, 0.9]).unwrap();
    assert_eq!(channel.datagrams_sent(), 1);

    let datagram = recv_json(&host);
    assert_eq!(datagram["type"], "batch_set_device_parameters");
    assert_eq!(datagram["params"]["parameter_indices"][0], 0);
    assert_eq!(datagram["params"]["parameter_indices"][1], 1);
    assert_eq!(datagram["params"]["values"][0], 0.1);
    assert_eq!(datagram["params"]["values"][1], 0.9);
}
