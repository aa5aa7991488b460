use std::{
    io::Read,
    net::{TcpListener, TcpStream},
    thread::JoinHandle,
    time::Duration,
};

use scroller_core::{
    proto::{decode_frame, encode_frame, Header, Message, PackedSize},
    Color, FrameSink,
};
use scroller_network::TcpSender;

/// Accepts a single connection and returns everything received until the peer hangs up.
fn spawn_controller() -> (std::net::SocketAddr, JoinHandle<Vec<u8>>) {
    let _ = env_logger::try_init();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).unwrap();
        received
    });
    (address, handle)
}

#[test]
fn test_send_frames() {
    let (address, controller) = spawn_controller();

    let mut sender = TcpSender::connect(address).unwrap();
    assert_eq!(sender.peer_addr(), address);

    let first = vec![Color::new(255, 0, 0); 8];
    let second = (0..8_u8).map(|i| Color::new(i, i, i)).collect::<Vec<_>>();

    let mut buf = Vec::new();
    encode_frame(&first, &mut buf).unwrap();
    sender.send_frame(&buf).unwrap();
    encode_frame(&second, &mut buf).unwrap();
    sender.send_frame(&buf).unwrap();
    drop(sender);

    let received = controller.join().unwrap();
    assert_eq!(received.len(), 2 * (Header::PACKED_LEN + 8 * 3));

    let message = Message::decode(&received).unwrap();
    assert_eq!(message.header.length, 24);
    assert_eq!(decode_frame(&received).unwrap(), first);
    assert_eq!(decode_frame(&received[message.len()..]).unwrap(), second);
}

#[test]
fn test_connect_by_host_name() {
    let (address, controller) = spawn_controller();

    let sender = TcpSender::connect(format!("localhost:{}", address.port()).as_str());
    // Depending on the resolver, `localhost` may point to the IPv6 address first.
    if let Ok(sender) = sender {
        assert_eq!(sender.peer_addr().port(), address.port());
        drop(sender);
        assert!(controller.join().unwrap().is_empty());
    }
}

#[test]
fn test_connect_refused() {
    let address = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    // The listener has been dropped, so nobody listens on this port.
    assert!(TcpSender::connect(address).is_err());
}

#[test]
fn test_send_to_closed_controller() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    let mut sender = TcpSender::from_stream(TcpStream::connect(address).unwrap()).unwrap();
    let (stream, _) = listener.accept().unwrap();
    drop(stream);
    drop(listener);

    let mut buf = Vec::new();
    encode_frame(&vec![Color::new(1, 2, 3); 512], &mut buf).unwrap();
    // The first writes may still be buffered by the OS, but sooner or later the failure
    // must be reported instead of blocking or panicking.
    let failed = (0..100).any(|_| {
        std::thread::sleep(Duration::from_millis(5));
        sender.send_frame(&buf).is_err()
    });
    assert!(failed);
}

#[test]
fn test_partial_frame_breaks_sync() {
    let _ = env_logger::try_init();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    let mut sender = TcpSender::connect(address).unwrap();
    sender
        .set_write_timeout(Duration::from_millis(100))
        .unwrap();
    // The controller accepts the connection but never reads from it.
    let (_stream, _) = listener.accept().unwrap();
    assert!(sender.is_in_sync());

    let mut buf = Vec::new();
    encode_frame(&vec![Color::new(7, 7, 7); 20_000], &mut buf).unwrap();
    let failed = (0..1_000).any(|_| sender.send_frame(&buf).is_err());
    assert!(failed);
    // Socket buffers almost never end exactly at a frame boundary.
    assert!(!sender.is_in_sync());
}
