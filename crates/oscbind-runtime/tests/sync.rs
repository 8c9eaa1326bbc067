//! End-to-end sync between registries
//!
//! One registry publishes, another subscribes, over the in-memory network
//! and over real loopback UDP sockets.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use proptest::prelude::*;

use oscbind_runtime::{
    Color, FloatColor, Mat4, MemoryNetwork, OscMessage, Registry, Shared, Source, SyncConfig,
    UdpConfig, UdpTransport, Vec3,
};

// ============================================================================
// HELPERS
// ============================================================================

fn memory_pair() -> (MemoryNetwork, Registry<MemoryNetwork>, Registry<MemoryNetwork>) {
    let net = MemoryNetwork::recording();
    let sender = Registry::with_transport(net.clone(), SyncConfig::default());
    let receiver = Registry::with_transport(net.clone(), SyncConfig::default());
    (net, sender, receiver)
}

fn loopback_registry() -> Registry<UdpTransport> {
    let udp = UdpConfig {
        listen_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
        ..UdpConfig::default()
    };
    Registry::with_config(SyncConfig::default(), udp)
}

fn free_port() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.local_addr().unwrap().port()
}

struct Player {
    score: i32,
}

impl Player {
    fn score(&self) -> i32 {
        self.score
    }
}

// ============================================================================
// MEMORY NETWORK
// ============================================================================

#[test]
fn test_composites_cross_the_wire() {
    let (_net, mut tx, mut rx) = memory_pair();

    let position = Shared::new(Vec3::new(1.0, -2.0, 3.5));
    let tint = Shared::new(Color::<u8>::new(10, 20, 30, 40));
    let mut cells = [[0.0f32; 4]; 4];
    for (i, row) in cells.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (i * 4 + j) as f32;
        }
    }
    let transform = Shared::new(Mat4::from_rows(cells));
    let samples = Shared::new(vec![0.25f32, 0.5, 0.75]);
    let label = Shared::new(String::from("lead"));
    let payload = Shared::new(Bytes::from_static(b"\x00\x01\x02"));
    let enabled = Shared::new(true);
    let phase = Shared::new(0.123_456_789_f64);
    let frame = Shared::new(u64::MAX);

    tx.bind_outbound("localhost", 9300, "/position", &position, true).unwrap();
    tx.bind_outbound("localhost", 9300, "/tint", &tint, true).unwrap();
    tx.bind_outbound("localhost", 9300, "/transform", &transform, true).unwrap();
    tx.bind_outbound("localhost", 9300, "/samples", &samples, true).unwrap();
    tx.bind_outbound("localhost", 9300, "/label", &label, true).unwrap();
    tx.bind_outbound("localhost", 9300, "/payload", &payload, true).unwrap();
    tx.bind_outbound("localhost", 9300, "/enabled", &enabled, true).unwrap();
    tx.bind_outbound("localhost", 9300, "/phase", &phase, true).unwrap();
    tx.bind_outbound("localhost", 9300, "/frame", &frame, true).unwrap();

    let r_position = Shared::new(Vec3::default());
    let r_tint = Shared::new(Color::<u8>::default());
    let r_transform = Shared::new(Mat4::IDENTITY);
    let r_samples = Shared::new(vec![0.0f32]);
    let r_label = Shared::new(String::new());
    let r_payload = Shared::new(Bytes::new());
    let r_enabled = Shared::new(false);
    let r_phase = Shared::new(0.0f64);
    let r_frame = Shared::new(0u64);

    rx.bind_inbound(9300, "/position", &r_position).unwrap();
    rx.bind_inbound(9300, "/tint", &r_tint).unwrap();
    rx.bind_inbound(9300, "/transform", &r_transform).unwrap();
    rx.bind_inbound(9300, "/samples", &r_samples).unwrap();
    rx.bind_inbound(9300, "/label", &r_label).unwrap();
    rx.bind_inbound(9300, "/payload", &r_payload).unwrap();
    rx.bind_inbound(9300, "/enabled", &r_enabled).unwrap();
    rx.bind_inbound(9300, "/phase", &r_phase).unwrap();
    rx.bind_inbound(9300, "/frame", &r_frame).unwrap();

    tx.update().unwrap();
    rx.update().unwrap();

    assert_eq!(r_position.get(), position.get());
    assert_eq!(r_tint.get(), tint.get());
    assert_eq!(r_transform.get(), transform.get());
    assert_eq!(r_samples.get(), samples.get());
    assert_eq!(r_label.get(), "lead");
    assert_eq!(r_payload.get(), payload.get());
    assert!(r_enabled.get());
    assert_eq!(r_phase.get(), 0.123_456_789_f64);
    assert_eq!(r_frame.get(), u64::MAX);
    assert_eq!(rx.stats().messages_applied, 9);
}

#[test]
fn test_only_changes_are_sent() {
    let (net, mut tx, _rx) = memory_pair();
    let a = Shared::new(1i32);
    let b = Shared::new(1i32);
    tx.bind_outbound("localhost", 9301, "/a", &a, true).unwrap();
    tx.bind_outbound("localhost", 9301, "/b", &b, true).unwrap();

    tx.update().unwrap();
    assert_eq!(net.sent_to("localhost", 9301).len(), 2);

    b.set(2);
    tx.update().unwrap();
    let sent = net.sent_to("localhost", 9301);
    assert_eq!(sent, vec![OscMessage::new("/b").arg(2i32)]);

    tx.update().unwrap();
    assert!(net.sent_to("localhost", 9301).is_empty());
}

#[test]
fn test_accessor_sources() {
    let (net, mut tx, _rx) = memory_pair();
    let player = Shared::new(Player { score: 12 });

    tx.bind_outbound("localhost", 9302, "/score", Source::method(&player, Player::score), true)
        .unwrap();
    tx.update().unwrap();
    player.write().score = 13;
    tx.update().unwrap();

    let sent = net.sent_to("localhost", 9302);
    assert_eq!(
        sent,
        vec![
            OscMessage::new("/score").arg(12i32),
            OscMessage::new("/score").arg(13i32),
        ]
    );

    // Owner gone: the binding is pruned on the next update
    drop(player);
    tx.update().unwrap();
    assert!(!tx.publisher("localhost", 9302).unwrap().has("/score"));
}

#[test]
fn test_float_color_gray() {
    let (net, _tx, mut rx) = memory_pair();
    let color = Shared::new(FloatColor::default());
    rx.bind_inbound(9303, "/color", &color).unwrap();

    net.inject(9303, &OscMessage::new("/color").arg(0.5f32)).unwrap();
    rx.update().unwrap();

    assert_eq!(color.get(), FloatColor::new(0.5, 0.5, 0.5, 1.0));
}

#[test]
fn test_messages_after_drain_wait_for_next_tick() {
    let (net, _tx, mut rx) = memory_pair();
    let x = Shared::new(0i32);
    rx.bind_inbound(9304, "/x", &x).unwrap();

    net.inject(9304, &OscMessage::new("/x").arg(1i32)).unwrap();
    rx.update_inbound().unwrap();
    net.inject(9304, &OscMessage::new("/x").arg(2i32)).unwrap();
    assert_eq!(x.get(), 1);

    rx.update_inbound().unwrap();
    assert_eq!(x.get(), 2);
}

// ============================================================================
// UDP LOOPBACK
// ============================================================================

#[test]
fn test_udp_loopback_sync() {
    let port = free_port();
    let mut tx = loopback_registry();
    let mut rx = loopback_registry();

    let speed = Shared::new(0.0f32);
    let r_speed = Shared::new(-1.0f32);
    tx.bind_outbound("127.0.0.1", port, "/speed", &speed, false).unwrap();
    rx.bind_inbound(port, "/speed", &r_speed).unwrap();

    speed.set(4.25);
    for _ in 0..200 {
        tx.update().unwrap();
        rx.update().unwrap();
        if r_speed.get() == 4.25 {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(r_speed.get(), 4.25);
}

#[test]
fn test_udp_port_taken() {
    let holder = UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = holder.local_addr().unwrap().port();
    let mut rx = loopback_registry();
    let x = Shared::new(0i32);

    assert!(rx.bind_inbound(port, "/x", &x).is_err());
    assert_eq!(rx.subscriber_count(), 0);
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_published_values_arrive(
        level in any::<i32>(),
        gain in -1.0e6f32..1.0e6f32,
        name in "[a-zA-Z0-9 ]{0,24}",
    ) {
        let (_net, mut tx, mut rx) = memory_pair();
        let values = (Shared::new(level), Shared::new(gain), Shared::new(name.clone()));
        let targets = (Shared::new(0i32), Shared::new(0.0f32), Shared::new(String::new()));

        tx.bind_outbound("localhost", 9310, "/level", &values.0, true).unwrap();
        tx.bind_outbound("localhost", 9310, "/gain", &values.1, true).unwrap();
        tx.bind_outbound("localhost", 9310, "/name", &values.2, true).unwrap();
        rx.bind_inbound(9310, "/level", &targets.0).unwrap();
        rx.bind_inbound(9310, "/gain", &targets.1).unwrap();
        rx.bind_inbound(9310, "/name", &targets.2).unwrap();

        tx.update().unwrap();
        rx.update().unwrap();

        prop_assert_eq!(targets.0.get(), level);
        prop_assert_eq!(targets.1.get(), gain);
        prop_assert_eq!(targets.2.get(), name);
    }
}
