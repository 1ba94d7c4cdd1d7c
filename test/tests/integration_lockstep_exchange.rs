//! Integration tests for the lock-step input exchange over an in-memory
//! loopback transport: both sides must observe the identical per-tick input
//! sequence, and a leave signal must unwind the peer's wait instead of
//! hanging it.

use std::thread;

use lockstep_net::{InputExchange, RingConfig};
use lockstep_shared::{HostRole, InputFlags, InputOutcome, InputSource, PlayerId, Tick, TickInputs};
use lockstep_test::{loopback_pair, LoopbackTransport};

const PLAYER_A: PlayerId = PlayerId::new(1);
const PLAYER_B: PlayerId = PlayerId::new(2);

fn exchange(
    transport: LoopbackTransport,
    role: HostRole,
    local: PlayerId,
    remote: PlayerId,
) -> InputExchange<LoopbackTransport> {
    InputExchange::new(transport, role, local, remote, RingConfig::default())
}

/// A deterministic per-side input script, so both sides can predict what
/// the other must have observed.
fn scripted_flags(player: PlayerId, tick: Tick) -> InputFlags {
    InputFlags {
        up: tick % 2 == 0,
        down: tick % 3 == 0,
        left: player == PLAYER_A,
        right: player == PLAYER_B && tick % 5 == 0,
    }
}

fn run_side(
    mut exchange: InputExchange<LoopbackTransport>,
    local: PlayerId,
    ticks: Tick,
) -> Vec<TickInputs> {
    let mut observed = Vec::new();
    for tick in 0..ticks {
        match exchange.inputs_for_tick(tick, scripted_flags(local, tick)) {
            InputOutcome::Ready(inputs) => observed.push(inputs),
            InputOutcome::Stopped => panic!("exchange stopped at tick {}", tick),
        }
    }
    observed
}

#[test]
fn both_sides_observe_the_identical_input_sequence() {
    let (transport_a, transport_b) = loopback_pair();
    let exchange_a = exchange(transport_a, HostRole::Host, PLAYER_A, PLAYER_B);
    let exchange_b = exchange(transport_b, HostRole::Peer, PLAYER_B, PLAYER_A);

    const TICKS: Tick = 50;
    let side_b = thread::spawn(move || run_side(exchange_b, PLAYER_B, TICKS));
    let observed_a = run_side(exchange_a, PLAYER_A, TICKS);
    let observed_b = side_b.join().unwrap();

    assert_eq!(observed_a.len(), TICKS as usize);
    assert_eq!(observed_a, observed_b, "lock-step agreement broken");

    // and each tick carries exactly both players' scripted inputs
    for (tick, inputs) in observed_a.iter().enumerate() {
        let tick = tick as Tick;
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs.get(PLAYER_A), scripted_flags(PLAYER_A, tick));
        assert_eq!(inputs.get(PLAYER_B), scripted_flags(PLAYER_B, tick));
    }
}

#[test]
fn a_leaving_peer_unwinds_the_other_sides_wait() {
    let (transport_a, transport_b) = loopback_pair();
    let exchange_a = exchange(transport_a, HostRole::Host, PLAYER_A, PLAYER_B);
    let exchange_b = exchange(transport_b, HostRole::Peer, PLAYER_B, PLAYER_A);

    const TICKS: Tick = 10;

    // side A plays a fixed number of ticks and leaves
    let side_a = thread::spawn(move || {
        let mut exchange_a = exchange_a;
        for tick in 0..TICKS {
            match exchange_a.inputs_for_tick(tick, InputFlags::none()) {
                InputOutcome::Ready(_) => {}
                InputOutcome::Stopped => panic!("side A stopped early at tick {}", tick),
            }
        }
        exchange_a.notify_peer_left();
    });

    // side B plays until the exchange reports the session over
    let mut exchange_b = exchange_b;
    let mut completed = 0;
    for tick in 0.. {
        match exchange_b.inputs_for_tick(tick, InputFlags::none()) {
            InputOutcome::Ready(_) => completed += 1,
            InputOutcome::Stopped => break,
        }
    }
    side_a.join().unwrap();

    assert_eq!(completed, TICKS);
    assert!(exchange_b.is_stopped());
}

#[test]
fn a_dropped_connection_unwinds_the_wait() {
    let (transport_a, mut transport_b) = loopback_pair();
    transport_b.drop_connection();

    let mut exchange_a = exchange(transport_a, HostRole::Host, PLAYER_A, PLAYER_B);
    assert_eq!(
        exchange_a.inputs_for_tick(0, InputFlags::none()),
        InputOutcome::Stopped
    );
}
