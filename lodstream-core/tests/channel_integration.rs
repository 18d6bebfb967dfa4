//! End-to-end: acquisition into a channel, then geometry for a plot
//!
//! Simulates a 1 kHz recorder with a stalled link, a zoomed-out overview
//! and a zoomed-in detail view, plus a short positional trail.

mod common;

use common::{spiky_square, TestRng};
use lodstream_core::time::FixedTime;
use lodstream_core::{
    render, Channel, ChannelConfig, Coord4, RingBuffer, ValueMapping,
};

fn recorder() -> Channel<i16> {
    let config = ChannelConfig::new(1000.0)
        .with_name("accel-x")
        .with_unit("g")
        .with_mapping(ValueMapping::new(-2.0, -32768.0, 2.0, 32768.0).unwrap());
    Channel::with_clock(config, Box::new(FixedTime::new(0))).unwrap()
}

#[test]
fn overview_and_detail_views() {
    let mut channel = recorder();
    let signal = spiky_square(60_000, 3);
    let mut time = 1_700_000_000_000u64;
    for (i, v) in signal.iter().enumerate() {
        if i == 30_000 {
            // link stalls for two seconds
            time += 2_000;
        }
        channel.append_at((v * 1000.0) as i16, time);
        time += 1;
    }
    assert_eq!(channel.len(), 60_000);
    assert_eq!(channel.timeline().len(), 60);

    // one minute of samples into 1200 px
    let overview = channel.lod(0.0, 60_000.0, 1200.0);
    assert!(overview.level_index() >= 5);
    assert!(overview.entry_count() <= 2 * 1200 + 2);
    let cols: Vec<_> = channel.columns(0.0, 60_000.0, 1200.0).collect();
    assert_eq!(cols.len(), overview.entry_count());
    assert!(cols.iter().all(|c| c.low <= c.high));
    assert!(cols.iter().any(|c| c.high > 0.5), "spikes should reach the overview");

    // 200 samples into 800 px stays on raw data
    let detail = channel.lod(10_000.0, 10_200.0, 800.0);
    assert_eq!(detail.level_index(), 0);
    assert_eq!(detail.start_index(), 10_000);
    assert_eq!(detail.end_index(), 10_199);
    let line: Vec<_> = channel.polyline(10_000.0, 10_200.0, 800.0).collect();
    assert_eq!(line.len(), 200);
    assert!((line[0].x - 2.0).abs() < 1e-9);
    assert!((line[199].x - 798.0).abs() < 1e-9);

    // wall clock picks up the stall, relative time does not
    let before = channel.sample_to_wallclock(29_000.0);
    let after = channel.sample_to_wallclock(30_000.0);
    assert_eq!(after - before, 3_000.0);
    assert_eq!(channel.sample_to_time(30_000.0), 30.0);
}

#[test]
fn raw_geometry_matches_mapped_with_identity() {
    let mut channel = Channel::<f32>::with_clock(ChannelConfig::new(50.0), Box::new(FixedTime::new(0))).unwrap();
    let mut rng = TestRng::new(99);
    for _ in 0..500 {
        channel.append(rng.gen_range(-3.0, 3.0));
    }
    let range = channel.lod(0.0, 500.0, 64.0);
    let raw: Vec<_> = render::polyline(&range).collect();
    let mapped: Vec<_> = channel.polyline(0.0, 500.0, 64.0).collect();
    assert_eq!(raw, mapped);
}

#[test]
fn trail_follows_newest_positions() {
    let mut trail = RingBuffer::new(50).unwrap();
    for i in 0..200 {
        let t = i as f64 / 10.0;
        trail.append(Coord4 { x: t.cos(), y: t.sin(), z: 0.0, t });
    }
    assert_eq!(trail.len(), 50);
    assert_eq!(trail.get(0).map(|c| c.t), Some(15.0));

    // last two seconds of the trail
    let (first, last) = trail.slice_indices(17.9, 19.9).unwrap();
    assert_eq!(last, 49);
    assert_eq!(first, 29);
    assert!(trail.slice_indices(0.0, 1.0).is_none());
}
