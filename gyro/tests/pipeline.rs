use approx::assert_relative_eq;
use gyro_lib::{
    clock::ManualClock,
    config::GyroConfig,
    pipeline::{GyroPipeline, GyroTopics},
    units::{Time, Timestamp},
};
use gyro_types::prelude::*;
use indoc::indoc;

#[test]
fn configured_pipeline_end_to_end() {
    let config = GyroConfig::from_str_checked(indoc! {r#"
        device-id = 2516490
        rotation = "yaw90"
        scale = 0.001
        update-rate-hz = 2000
        offset = [0.0, 0.5, 0.0]
        temperature = 30.0
    "#})
    .unwrap();

    let topics = GyroTopics::new();
    let mut gyro = topics.gyro.subscriber(None);
    let mut integrated = topics.integrated.subscriber(None);
    let mut status = topics.status.subscriber(None);
    let clock = ManualClock::default();
    let mut pipeline =
        GyroPipeline::from_config(&config, clock.clone(), topics.publishers()).unwrap();
    assert_eq!(pipeline.integrator().reset_threshold(), 8);

    for i in 1..=8 {
        clock.advance(Time::from_micros(500.0));
        pipeline.ingest_sample(i * 500, 1_000.0, 0.0, 0.0);
    }

    // Yaw 90 moves sensor x onto board y
    let rates = gyro.drain();
    assert_eq!(rates.len(), 8);
    assert_relative_eq!(rates[0].x.as_radians_per_second(), 0.0);
    assert_relative_eq!(rates[0].y.as_radians_per_second(), 0.5, epsilon = 1e-6);
    assert_eq!(rates[0].timestamp, Timestamp::from_micros(500));

    let windows = integrated.drain();
    assert_eq!(windows.len(), 1);
    assert_relative_eq!(windows[0].delta_angle[1], 4.0, epsilon = 1e-5);
    assert_eq!(windows[0].dt, 4_000);
    assert_eq!(windows[0].device_id, DeviceId::from_raw(2_516_490));

    let s = status.drain();
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].rotation, Rotation::Yaw90);
    assert_eq!(s[0].temperature.as_degrees_celsius(), 30.0);
    assert_relative_eq!(
        s[0].full_scale_range.as_degrees_per_second(),
        2000.0,
        max_relative = 1e-5
    );
}

#[test]
fn thousand_samples_in_10ms_emit_one_status() {
    let topics = GyroTopics::new();
    let mut status = topics.status.subscriber(None);
    let clock = ManualClock::new(Timestamp::from_micros(1_000_000));
    let mut pipeline = GyroPipeline::new(
        clock.clone(),
        DeviceId::default(),
        Rotation::None,
        topics.publishers(),
    );

    for i in 0..1_000 {
        pipeline.ingest_sample(1_000_000 + i * 10, 0.1, 0.2, 0.3);
        clock.advance(Time::from_micros(10.0));
    }
    assert_eq!(status.drain().len(), 1);
}

#[test]
fn full_subscriber_misses_reports_others_do_not() {
    let topics = GyroTopics::new();
    let mut slow = topics.gyro.subscriber(2);
    let mut fast = topics.gyro.subscriber(None);
    let mut pipeline = GyroPipeline::new(
        ManualClock::default(),
        DeviceId::default(),
        Rotation::None,
        topics.publishers(),
    );

    for i in 1..=5 {
        pipeline.ingest_sample(i * 1_000, 0.0, 0.0, 0.0);
    }

    assert_eq!(slow.drain().len(), 2);
    assert_eq!(slow.dropped(), 3);
    assert_eq!(fast.drain().len(), 5);
    // Integration is unaffected by the dropped records
    assert_eq!(pipeline.integrator().sample_count(), 1);
}

#[test]
fn fifo_clipping_counted_per_reading() {
    let topics = GyroTopics::new();
    let mut integrated = topics.integrated.subscriber(None);
    let mut status = topics.status.subscriber(None);
    let mut pipeline = GyroPipeline::new(
        ManualClock::default(),
        DeviceId::default(),
        Rotation::None,
        topics.publishers(),
    );
    pipeline.set_update_rate(250).unwrap();
    assert_eq!(pipeline.integrator().reset_threshold(), 1);

    let sample = FifoSample::from_slices(
        1_000,
        250.0,
        &[i16::MAX, i16::MAX, 0, 0],
        &[0, i16::MIN, 0, 0],
        &[0; 4],
    )
    .unwrap();
    pipeline.ingest_fifo(&sample);

    let windows = integrated.drain();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].clip_count, 3);
    assert_eq!(windows[0].samples, 4);
    assert_eq!(windows[0].dt, 1_000);
    assert_eq!(status.drain()[0].clipping, [2, 1, 0]);
    assert_eq!(pipeline.clip().window_count(), 0);
}
