use flume::{Receiver, TryRecvError};
use lapsim::core::aggregator::Aggregate;
use lapsim::interfaces::render_interface::FrameState;
use std::fmt::Write;

// number of speed buckets shown in the HUD (the most frequent ones)
const NO_HUD_BUCKETS: usize = 5;

#[derive(Debug)]
pub struct SimInterface {
    pub rx: Receiver<FrameState>,
    pub frame_state: Option<FrameState>,
    pub is_connected: bool,
}

impl SimInterface {
    pub fn new(rx: Receiver<FrameState>) -> SimInterface {
        SimInterface {
            rx,
            frame_state: None,
            is_connected: true,
        }
    }

    /// The method drains the channel and keeps only the latest frame state. It returns true if
    /// a new frame state was received.
    pub fn update(&mut self) -> bool {
        let mut received = false;

        loop {
            match self.rx.try_recv() {
                Ok(frame_state) => {
                    self.frame_state = Some(frame_state);
                    received = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.is_connected = false;
                    break;
                }
            }
        }

        received
    }
}

/// render_frame creates the text HUD for a frame state: time, lap, current waypoint, the
/// vehicles, and the most frequent speed buckets of the latest aggregate.
pub fn render_frame(frame_state: &FrameState) -> String {
    let mut hud = String::new();

    write!(
        &mut hud,
        "HUD: t = {:8.3}s | lap {} | {}",
        frame_state.elapsed_time,
        frame_state.lap_count + 1,
        frame_state.waypoint_name
    )
    .unwrap();
    if !frame_state.waypoint_description.is_empty() {
        write!(&mut hud, " ({})", frame_state.waypoint_description).unwrap();
    }
    hud.push('\n');

    for vehicle_state in frame_state.vehicle_states.iter() {
        writeln!(
            &mut hud,
            "HUD:   {} #{:02x}{:02x}{:02x} ({:7.1}m, {:7.1}m) {:6.1}deg {:6.1}km/h",
            if vehicle_state.is_player { '>' } else { ' ' },
            vehicle_state.color.r,
            vehicle_state.color.g,
            vehicle_state.color.b,
            vehicle_state.x,
            vehicle_state.y,
            vehicle_state.angle.to_degrees(),
            vehicle_state.speed
        )
        .unwrap();
    }

    match &frame_state.aggregate {
        Some(Aggregate::Buckets(buckets)) => {
            let mut top_buckets = buckets.to_vec();
            top_buckets.sort_by(|a, b| b.count.cmp(&a.count));
            top_buckets.truncate(NO_HUD_BUCKETS);
            top_buckets.sort_by(|a, b| a.speed_bucket_floor.total_cmp(&b.speed_bucket_floor));

            for bucket in top_buckets.iter() {
                writeln!(
                    &mut hud,
                    "HUD:   {:6.1}km/h {:7.3}m/s^2 {:5}x",
                    bucket.speed_bucket_floor, bucket.avg_acceleration, bucket.count
                )
                .unwrap();
            }
        }
        Some(Aggregate::InsufficientData {
            available,
            required,
        }) => {
            writeln!(
                &mut hud,
                "HUD:   collecting samples ({}/{})",
                available, required
            )
            .unwrap();
        }
        None => {
            writeln!(&mut hud, "HUD:   no aggregate yet").unwrap();
        }
    }

    hud
}
