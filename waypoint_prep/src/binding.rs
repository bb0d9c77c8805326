//! Binding between frame tables and core types.
//!
//! Knows the column layout of the recorded frame tables and of the waypoint
//! columns added to them.

use crate::PrepError;
use nalgebra::Vector3;
use std::ops::Range;
use waypoint_core::{Camera, Frame, FrameWaypoints, Pose, Trajectory, TurnLabel, WaypointConfig};
use waypoint_env::FrameTable;

/// Column names of the recorded frame table.
pub mod columns {
    pub const INDEX: &str = "index";
    pub const POSITION_X: &str = "position_x";
    pub const POSITION_Y: &str = "position_y";
    pub const POSITION_Z: &str = "position_z";
    pub const ROLL: &str = "roll";
    pub const PITCH: &str = "pitch";
    pub const YAW: &str = "yaw";
    pub const STEERING_ANGLE: &str = "steering_angle";
    pub const TURN_SIGNAL: &str = "turn_signal";
    pub const DISTANCE: &str = "distance";
}

const AXES: [&str; 3] = ["x", "y", "z"];

pub fn steering_column(rank: usize) -> String {
    format!("wp_steering_{}", rank)
}

pub fn local_columns(rank: usize) -> [String; 3] {
    AXES.map(|axis| format!("wp{}_{}", rank, axis))
}

pub fn camera_columns(rank: usize, camera: Camera) -> [String; 3] {
    AXES.map(|axis| format!("wp{}_{}_{}", rank, camera.name(), axis))
}

/// All waypoint columns in output order: per rank the steering angle, the
/// body-frame triple, then one triple per camera.
pub fn waypoint_columns(config: &WaypointConfig) -> Vec<String> {
    let mut names = Vec::with_capacity(config.count * 13);
    for rank in config.ranks() {
        names.push(steering_column(rank));
        names.extend(local_columns(rank));
        for camera in Camera::ALL {
            names.extend(camera_columns(rank, camera));
        }
    }
    names
}

/// Drops rows without a full position and reads the remaining rows as frames.
///
/// The table is filtered in place so it stays row-aligned with the
/// returned trajectory. Returns the trajectory and the number of dropped rows.
pub fn bind_trajectory(table: &mut FrameTable) -> Result<(Trajectory, usize), PrepError> {
    let position = [
        table.require(columns::POSITION_X)?,
        table.require(columns::POSITION_Y)?,
        table.require(columns::POSITION_Z)?,
    ];
    let before = table.len();

    // Validate positions before filtering so bad cells are reported, not dropped
    for row in 0..before {
        for &col in &position {
            table.f64_cell(row, col)?;
        }
    }
    table.retain_rows(|row| position.iter().all(|&col| !is_missing(&row[col])));
    let dropped = before - table.len();

    let index = index_column(table)?;
    let x = table.f64_column(columns::POSITION_X)?;
    let y = table.f64_column(columns::POSITION_Y)?;
    let z = table.f64_column(columns::POSITION_Z)?;
    let roll = table.f64_column(columns::ROLL)?;
    let pitch = table.f64_column(columns::PITCH)?;
    let yaw = table.f64_column(columns::YAW)?;
    let steering = table.f64_column(columns::STEERING_ANGLE)?;

    let mut frames = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let position = Vector3::new(
            required(&x, row, columns::POSITION_X)?,
            required(&y, row, columns::POSITION_Y)?,
            required(&z, row, columns::POSITION_Z)?,
        );
        let orientation = [
            required(&roll, row, columns::ROLL)?,
            required(&pitch, row, columns::PITCH)?,
            required(&yaw, row, columns::YAW)?,
        ];
        // Missing steering is carried through as an empty waypoint cell
        let steering_angle = steering[row].unwrap_or(f64::NAN);
        frames.push(Frame::new(index[row], Pose::new(position, orientation), steering_angle));
    }

    Ok((Trajectory::new(frames), dropped))
}

fn is_missing(cell: &str) -> bool {
    let raw = cell.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("nan")
}

fn required(values: &[Option<f64>], row: usize, column: &str) -> Result<f64, PrepError> {
    values[row].ok_or_else(|| PrepError::MissingValue {
        row,
        column: column.to_string(),
    })
}

fn index_column(table: &FrameTable) -> Result<Vec<i64>, PrepError> {
    let col = table.require(columns::INDEX)?;
    (0..table.len())
        .map(|row| {
            let raw = table.cell(row, col).trim();
            raw.parse::<i64>().map_err(|_| PrepError::Index {
                row,
                value: raw.to_string(),
            })
        })
        .collect()
}

/// Writes the distance-to-next column (empty on the last row).
pub fn write_distance(table: &mut FrameTable, trajectory: &Trajectory) {
    let col = table.ensure_column(columns::DISTANCE);
    for (row, distance) in trajectory.distances().into_iter().enumerate() {
        table.set_f64(row, col, distance);
    }
}

/// Resets every waypoint column to empty, then fills populated ranks.
///
/// `results` must be row-aligned with the table.
pub fn write_waypoints(table: &mut FrameTable, results: &[FrameWaypoints], config: &WaypointConfig) {
    let names = waypoint_columns(config);
    let cols: Vec<usize> = names.iter().map(|name| table.ensure_column(name)).collect();
    for &col in &cols {
        table.clear_column(col);
    }

    for (row, result) in results.iter().enumerate() {
        for wp in &result.waypoints {
            // 13 columns per rank, in the order of waypoint_columns()
            let base = (wp.rank - 1) * 13;
            let mut values = Vec::with_capacity(13);
            values.push(wp.steering_angle);
            values.extend(wp.local.coords.iter().copied());
            for camera in Camera::ALL {
                values.extend(wp.camera(camera).coords.iter().copied());
            }
            for (offset, value) in values.into_iter().enumerate() {
                table.set_f64(row, cols[base + offset], Some(value));
            }
        }
    }
}

/// Writes `label` into a range of the turn-signal column, creating the
/// column (all unlabelled) if absent. Cells outside `rows` are not read.
pub fn write_turn_signal(table: &mut FrameTable, rows: Range<usize>, label: TurnLabel) {
    let col = table.ensure_column(columns::TURN_SIGNAL);
    let code = label.code().to_string();
    for row in rows {
        table.set(row, col, code.as_str());
    }
}
