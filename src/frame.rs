//! Reduction of decoded pixel arrays to a single grey 2-D frame.
//!
//! Known limitation: the representative frame of a multi-frame object is
//! simply the middle one. Motion, contrast phase and temporal position are
//! not taken into account.

use ndarray::{Array2, Array3, Array4, ArrayBase, Axis, Data, Ix3};

/// Pick frame `N / 2` of a `(frames, rows, columns)` volume.
///
/// A volume with one frame (or none) is treated as already single-frame.
pub fn select_representative_frame<S, A>(volume: &ArrayBase<S, Ix3>) -> Array2<A>
where
    S: Data<Elem = A>,
    A: Clone + Default,
{
    let frames = volume.len_of(Axis(0));
    if frames == 0 {
        let (_, rows, columns) = volume.dim();
        return Array2::default((rows, columns));
    }
    let index = if frames > 1 { frames / 2 } else { 0 };
    volume.index_axis(Axis(0), index).to_owned()
}

/// Collapse the sample axis of a `(frames, rows, columns, samples)` array.
///
/// Single-sample data is passed through; colour data is converted to luminance
/// with the ITU-R BT.601 weights.
pub fn to_grayscale(samples: Array4<f64>) -> Array3<f64> {
    let channels = samples.len_of(Axis(3));
    match channels {
        1 => samples.index_axis_move(Axis(3), 0),
        3 => samples.map_axis(Axis(3), |px| 0.299 * px[0] + 0.587 * px[1] + 0.114 * px[2]),
        _ => samples
            .mean_axis(Axis(3))
            .unwrap_or_else(|| Array3::zeros(frame_shape(&samples))),
    }
}

fn frame_shape(samples: &Array4<f64>) -> (usize, usize, usize) {
    let (frames, rows, columns, _) = samples.dim();
    (frames, rows, columns)
}
