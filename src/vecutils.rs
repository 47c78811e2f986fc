//! Vector utility functions like linspace()

/// Returns `num` evenly spaced values over `[start, end]`, both ends included.
///
/// A single value degenerates to `start`. The last value is exactly `end`.
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
