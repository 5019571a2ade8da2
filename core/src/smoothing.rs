/// Centered rolling average.
///
/// Even windows are widened to the next odd size so the center is well
/// defined. Near the ends the window shrinks to the available neighbors,
/// keeping the output the same length as the input.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.len() < 3 {
        return values.to_vec();
    }

    let w = if window % 2 == 0 { window + 1 } else { window };
    let k = w / 2;
    let mut out = vec![0.0; values.len()];

    for i in 0..values.len() {
        let a = i.saturating_sub(k);
        let b = (i + k + 1).min(values.len());
        let n = (b - a) as f64;
        out[i] = values[a..b].iter().sum::<f64>() / n;
    }

    out
}
