/// Mean and population standard deviation over every element of a stack of
/// embeddings. `None` when the stack holds no elements.
pub fn mean_and_std(stack: &[Vec<f32>]) -> Option<(f64, f64)> {
    let count = stack.iter().map(Vec::len).sum::<usize>();
    if count == 0 {
        return None;
    }
    let n = count as f64;

    let values = || stack.iter().flatten().map(|&x| f64::from(x));
    let mean = values().sum::<f64>() / n;
    let variance = values().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

    Some((mean, variance.sqrt()))
}

/// Maps a roughly zero-centred mean into [0, 1] (shift by one, halve, clamp).
pub fn shifted_mean(mean: f64) -> f64 {
    ((mean + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Scales a standard deviation into [0, 1], saturating at 1.0.
pub fn scaled_std(std: f64, factor: f64) -> f64 {
    (std * factor).clamp(0.0, 1.0)
}
