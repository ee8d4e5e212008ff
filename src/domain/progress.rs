/// Percentage of a transfer, or `None` while the total size is unknown.
pub fn percentage(loaded: u64, total: Option<u64>) -> Option<u8> {
    let total = total.filter(|t| *t > 0)?;
    let ratio = (loaded as f64 / total as f64) * 100.0;
    Some(ratio.round().min(100.0) as u8)
}
