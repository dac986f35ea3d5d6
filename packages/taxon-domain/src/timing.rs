use std::time::Duration;

/// Seconds with exactly two decimal digits, e.g. `"0.04"`.
pub fn format_elapsed(elapsed: Duration) -> String {
	format!("{:.2}", elapsed.as_secs_f64())
}
