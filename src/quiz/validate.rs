/// A selection is usable when something was picked and it points at an option.
pub fn is_valid_selection(selected: Option<usize>, num_options: usize) -> bool {
    matches!(selected, Some(idx) if idx < num_options)
}

pub fn is_correct(selected: usize, correct: usize) -> bool {
    selected == correct
}

/// Renders a duration as `MM:SS`, or `HH:MM:SS` once it reaches an hour.
/// Fractional seconds are truncated.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    let (minutes, secs) = (total / 60, total % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);

    if hours == 0 {
        format!("{:02}:{:02}", minutes, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }
}
