use std::time::Duration;

pub const APP_NAME: &str = "media-cli";

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov"];

/// Convert user volume percentage (0-100) to amplitude multiplier using perceptual scaling
///
/// Human hearing is logarithmic, so we use x^4 to approximate an exponential curve.
/// The difference between 1-2% will feel the same as the difference between 99-100%.
pub fn volume_percent_to_amplitude(percent: u8) -> f32 {
    let x = (percent as f32) / 100.0;
    x.powi(4)
}

/// Convert amplitude multiplier (0.0-1.0) back to user volume percentage (0-100).
/// Inverse of volume_percent_to_amplitude().
pub fn amplitude_to_volume(amplitude: f32) -> u8 {
    let x = amplitude.powf(0.25); // 4th root
    (x * 100.0).round() as u8
}

/// Formats a duration as MM:SS or HH:MM:SS
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_under_an_hour() {
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00");
        assert_eq!(format_duration(Duration::from_secs(34)), "00:34");
        assert_eq!(format_duration(Duration::from_secs(190)), "03:10");
    }

    #[test]
    fn format_duration_with_hours() {
        assert_eq!(format_duration(Duration::from_secs(3600)), "01:00:00");
        assert_eq!(format_duration(Duration::from_secs(3723)), "01:02:03");
    }

    #[test]
    fn volume_scale_round_trips_at_the_ends() {
        assert_eq!(amplitude_to_volume(volume_percent_to_amplitude(0)), 0);
        assert_eq!(amplitude_to_volume(volume_percent_to_amplitude(100)), 100);
        assert_eq!(amplitude_to_volume(volume_percent_to_amplitude(50)), 50);
    }
}
