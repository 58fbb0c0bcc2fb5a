use chrono::{DateTime, TimeZone, Utc};

/// Uptime-style duration, e.g. `2d3h`, `4h12m`, `35s`
pub fn format_duration_human(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let duration = to.signed_duration_since(from);

    if duration.num_seconds() < 0 {
        return "0s".to_string();
    }

    let days = duration.num_days();
    let hours = (duration.num_seconds() % 86400) / 3600;
    let minutes = (duration.num_seconds() % 3600) / 60;

    if days > 0 {
        if hours > 0 {
            format!("{}d{}h", days, hours)
        } else {
            format!("{}d", days)
        }
    } else if hours > 0 {
        if minutes > 0 {
            format!("{}h{}m", hours, minutes)
        } else {
            format!("{}h", hours)
        }
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", duration.num_seconds())
    }
}

/// RFC 2822 date in GMT for a unix timestamp, as RSS `pubDate` wants it
pub fn rfc2822_from_unix(secs: i64) -> String {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or_default()
        .format("%a, %d %b %Y %H:%M:%S %z")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn rfc2822_uses_gmt_offset() {
        assert_eq!(rfc2822_from_unix(0), "Thu, 01 Jan 1970 00:00:00 +0000");
        assert_eq!(
            rfc2822_from_unix(1_539_000_000),
            "Mon, 08 Oct 2018 12:00:00 +0000"
        );
    }

    #[test]
    fn human_durations() {
        let start = Utc.timestamp_opt(1_000_000, 0).unwrap();
        assert_eq!(format_duration_human(start, start + Duration::seconds(35)), "35s");
        assert_eq!(
            format_duration_human(start, start + Duration::minutes(252)),
            "4h12m"
        );
        assert_eq!(
            format_duration_human(start, start + Duration::hours(51)),
            "2d3h"
        );
        assert_eq!(format_duration_human(start + Duration::hours(1), start), "0s");
    }
}
