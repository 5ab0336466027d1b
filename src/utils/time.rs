//! HH:MM 时间工具
//!
//! 所有加法都按 24 小时取模

use chrono::{Duration, NaiveTime};

/// 解析 "HH:MM"，也接受带秒的 "HH:MM:SS"
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// 格式化为 "HH:MM"
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// 在 "HH:MM" 上加若干分钟，跨过午夜时回绕
pub fn add_minutes(value: &str, minutes: i64) -> Option<String> {
    let start = parse_hhmm(value)?;
    let (end, _) = start.overflowing_add_signed(Duration::minutes(minutes));
    Some(format_hhmm(end))
}

/// 工作结束时间 = 开始时间 + 9 小时
pub fn work_end(work_start: &str) -> Option<String> {
    add_minutes(work_start, 9 * 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_within_day() {
        assert_eq!(add_minutes("09:00", 30).as_deref(), Some("09:30"));
        assert_eq!(add_minutes("09:45", 30).as_deref(), Some("10:15"));
    }

    #[test]
    fn wraps_past_midnight() {
        assert_eq!(add_minutes("23:50", 30).as_deref(), Some("00:20"));
        assert_eq!(work_end("18:30").as_deref(), Some("03:30"));
        assert_eq!(work_end("09:00").as_deref(), Some("18:00"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(add_minutes("late", 30), None);
        assert_eq!(add_minutes("25:00", 30), None);
        assert_eq!(work_end(""), None);
    }

    #[test]
    fn accepts_seconds() {
        assert_eq!(parse_hhmm("09:15:00"), parse_hhmm("09:15"));
        assert_eq!(add_minutes("09:15:00", 30).as_deref(), Some("09:45"));
        assert_eq!(parse_hhmm("09:15:99"), None);
    }
}
