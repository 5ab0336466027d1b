//! 导出服务 - 业务能力层
//!
//! 把当前持有的路线渲染为 CSV 和 iCalendar 文本。
//! 纯函数：不触发计算，不访问网络

use crate::error::ExportError;
use crate::models::{RouteResult, RouteTag};
use crate::services::normalizer::DEFAULT_SERVICE_MIN;
use crate::utils::time;
use chrono::NaiveDate;

/// CSV 表头
pub const CSV_HEADER: &str = "Тип;Адрес;Время прибытия;Длительность";

/// 日历产品标识
pub const ICS_PRODID: &str = "-//RoutePlanner//RU";

/// 日历事件使用的固定日期
const ICS_DATE: &str = "20240101";

/// 没有到达时间的停靠点在日历里的开始时间
const DEFAULT_ARRIVAL: &str = "09:00";

/// 渲染 CSV
///
/// 智能路线在前；有基准路线时先输出一个空行再输出基准路线
pub fn to_csv(
    smart: Option<&RouteResult>,
    baseline: Option<&RouteResult>,
) -> Result<String, ExportError> {
    if smart.is_none() && baseline.is_none() {
        return Err(ExportError::NothingToExport);
    }

    let mut csv = format!("{}\n", CSV_HEADER);

    if let Some(smart) = smart {
        push_csv_rows(&mut csv, RouteTag::Smart, smart);
    }

    if let Some(baseline) = baseline {
        csv.push('\n');
        push_csv_rows(&mut csv, RouteTag::Baseline, baseline);
    }

    Ok(csv)
}

fn push_csv_rows(csv: &mut String, tag: RouteTag, result: &RouteResult) {
    for stop in &result.route {
        let duration = if stop.duration == 0 {
            DEFAULT_SERVICE_MIN
        } else {
            stop.duration
        };
        csv.push_str(&format!(
            "{};{};{};{}\n",
            tag.csv_label(),
            stop.address,
            stop.arrival_time.as_deref().unwrap_or("N/A"),
            duration
        ));
    }
}

/// 渲染 iCalendar，每个停靠点一个 VEVENT
pub fn to_ics(smart: Option<&RouteResult>) -> Result<String, ExportError> {
    let smart = smart.ok_or(ExportError::NoSmartRoute)?;

    let mut ics = format!("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:{}\n", ICS_PRODID);

    for (index, stop) in smart.route.iter().enumerate() {
        let arrival = stop.arrival_time.as_deref().unwrap_or(DEFAULT_ARRIVAL);
        let start = time::parse_hhmm(arrival).ok_or_else(|| ExportError::InvalidTime {
            value: arrival.to_string(),
        })?;
        let duration = if stop.duration == 0 {
            DEFAULT_SERVICE_MIN
        } else {
            stop.duration
        };
        let end = time::add_minutes(arrival, i64::from(duration)).ok_or_else(|| {
            ExportError::InvalidTime {
                value: arrival.to_string(),
            }
        })?;

        ics.push_str("BEGIN:VEVENT\n");
        ics.push_str(&format!(
            "DTSTART:{}T{}00\n",
            ICS_DATE,
            start.format("%H%M")
        ));
        ics.push_str(&format!("DTEND:{}T{}00\n", ICS_DATE, end.replace(':', "")));
        ics.push_str(&format!("SUMMARY:Визит: {}\n", stop.address));
        ics.push_str(&format!("DESCRIPTION:Точка {} маршрута\n", index + 1));
        ics.push_str("END:VEVENT\n");
    }

    ics.push_str("END:VCALENDAR");
    Ok(ics)
}

/// `маршруты_<YYYY-MM-DD>.csv`
pub fn csv_file_name(date: NaiveDate) -> String {
    format!("маршруты_{}.csv", date.format("%Y-%m-%d"))
}

/// `маршрут_<YYYY-MM-DD>.ics`
pub fn ics_file_name(date: NaiveDate) -> String {
    format!("маршрут_{}.ics", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RouteStop, Summary};

    fn stop(address: &str, arrival: Option<&str>, duration: u32) -> RouteStop {
        RouteStop {
            address: address.to_string(),
            lat: 47.2,
            lon: 39.7,
            arrival_time: arrival.map(str::to_string),
            duration,
        }
    }

    fn result(stops: Vec<RouteStop>) -> RouteResult {
        RouteResult {
            route: stops,
            summary: Summary::default(),
        }
    }

    #[test]
    fn csv_both_sections() {
        let smart = result(vec![
            stop("ул. Большая Садовая, 1", Some("09:00"), 30),
            stop("пл. Гагарина, 1", None, 0),
        ]);
        let baseline = result(vec![stop("пр. Ворошиловский, 10", Some("10:30"), 45)]);

        let csv = to_csv(Some(&smart), Some(&baseline)).unwrap();
        assert_eq!(
            csv,
            "Тип;Адрес;Время прибытия;Длительность\n\
             Умный;ул. Большая Садовая, 1;09:00;30\n\
             Умный;пл. Гагарина, 1;N/A;30\n\
             \n\
             Базовый;пр. Ворошиловский, 10;10:30;45\n"
        );
        assert_eq!(csv.lines().filter(|l| l.is_empty()).count(), 1);
    }

    #[test]
    fn csv_starts_with_header() {
        let baseline = result(vec![stop("a", Some("09:00"), 30)]);
        let csv = to_csv(None, Some(&baseline)).unwrap();
        assert!(csv.starts_with(CSV_HEADER));

        let smart_only = to_csv(Some(&baseline), None).unwrap();
        assert!(smart_only.lines().all(|l| !l.is_empty()));
    }

    #[test]
    fn csv_without_results_fails() {
        assert_eq!(to_csv(None, None), Err(ExportError::NothingToExport));
    }

    #[test]
    fn ics_exact_text() {
        let smart = result(vec![
            stop("ул. Пушкинская, 100", Some("09:45"), 30),
            stop("пл. Гагарина, 1", None, 0),
            stop("ночной", Some("23:50"), 20),
        ]);

        let ics = to_ics(Some(&smart)).unwrap();
        assert_eq!(
            ics,
            "BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//RoutePlanner//RU\n\
             BEGIN:VEVENT\nDTSTART:20240101T094500\nDTEND:20240101T101500\n\
             SUMMARY:Визит: ул. Пушкинская, 100\nDESCRIPTION:Точка 1 маршрута\nEND:VEVENT\n\
             BEGIN:VEVENT\nDTSTART:20240101T090000\nDTEND:20240101T093000\n\
             SUMMARY:Визит: пл. Гагарина, 1\nDESCRIPTION:Точка 2 маршрута\nEND:VEVENT\n\
             BEGIN:VEVENT\nDTSTART:20240101T235000\nDTEND:20240101T001000\n\
             SUMMARY:Визит: ночной\nDESCRIPTION:Точка 3 маршрута\nEND:VEVENT\n\
             END:VCALENDAR"
        );
    }

    #[test]
    fn ics_accepts_eta_with_seconds() {
        let smart = result(vec![
            stop("ул. Пушкинская, 100", Some("09:15:00"), 30),
            stop("пл. Гагарина, 1", Some("10:00"), 30),
        ]);

        let ics = to_ics(Some(&smart)).unwrap();
        assert!(ics.contains("DTSTART:20240101T091500\nDTEND:20240101T094500\n"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    }

    #[test]
    fn ics_requires_smart() {
        assert_eq!(to_ics(None), Err(ExportError::NoSmartRoute));
    }

    #[test]
    fn ics_rejects_bad_time() {
        let smart = result(vec![stop("a", Some("soon"), 30)]);
        assert_eq!(
            to_ics(Some(&smart)),
            Err(ExportError::InvalidTime {
                value: "soon".to_string()
            })
        );
    }

    #[test]
    fn file_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(csv_file_name(date), "маршруты_2026-10-17.csv");
        assert_eq!(ics_file_name(date), "маршрут_2026-10-17.ics");
    }
}
